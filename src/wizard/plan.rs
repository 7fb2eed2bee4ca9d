//! Weighted execution plan for the repository creation run

use std::time::{Duration, Instant};

use super::state::WizardState;
use crate::error::WizardError;

/// Identifies one unit of work in the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    Validate,
    CreateRepository,
    SetupTemplate,
    CreateReadme,
    CloneRepository,
}

impl TaskId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskId::Validate => "validate",
            TaskId::CreateRepository => "create_repository",
            TaskId::SetupTemplate => "setup_template",
            TaskId::CreateReadme => "create_readme",
            TaskId::CloneRepository => "clone_repository",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskId::Validate => "Validate settings",
            TaskId::CreateRepository => "Create repository",
            TaskId::SetupTemplate => "Apply template",
            TaskId::CreateReadme => "Add README",
            TaskId::CloneRepository => "Clone locally",
        }
    }

    /// Nominal share of the run before normalization
    pub fn nominal_weight(&self) -> f64 {
        match self {
            TaskId::Validate => 0.1,
            TaskId::CreateRepository => 0.3,
            TaskId::SetupTemplate => 0.2,
            TaskId::CreateReadme => 0.15,
            TaskId::CloneRepository => 0.25,
        }
    }

    pub fn estimated_duration(&self) -> Duration {
        match self {
            TaskId::Validate => Duration::from_secs(2),
            TaskId::CreateRepository => Duration::from_secs(5),
            TaskId::SetupTemplate => Duration::from_secs(3),
            TaskId::CreateReadme => Duration::from_secs(2),
            TaskId::CloneRepository => Duration::from_secs(4),
        }
    }

    /// A failure of a fatal task stops the run; others are recorded as skipped
    pub fn is_fatal(&self) -> bool {
        matches!(self, TaskId::Validate | TaskId::CreateRepository)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Skipped,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Skipped)
    }

    /// Allowed moves: Pending → InProgress → terminal, InProgress → InProgress for
    /// progress updates, and Pending → Failed/Skipped when a run is aborted or a task
    /// is dropped before it starts.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        match (self, next) {
            (TaskStatus::Pending, TaskStatus::InProgress) => true,
            (TaskStatus::Pending, TaskStatus::Failed | TaskStatus::Skipped) => true,
            (TaskStatus::InProgress, TaskStatus::InProgress) => true,
            (TaskStatus::InProgress, next) => next.is_terminal(),
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
            TaskStatus::Skipped => "Skipped",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "⏳",
            TaskStatus::InProgress => "⟳",
            TaskStatus::Completed => "✓",
            TaskStatus::Failed => "✗",
            TaskStatus::Skipped => "⊘",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionTask {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
    pub progress: f64,
    pub weight: f64,
    pub estimated_duration: Duration,
    pub start_time: Option<Instant>,
    pub end_time: Option<Instant>,
    pub duration: Option<Duration>,
    pub error: Option<WizardError>,
    /// Last human-readable message reported for this task
    pub message: String,
}

impl ExecutionTask {
    fn new(id: TaskId) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            status: TaskStatus::Pending,
            progress: 0.0,
            weight: id.nominal_weight(),
            estimated_duration: id.estimated_duration(),
            start_time: None,
            end_time: None,
            duration: None,
            error: None,
            message: String::new(),
        }
    }

    /// 1.0 once completed or skipped, the reported fraction otherwise
    pub fn effective_progress(&self) -> f64 {
        match self.status {
            TaskStatus::Completed | TaskStatus::Skipped => 1.0,
            _ => self.progress,
        }
    }
}

/// Why an update was not applied to the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRejected {
    UnknownTask(TaskId),
    InvalidTransition { from: TaskStatus, to: TaskStatus },
}

impl std::fmt::Display for UpdateRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateRejected::UnknownTask(id) => write!(f, "task {id} is not part of the plan"),
            UpdateRejected::InvalidTransition { from, to } => {
                write!(f, "cannot move from {} to {}", from.label(), to.label())
            }
        }
    }
}

/// Ordered tasks with weights normalized to sum to 1.0
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    tasks: Vec<ExecutionTask>,
    started_at: Instant,
}

impl ExecutionPlan {
    /// Build the task list for the given wizard state
    pub fn from_state(state: &WizardState) -> Self {
        let config = &state.repository_config;
        let mut ids = vec![TaskId::Validate, TaskId::CreateRepository];
        if state.selected_template().is_some() {
            ids.push(TaskId::SetupTemplate);
        }
        if config.add_readme {
            ids.push(TaskId::CreateReadme);
        }
        if config.should_clone {
            ids.push(TaskId::CloneRepository);
        }
        Self::with_tasks(&ids)
    }

    /// Build a plan from an explicit task list, normalizing nominal weights
    pub fn with_tasks(ids: &[TaskId]) -> Self {
        let mut tasks: Vec<ExecutionTask> = ids.iter().copied().map(ExecutionTask::new).collect();

        let total: f64 = tasks.iter().map(|t| t.weight).sum();
        if total > 0.0 {
            for task in &mut tasks {
                task.weight /= total;
            }
        }

        Self {
            tasks,
            started_at: Instant::now(),
        }
    }

    pub fn tasks(&self) -> &[ExecutionTask] {
        &self.tasks
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }

    pub fn task_by_id(&self, id: TaskId) -> Option<&ExecutionTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Apply one status report to a task.
    ///
    /// Starting a task stamps its start time; finishing it stamps the end time, records
    /// the duration and counts it as fully progressed. Progress within a task never
    /// moves backwards.
    pub fn update_task_status(
        &mut self,
        id: TaskId,
        status: TaskStatus,
        progress: f64,
        error: Option<WizardError>,
    ) -> std::result::Result<(), UpdateRejected> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(UpdateRejected::UnknownTask(id))?;

        if !task.status.can_transition_to(status) {
            return Err(UpdateRejected::InvalidTransition {
                from: task.status,
                to: status,
            });
        }

        let now = Instant::now();
        task.status = status;
        task.progress = task.progress.max(progress.clamp(0.0, 1.0));

        if status == TaskStatus::InProgress && task.start_time.is_none() {
            task.start_time = Some(now);
        }

        if status.is_terminal() {
            if task.end_time.is_none() {
                task.end_time = Some(now);
            }
            task.duration = task.start_time.map(|start| now.saturating_duration_since(start));
            task.progress = 1.0;
        }

        if error.is_some() {
            task.error = error;
        }

        Ok(())
    }

    /// Record the latest human-readable message for a task
    pub fn set_message(&mut self, id: TaskId, message: impl Into<String>) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.message = message.into();
        }
    }

    pub fn overall_progress(&self) -> f64 {
        let sum: f64 = self
            .tasks
            .iter()
            .map(|t| t.effective_progress() * t.weight)
            .sum();
        sum.clamp(0.0, 1.0)
    }

    /// Every task completed or skipped
    pub fn is_done(&self) -> bool {
        self.tasks
            .iter()
            .all(|t| matches!(t.status, TaskStatus::Completed | TaskStatus::Skipped))
    }

    pub fn has_failed(&self) -> bool {
        self.tasks.iter().any(|t| t.status == TaskStatus::Failed)
    }

    /// The task currently running, if any
    pub fn current_task(&self) -> Option<&ExecutionTask> {
        self.tasks.iter().find(|t| t.status == TaskStatus::InProgress)
    }

    pub fn next_pending(&self) -> Option<&ExecutionTask> {
        self.tasks.iter().find(|t| t.status == TaskStatus::Pending)
    }

    /// Number of tasks in a terminal state
    pub fn finished_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.status.is_terminal()).count()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Sum of the nominal task estimates
    pub fn estimated_total(&self) -> Duration {
        self.tasks.iter().map(|t| t.estimated_duration).sum()
    }

    /// Remaining time extrapolated from elapsed time and overall progress
    pub fn estimated_remaining(&self) -> Duration {
        self.estimated_remaining_after(self.elapsed())
    }

    /// [`ExecutionPlan::estimated_remaining`] for a given elapsed time
    pub fn estimated_remaining_after(&self, elapsed: Duration) -> Duration {
        let progress = self.overall_progress();
        if progress <= 0.0 {
            return self.estimated_total();
        }
        let elapsed_secs = elapsed.as_secs_f64();
        let remaining = elapsed_secs / progress - elapsed_secs;
        Duration::from_secs_f64(remaining.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_transition_stamps_times() {
        let mut plan = ExecutionPlan::with_tasks(&[TaskId::Validate]);
        plan.update_task_status(TaskId::Validate, TaskStatus::InProgress, 0.2, None)
            .unwrap();
        let task = plan.task_by_id(TaskId::Validate).unwrap();
        assert!(task.start_time.is_some());
        assert!(task.end_time.is_none());

        plan.update_task_status(TaskId::Validate, TaskStatus::Completed, 0.5, None)
            .unwrap();
        let task = plan.task_by_id(TaskId::Validate).unwrap();
        assert!(task.end_time.is_some());
        assert!(task.duration.is_some());
        assert_eq!(task.progress, 1.0);
    }

    #[test]
    fn test_rejects_invalid_transitions() {
        let mut plan = ExecutionPlan::with_tasks(&[TaskId::Validate]);
        let err = plan
            .update_task_status(TaskId::Validate, TaskStatus::Completed, 1.0, None)
            .unwrap_err();
        assert_eq!(
            err,
            UpdateRejected::InvalidTransition {
                from: TaskStatus::Pending,
                to: TaskStatus::Completed
            }
        );

        let err = plan
            .update_task_status(TaskId::CloneRepository, TaskStatus::InProgress, 0.0, None)
            .unwrap_err();
        assert_eq!(err, UpdateRejected::UnknownTask(TaskId::CloneRepository));
    }

    #[test]
    fn test_estimated_remaining() {
        let mut plan = ExecutionPlan::with_tasks(&[TaskId::Validate, TaskId::CreateRepository]);
        assert_eq!(plan.estimated_remaining_after(Duration::from_secs(3)), Duration::from_secs(7));

        plan.update_task_status(TaskId::Validate, TaskStatus::InProgress, 0.0, None)
            .unwrap();
        plan.update_task_status(TaskId::Validate, TaskStatus::Completed, 1.0, None)
            .unwrap();
        // validate carries 0.25 of the run: 1s elapsed extrapolates to 3s more
        let remaining = plan.estimated_remaining_after(Duration::from_secs(1));
        assert!((remaining.as_secs_f64() - 3.0).abs() < 1e-9);
    }
}
