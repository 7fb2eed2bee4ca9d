//! Progress messages between the background worker and the foreground consumer
//!
//! The worker is the only producer on a bounded queue and drops its sender when the run
//! ends. The consumer drains the queue without blocking on every tick, applies each
//! message to its [`ExecutionPlan`] in arrival order and decides the outcome once the
//! queue is closed.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::plan::{ExecutionPlan, TaskId, TaskStatus};
use super::worker::CancelHandle;
use crate::error::WizardError;

/// Capacity of the progress queue
pub const PROGRESS_QUEUE_CAPACITY: usize = 100;

/// Interval at which the consumer re-polls an empty queue
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Output produced by a task, carried on its completion event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    RepositoryUrl(String),
    ClonePath(PathBuf),
}

/// One task-state transition reported by the worker
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub progress: f64,
    pub error: Option<WizardError>,
    pub message: String,
    pub artifact: Option<Artifact>,
    /// The failure was caused by a user cancel rather than by the task
    pub cancelled: bool,
}

impl ProgressEvent {
    pub fn new(task_id: TaskId, status: TaskStatus, progress: f64, message: impl Into<String>) -> Self {
        Self {
            task_id,
            status,
            progress,
            error: None,
            message: message.into(),
            artifact: None,
            cancelled: false,
        }
    }

    pub fn started(task_id: TaskId, message: impl Into<String>) -> Self {
        Self::new(task_id, TaskStatus::InProgress, 0.0, message)
    }

    pub fn completed(task_id: TaskId, message: impl Into<String>) -> Self {
        Self::new(task_id, TaskStatus::Completed, 1.0, message)
    }

    pub fn failed(task_id: TaskId, error: WizardError) -> Self {
        Self::new(task_id, TaskStatus::Failed, 1.0, error.to_string()).with_error(error)
    }

    /// The task in flight was stopped because the user cancelled the run
    pub fn cancelled(task_id: TaskId, error: WizardError) -> Self {
        Self {
            cancelled: true,
            ..Self::failed(task_id, error)
        }
    }

    pub fn skipped(task_id: TaskId, error: WizardError) -> Self {
        let message = format!("skipped: {error}");
        Self::new(task_id, TaskStatus::Skipped, 1.0, message).with_error(error)
    }

    pub fn with_error(mut self, error: WizardError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }
}

/// Sending half handed to the worker
pub type ProgressSender = mpsc::Sender<ProgressEvent>;
/// Receiving half polled by the consumer
pub type ProgressReceiver = mpsc::Receiver<ProgressEvent>;

/// Bounded, ordered queue for one run
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::channel(PROGRESS_QUEUE_CAPACITY)
}

/// Outcome of a whole run, handed to the final screen
#[derive(Debug, Clone, Default)]
pub struct CreationResult {
    pub success: bool,
    pub repository_url: Option<String>,
    pub clone_path: Option<PathBuf>,
    pub error: Option<WizardError>,
    pub message: String,
    /// The user stopped the run
    pub cancelled: bool,
    /// Non-fatal problems recorded as skipped tasks
    pub warnings: Vec<String>,
    /// `owner/name` of the template the run was created from
    pub template: Option<String>,
    pub elapsed: Duration,
}

impl CreationResult {
    /// Whether the process should exit non-zero for this result
    pub fn is_fatal(&self) -> bool {
        !self.success && !self.cancelled
    }
}

/// Foreground side of the protocol: owns the plan and the receiving half
pub struct ExecutionMonitor {
    plan: ExecutionPlan,
    receiver: ProgressReceiver,
    cancel: Option<CancelHandle>,
    template: Option<String>,
    fatal_error: Option<WizardError>,
    /// The first failure came from a user cancel
    stopped_by_user: bool,
    repository_url: Option<String>,
    clone_path: Option<PathBuf>,
    warnings: Vec<String>,
    result: Option<CreationResult>,
}

impl ExecutionMonitor {
    pub fn new(plan: ExecutionPlan, receiver: ProgressReceiver) -> Self {
        Self {
            plan,
            receiver,
            cancel: None,
            template: None,
            fatal_error: None,
            stopped_by_user: false,
            repository_url: None,
            clone_path: None,
            warnings: Vec::new(),
            result: None,
        }
    }

    /// Keep a handle to interrupt the worker from the foreground
    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Record which template the run uses so the result can name it
    pub fn with_template(mut self, full_name: Option<String>) -> Self {
        self.template = full_name;
        self
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&CreationResult> {
        self.result.as_ref()
    }

    /// Ask the worker to stop; the run then ends as cancelled unless it already failed
    pub fn cancel(&self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| c.is_cancelled())
    }

    /// Drain every queued event without blocking.
    ///
    /// Returns the events applied in this call, in order, so callers can echo them.
    pub fn poll(&mut self) -> Vec<ProgressEvent> {
        let mut applied = Vec::new();
        if self.result.is_some() {
            return applied;
        }

        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.apply(&event);
                    applied.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finish();
                    break;
                }
            }
        }
        applied
    }

    /// Poll on a fixed interval until the worker closes the queue
    pub async fn run_to_completion<F>(mut self, mut on_event: F) -> CreationResult
    where
        F: FnMut(&ExecutionPlan, &ProgressEvent),
    {
        loop {
            for event in self.poll() {
                on_event(&self.plan, &event);
            }
            if let Some(result) = self.result.take() {
                return result;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    fn apply(&mut self, event: &ProgressEvent) {
        debug!(
            task = %event.task_id,
            status = event.status.label(),
            progress = event.progress,
            "progress event"
        );

        if let Err(rejected) = self.plan.update_task_status(
            event.task_id,
            event.status,
            event.progress,
            event.error.clone(),
        ) {
            warn!(task = %event.task_id, "ignoring progress event: {rejected}");
            return;
        }
        if !event.message.is_empty() {
            self.plan.set_message(event.task_id, event.message.clone());
        }

        match &event.artifact {
            Some(Artifact::RepositoryUrl(url)) => self.repository_url = Some(url.clone()),
            Some(Artifact::ClonePath(path)) => self.clone_path = Some(path.clone()),
            None => {}
        }

        match event.status {
            // Tasks aborted after a failure also report Failed; the first error is the cause
            TaskStatus::Failed if self.fatal_error.is_none() => {
                self.fatal_error = event.error.clone();
                self.stopped_by_user = event.cancelled;
            }
            TaskStatus::Skipped => {
                if let Some(error) = &event.error {
                    warn!(task = %event.task_id, "non-fatal task failure: {error}");
                    self.warnings
                        .push(format!("{}: {}", event.task_id.display_name(), error));
                }
            }
            _ => {}
        }
    }

    fn finish(&mut self) {
        let elapsed = self.plan.elapsed();
        // A cancel that arrives after a fatal failure does not change the outcome
        let cancelled = self.stopped_by_user;

        let error = match self.fatal_error.clone() {
            Some(error) => Some(error),
            None if !self.plan.is_done() => Some(WizardError::project(
                "the creation run stopped before all tasks finished",
            )),
            None => None,
        };

        let result = match error {
            None => CreationResult {
                success: true,
                message: "Repository created successfully".to_string(),
                repository_url: self.repository_url.clone(),
                clone_path: self.clone_path.clone(),
                warnings: self.warnings.clone(),
                template: self.template.clone(),
                elapsed,
                ..Default::default()
            },
            Some(error) => CreationResult {
                success: false,
                message: if cancelled {
                    "Repository creation was cancelled".to_string()
                } else {
                    "Repository creation failed".to_string()
                },
                repository_url: self.repository_url.clone(),
                clone_path: self.clone_path.clone(),
                error: Some(error),
                cancelled,
                warnings: self.warnings.clone(),
                template: self.template.clone(),
                elapsed,
            },
        };

        info!(
            success = result.success,
            cancelled = result.cancelled,
            elapsed_ms = elapsed.as_millis() as u64,
            "creation run finished"
        );
        self.result = Some(result);
    }
}
