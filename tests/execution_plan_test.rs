use gh_wizard::wizard::{ExecutionPlan, RepositoryConfig, TaskId, TaskStatus, Template, WizardState};

const EPSILON: f64 = 1e-3;

fn weight(plan: &ExecutionPlan, id: TaskId) -> f64 {
    plan.task_by_id(id).unwrap().weight
}

#[test]
fn test_weights_sum_to_one_for_every_task_set() {
    for (template, readme, clone) in [
        (false, false, false),
        (true, false, false),
        (false, true, true),
        (true, true, true),
    ] {
        let mut state = WizardState::with_defaults(RepositoryConfig {
            name: "demo".into(),
            add_readme: readme,
            should_clone: clone,
            ..Default::default()
        });
        if template {
            state.select_template(Template {
                full_name: "octo/tpl".into(),
                ..Default::default()
            });
        }

        let plan = ExecutionPlan::from_state(&state);
        let sum: f64 = plan.tasks().iter().map(|t| t.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {sum}");
        assert_eq!(plan.tasks().len(), 2 + template as usize + readme as usize + clone as usize);
    }
}

#[test]
fn test_partial_progress_scenario() {
    let mut plan = ExecutionPlan::with_tasks(&[
        TaskId::Validate,
        TaskId::CreateRepository,
        TaskId::CloneRepository,
    ]);

    assert!((weight(&plan, TaskId::Validate) - 0.154).abs() < EPSILON);
    assert!((weight(&plan, TaskId::CreateRepository) - 0.462).abs() < EPSILON);
    assert!((weight(&plan, TaskId::CloneRepository) - 0.385).abs() < EPSILON);

    for id in [TaskId::Validate, TaskId::CreateRepository] {
        plan.update_task_status(id, TaskStatus::InProgress, 0.0, None).unwrap();
        plan.update_task_status(id, TaskStatus::Completed, 1.0, None).unwrap();
    }

    assert!((plan.overall_progress() - 0.615).abs() < EPSILON);
    assert!(!plan.is_done());
}

#[test]
fn test_progress_never_decreases() {
    let mut plan = ExecutionPlan::with_tasks(&[TaskId::Validate, TaskId::CreateRepository]);
    let history = [
        (TaskId::Validate, TaskStatus::InProgress, 0.0),
        (TaskId::Validate, TaskStatus::InProgress, 0.6),
        (TaskId::Validate, TaskStatus::InProgress, 0.3),
        (TaskId::Validate, TaskStatus::Completed, 0.2),
        (TaskId::CreateRepository, TaskStatus::InProgress, 0.5),
        (TaskId::CreateRepository, TaskStatus::Skipped, 0.0),
    ];

    let mut last = plan.overall_progress();
    for (id, status, progress) in history {
        plan.update_task_status(id, status, progress, None).unwrap();
        let now = plan.overall_progress();
        assert!(now + 1e-12 >= last, "progress fell from {last} to {now}");
        assert!((0.0..=1.0).contains(&now));
        last = now;
    }
    assert!(plan.is_done());
}

#[test]
fn test_terminal_status_forces_full_progress() {
    let mut plan = ExecutionPlan::with_tasks(&[TaskId::Validate]);
    plan.update_task_status(TaskId::Validate, TaskStatus::InProgress, 0.1, None).unwrap();
    plan.update_task_status(TaskId::Validate, TaskStatus::Failed, 0.4, None).unwrap();

    let task = plan.task_by_id(TaskId::Validate).unwrap();
    assert_eq!(task.progress, 1.0);
    assert!(task.end_time.is_some());
    assert!(task.duration.is_some());
    assert!(plan.has_failed());
    assert!(!plan.is_done());
}

#[test]
fn test_unknown_task_is_rejected() {
    let mut plan = ExecutionPlan::with_tasks(&[TaskId::Validate]);
    assert!(plan
        .update_task_status(TaskId::CloneRepository, TaskStatus::InProgress, 0.0, None)
        .is_err());
}
