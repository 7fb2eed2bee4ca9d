//! Background worker that performs the creation run and reports progress

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use super::plan::{ExecutionPlan, TaskId};
use super::progress::{Artifact, ProgressEvent, ProgressSender};
use super::state::{RepositoryConfig, Template, WizardState};
use super::validation::{validate_description, validate_repository_name};
use crate::backend::RepositoryBackend;
use crate::error::{Result, WizardError};

/// Foreground handle used to interrupt a running worker
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Worker-side view of this handle
    pub fn token(&self) -> CancelToken {
        CancelToken {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    /// Resolves once cancellation is requested; never resolves if the handle is gone
    pub async fn cancelled(&mut self) {
        let requested = self.receiver.wait_for(|cancelled| *cancelled).await.map(|_| ());
        if requested.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Reason a run stopped before its tasks finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Cancelled,
    DeadlineExceeded,
}

impl Halt {
    fn into_error(self) -> WizardError {
        match self {
            Halt::Cancelled => WizardError::project("cancelled by user"),
            Halt::DeadlineExceeded => {
                WizardError::backend("the wizard deadline passed before creation finished")
            }
        }
    }
}

/// Producer side of a creation run.
///
/// Runs the plan's tasks in order against the backend and sends one event per task
/// transition. It never touches the plan itself; the queue is closed by dropping the
/// sender when `run` returns.
pub struct Worker {
    backend: Arc<dyn RepositoryBackend>,
    config: RepositoryConfig,
    template: Option<Template>,
    tasks: Vec<TaskId>,
    deadline: Instant,
    cancel: CancelToken,
}

impl Worker {
    pub fn new(
        backend: Arc<dyn RepositoryBackend>,
        state: &WizardState,
        plan: &ExecutionPlan,
        deadline: Instant,
        cancel: CancelToken,
    ) -> Self {
        Self {
            backend,
            config: state.repository_config.clone(),
            template: state.selected_template().cloned(),
            tasks: plan.task_ids(),
            deadline,
            cancel,
        }
    }

    pub fn spawn(self, sender: ProgressSender) -> JoinHandle<()> {
        tokio::spawn(self.run(sender))
    }

    pub async fn run(mut self, sender: ProgressSender) {
        let mut repository_url: Option<String> = None;
        info!(repository = %self.config.name, tasks = self.tasks.len(), "starting creation run");

        let tasks = self.tasks.clone();
        for (index, &id) in tasks.iter().enumerate() {
            if sender
                .send(ProgressEvent::started(id, starting_message(id)))
                .await
                .is_err()
            {
                debug!("progress consumer went away, abandoning run");
                return;
            }

            let work = perform(
                self.backend.as_ref(),
                &self.config,
                self.template.as_ref(),
                id,
                repository_url.as_deref(),
            );
            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(Halt::Cancelled),
                _ = tokio::time::sleep_until(self.deadline) => Err(Halt::DeadlineExceeded),
                result = work => Ok(result),
            };

            let event = match outcome {
                Ok(Ok(artifact)) => {
                    if let Some(Artifact::RepositoryUrl(url)) = &artifact {
                        repository_url = Some(url.clone());
                    }
                    let event = ProgressEvent::completed(id, finished_message(id));
                    match artifact {
                        Some(artifact) => event.with_artifact(artifact),
                        None => event,
                    }
                }
                Ok(Err(error)) if id.is_fatal() => {
                    let _ = sender.send(ProgressEvent::failed(id, error)).await;
                    return;
                }
                Ok(Err(error)) => ProgressEvent::skipped(id, error),
                Err(halt) => {
                    let error = halt.into_error();
                    info!("creation run halted: {error}");
                    let event = match halt {
                        Halt::Cancelled => ProgressEvent::cancelled(id, error),
                        Halt::DeadlineExceeded => ProgressEvent::failed(id, error),
                    };
                    let _ = sender.send(event).await;
                    for &rest in &tasks[index + 1..] {
                        let aborted = WizardError::project("aborted before it started");
                        if sender.send(ProgressEvent::failed(rest, aborted)).await.is_err() {
                            break;
                        }
                    }
                    return;
                }
            };

            if sender.send(event).await.is_err() {
                return;
            }
        }
    }
}

async fn perform(
    backend: &dyn RepositoryBackend,
    config: &RepositoryConfig,
    template: Option<&Template>,
    id: TaskId,
    repository_url: Option<&str>,
) -> Result<Option<Artifact>> {
    match id {
        TaskId::Validate => {
            validate_for_creation(config, template)?;
            if backend.repository_exists(&config.name).await? {
                return Err(WizardError::invalid_field(
                    "repository_name",
                    format!("a repository named '{}' already exists on your account", config.name),
                ));
            }
            Ok(None)
        }
        TaskId::CreateRepository => {
            let url = backend.create_repository(config, template).await?;
            Ok(Some(Artifact::RepositoryUrl(url)))
        }
        TaskId::SetupTemplate => match template {
            Some(template) => {
                backend.apply_template(config, template).await?;
                Ok(None)
            }
            None => Ok(None),
        },
        TaskId::CreateReadme => {
            backend.add_readme(config).await?;
            Ok(None)
        }
        TaskId::CloneRepository => {
            let path: PathBuf = backend.clone_locally(config, repository_url).await?;
            Ok(Some(Artifact::ClonePath(path)))
        }
    }
}

/// Local checks run by the `validate` task before it asks the backend about the name
pub fn validate_for_creation(config: &RepositoryConfig, template: Option<&Template>) -> Result<()> {
    config.validate()?;
    validate_repository_name(&config.name)
        .map_err(|message| WizardError::invalid_field("repository_name", message))?;
    validate_description(&config.description)
        .map_err(|message| WizardError::invalid_field("description", message))?;

    if let Some(template) = template {
        if template.full_name.is_empty() {
            return Err(WizardError::invalid_field(
                "template",
                "template has no owner/name to create from",
            ));
        }
    }
    Ok(())
}

fn starting_message(id: TaskId) -> &'static str {
    match id {
        TaskId::Validate => "Checking repository settings...",
        TaskId::CreateRepository => "Creating repository on GitHub...",
        TaskId::SetupTemplate => "Applying template...",
        TaskId::CreateReadme => "Adding README...",
        TaskId::CloneRepository => "Cloning repository...",
    }
}

fn finished_message(id: TaskId) -> &'static str {
    match id {
        TaskId::Validate => "Settings are valid",
        TaskId::CreateRepository => "Repository created",
        TaskId::SetupTemplate => "Template applied",
        TaskId::CreateReadme => "README added",
        TaskId::CloneRepository => "Repository cloned",
    }
}
