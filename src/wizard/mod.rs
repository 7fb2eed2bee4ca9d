//! Wizard orchestration core: step navigation, question flow and the execution run

pub mod confirmation;
pub mod navigator;
pub mod plan;
pub mod progress;
pub mod questions;
pub mod state;
pub mod validation;
pub mod worker;

pub use navigator::{Action, Key, Screen, ScreenFactory, StepNavigator, WizardEvent};
pub use plan::{ExecutionPlan, ExecutionTask, TaskId, TaskStatus};
pub use progress::{progress_channel, CreationResult, ExecutionMonitor, ProgressEvent};
pub use questions::{Answer, Question, QuestionFlow, QuestionKind};
pub use state::{RepositoryConfig, Step, Template, WizardState};
pub use worker::{CancelHandle, Worker};
