pub mod auth;
pub mod config;
pub mod wizard;

use async_trait::async_trait;

use crate::Result;

/// Common trait for all command handlers, driven from the main task
#[async_trait(?Send)]
pub trait CommandHandler {
    /// Execute the command
    async fn execute(&self) -> Result<CommandResult>;

    /// Get command name for logging
    fn name(&self) -> &'static str;
}

/// Command execution result; failures travel as `Err` and exit non-zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success with optional message
    Success(Option<String>),
    /// The user backed out; not an error
    Cancelled(String),
    /// Finished, but something needs the user's attention
    Warning(String),
}

impl CommandResult {
    /// Get message if any
    pub fn message(&self) -> Option<&str> {
        match self {
            CommandResult::Success(msg) => msg.as_deref(),
            CommandResult::Cancelled(msg) => Some(msg),
            CommandResult::Warning(msg) => Some(msg),
        }
    }
}
