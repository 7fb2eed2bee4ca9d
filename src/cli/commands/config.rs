use async_trait::async_trait;

use super::{CommandHandler, CommandResult};
use crate::cli::app::ConfigAction;
use crate::config::{Config, ConfigLoader};
use crate::{Result, WizardError};

/// Handler for the `config` command
pub struct ConfigCommand {
    pub action: ConfigAction,
    pub loader: ConfigLoader,
}

impl ConfigCommand {
    pub fn new(action: ConfigAction, loader: ConfigLoader) -> Self {
        Self { action, loader }
    }

    fn show(&self) -> Result<CommandResult> {
        let config = self.loader.load()?;
        let yaml = render(&config)?;

        println!("# {}", self.loader.path().display());
        if !self.loader.path().exists() {
            println!("# (file not found, showing defaults)");
        }
        print!("{yaml}");
        Ok(CommandResult::Success(None))
    }

    fn init(&self, force: bool) -> Result<CommandResult> {
        self.loader.init(force)?;
        let message = format!("Configuration written to {}", self.loader.path().display());
        println!("✅ {message}");
        Ok(CommandResult::Success(Some(message)))
    }
}

#[async_trait(?Send)]
impl CommandHandler for ConfigCommand {
    async fn execute(&self) -> Result<CommandResult> {
        match self.action {
            ConfigAction::Show => self.show(),
            ConfigAction::Init { force } => self.init(force),
        }
    }

    fn name(&self) -> &'static str {
        "config"
    }
}

fn render(config: &Config) -> Result<String> {
    serde_yaml_ng::to_string(config).map_err(|e| {
        WizardError::project(format!("Failed to serialize configuration: {e}")).with_cause(e)
    })
}
