use async_trait::async_trait;

use super::{CommandHandler, CommandResult};
use crate::backend::{GhCli, RepositoryBackend, TemplateSource};
use crate::Result;

/// Templates listed by `auth` before summarizing the rest
const LISTED_TEMPLATES: usize = 3;

/// Handler for the `auth` command
pub struct AuthCommand {
    gh: GhCli,
}

impl AuthCommand {
    pub fn new() -> Self {
        Self { gh: GhCli::new() }
    }
}

impl Default for AuthCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl CommandHandler for AuthCommand {
    async fn execute(&self) -> Result<CommandResult> {
        println!("🔍 Checking GitHub CLI...");
        self.gh.check_prerequisites().await?;
        println!("✅ {}", self.gh.version().await?);

        let login = self.gh.current_user().await?;
        println!("✅ Logged in as {login}");

        let templates = self.gh.list_templates().await?;
        println!("📚 {} template repositories available", templates.len());
        for template in templates.iter().take(LISTED_TEMPLATES) {
            println!("   • {}", template.display_name());
        }
        if templates.len() > LISTED_TEMPLATES {
            println!("   ... and {} more", templates.len() - LISTED_TEMPLATES);
        }

        Ok(CommandResult::Success(Some(login)))
    }

    fn name(&self) -> &'static str {
        "auth"
    }
}
