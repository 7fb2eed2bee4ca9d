use std::io::{self, Write};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use super::{CommandHandler, CommandResult};
use crate::backend::{find_template, Backends, GhCli, UNKNOWN_USER};
use crate::cli::app::WizardArgs;
use crate::config::{Config, ConfigLoader};
use crate::wizard::confirmation::ConfirmationData;
use crate::wizard::progress::{progress_channel, CreationResult, ExecutionMonitor, ProgressEvent};
use crate::wizard::validation::{validate_long_description, ProjectNameValidator};
use crate::wizard::worker::{CancelHandle, Worker};
use crate::wizard::{ExecutionPlan, TaskStatus, WizardState};
use crate::{Result, WizardError};

/// Value of `--template` meaning "start from scratch"
const NO_TEMPLATE: &str = "none";

/// Handler for the wizard, interactive or driven by flags
pub struct WizardCommand {
    pub args: WizardArgs,
    pub config: Config,
    pub loader: ConfigLoader,
}

impl WizardCommand {
    pub fn new(args: WizardArgs, config: Config, loader: ConfigLoader) -> Self {
        Self {
            args,
            config,
            loader,
        }
    }

    fn simulate(&self) -> bool {
        self.args.dry_run || self.config.simulate
    }

    /// Build the state from flags and configuration defaults
    async fn state_from_flags(&self, name: &str, backends: &Backends) -> Result<WizardState> {
        ProjectNameValidator::new()
            .validate(name)
            .map_err(|message| WizardError::invalid_field("repository_name", message))?;

        let mut config = self.config.repository_defaults();
        config.name = name.to_string();
        if let Some(description) = &self.args.description {
            validate_long_description(description)
                .map_err(|message| WizardError::invalid_field("description", message))?;
            config.description = description.trim().to_string();
        }
        if self.args.public {
            config.is_private = false;
        }
        if self.args.no_clone {
            config.should_clone = false;
        }
        if self.args.no_readme {
            config.add_readme = false;
        }

        let mut state = WizardState::with_defaults(config);
        match self.args.template.as_deref() {
            None | Some(NO_TEMPLATE) => state.set_use_template(false),
            Some(wanted) => {
                let templates = backends.templates.list_templates().await?;
                let template = find_template(&templates, wanted).ok_or_else(|| {
                    WizardError::invalid_field("template", format!("template '{wanted}' was not found"))
                })?;
                state.select_template(template.clone());
            }
        }
        Ok(state)
    }

    async fn run_non_interactive(&self, name: &str, backends: Backends) -> Result<CommandResult> {
        let state = self.state_from_flags(name, &backends).await?;

        let user = backends
            .repositories
            .current_user()
            .await
            .unwrap_or_else(|e| {
                warn!("could not determine the signed-in user: {e}");
                UNKNOWN_USER.to_string()
            });
        print_summary(&ConfirmationData::build(&state, &user, Utc::now()));

        if !self.args.yes && !confirm()? {
            println!("❌ Repository creation cancelled.");
            return Ok(CommandResult::Cancelled("cancelled before creation".to_string()));
        }

        let plan = ExecutionPlan::from_state(&state);
        let (sender, receiver) = progress_channel();
        let cancel = CancelHandle::new();
        let deadline = tokio::time::Instant::now() + self.config.run_timeout();

        let worker = Worker::new(
            backends.repositories.clone(),
            &state,
            &plan,
            deadline,
            cancel.token(),
        );
        let handle = worker.spawn(sender);

        let interrupt = cancel.clone();
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupt.cancel();
            }
        });

        let monitor = ExecutionMonitor::new(plan, receiver)
            .with_cancel(cancel)
            .with_template(state.selected_template().map(|t| t.full_name.clone()));
        let result = monitor.run_to_completion(print_event).await;

        ctrl_c.abort();
        if let Err(e) = handle.await {
            warn!("worker task ended abnormally: {e}");
        }

        self.finish(result, true)
    }

    /// Record the outcome and map it onto the command result
    fn finish(&self, result: CreationResult, report: bool) -> Result<CommandResult> {
        if report {
            print_result(&result);
        }

        if result.success {
            if let Some(template) = &result.template {
                let mut config = self.config.clone();
                config.add_recent_template(template);
                if let Err(e) = self.loader.save(&config) {
                    warn!("could not record recent template: {e}");
                }
            }
        }

        if result.cancelled {
            return Ok(CommandResult::Cancelled(result.message));
        }
        match result.error {
            Some(error) => Err(error),
            None if result.warnings.is_empty() => Ok(CommandResult::Success(result.repository_url)),
            None => Ok(CommandResult::Warning(result.warnings.join("; "))),
        }
    }

    #[cfg(feature = "tui")]
    async fn run_interactive(&self, backends: Backends) -> Result<CommandResult> {
        let mut config = self.config.clone();
        if let Some(template) = self.args.template.as_deref().filter(|t| *t != NO_TEMPLATE) {
            // Listed first on the template screen
            config.add_recent_template(template);
        }

        match crate::cli::tui::run_wizard(backends, config).await? {
            Some(result) => self.finish(result, false),
            None => Ok(CommandResult::Cancelled("wizard closed".to_string())),
        }
    }

    #[cfg(not(feature = "tui"))]
    async fn run_interactive(&self, _backends: Backends) -> Result<CommandResult> {
        Err(WizardError::validation(
            "this build has no interactive mode; pass --name to run without it",
        ))
    }
}

#[async_trait(?Send)]
impl CommandHandler for WizardCommand {
    async fn execute(&self) -> Result<CommandResult> {
        let simulate = self.simulate();
        if !simulate {
            GhCli::new().check_prerequisites().await?;
        }
        info!(simulate, interactive = self.args.is_interactive(), "starting wizard");

        let backends = Backends::select(simulate, self.config.template_cache_ttl());
        match self.args.name.as_deref() {
            Some(name) => self.run_non_interactive(name, backends).await,
            None => self.run_interactive(backends).await,
        }
    }

    fn name(&self) -> &'static str {
        "wizard"
    }
}

fn confirm() -> Result<bool> {
    print!("Continue? (y/N) ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_summary(data: &ConfirmationData) {
    println!("🔮 Repository summary");
    for section in &data.sections {
        println!();
        println!("{} {}", section.icon, section.title);
        for item in &section.items {
            println!("   {:<20} {}", format!("{}:", item.label), item.value);
        }
    }
    if !data.warnings.is_empty() {
        println!();
        for warning in &data.warnings {
            println!("⚠️  {warning}");
        }
    }
    println!();
    println!("💻 {}", data.command);
    println!("⏱️  Estimated time: ~{}s", data.estimated_seconds);
    println!();
}

fn print_event(plan: &ExecutionPlan, event: &ProgressEvent) {
    let percent = (plan.overall_progress() * 100.0).round() as u32;
    match event.status {
        TaskStatus::InProgress => {
            println!("{} [{percent:>3}%] {}", event.status.icon(), event.message)
        }
        TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Skipped => println!(
            "{} [{percent:>3}%] {}: {}",
            event.status.icon(),
            event.task_id.display_name(),
            event.message
        ),
        TaskStatus::Pending => {}
    }
}

fn print_result(result: &CreationResult) {
    println!();
    if result.success {
        println!("🎉 {}", result.message);
        if let Some(url) = &result.repository_url {
            println!("   🔗 {url}");
        }
        if let Some(path) = &result.clone_path {
            println!("   📁 {}", path.display());
            println!();
            println!("Next steps:");
            println!("   cd {}", path.display());
        }
    } else if result.cancelled {
        println!("⊘ {}", result.message);
    } else {
        println!("💥 {}", result.message);
    }

    for warning in &result.warnings {
        println!("⚠️  {warning}");
    }
    println!("⏱️  {:.1}s", result.elapsed.as_secs_f64());
}
