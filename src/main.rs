use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use gh_wizard::{
    cli::commands::{
        auth::AuthCommand, config::ConfigCommand, wizard::WizardCommand, CommandHandler,
        CommandResult,
    },
    cli::{Cli, Commands, LogLevel},
    config::ConfigLoader,
    io::WizardPaths,
};
use tracing_subscriber::EnvFilter;

/// Install the subscriber. Interactive runs own the terminal, so they log to a file.
fn initialize_tracing(log_level: &LogLevel, interactive: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    if interactive {
        let paths = WizardPaths::new()?;
        paths.ensure_data_dir()?;
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths.log_file())
            .with_context(|| format!("failed to open log file {}", paths.log_file().display()))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr) // stdout carries the command's own output
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_level = cli.log_level;
    let loader = match cli.config.clone() {
        Some(path) => ConfigLoader::at(path),
        None => ConfigLoader::new().context("failed to locate the configuration directory")?,
    };
    let command = cli.into_command();

    initialize_tracing(&log_level, command.is_interactive())?;
    tracing::debug!(command = command.name(), config = %loader.path().display(), "starting");

    let handler: Box<dyn CommandHandler> = match command {
        Commands::Wizard(args) => {
            let config = match loader.load() {
                Ok(config) => config,
                Err(e) => exit_with(&e),
            };
            Box::new(WizardCommand::new(args, config, loader))
        }
        Commands::Config { action } => Box::new(ConfigCommand::new(action, loader)),
        Commands::Auth => Box::new(AuthCommand::new()),
    };

    match handler.execute().await {
        Ok(result) => {
            tracing::info!(command = handler.name(), ?result, "command finished");
            if let CommandResult::Warning(message) = &result {
                eprintln!("⚠️  {message}");
            }
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

/// Print a fatal error with its hint and exit non-zero
fn exit_with(error: &gh_wizard::WizardError) -> ! {
    tracing::error!(kind = %error.kind(), "{error}");
    eprintln!("❌ Error: {error}");
    if let Some(hint) = error.hint() {
        eprintln!("💡 {hint}");
    }
    std::process::exit(1);
}
