use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// gh-wizard: create GitHub repositories interactively
#[derive(Parser)]
#[command(name = "gh-wizard")]
#[command(version = "0.1.0")]
#[command(about = "🔮 GitHub repository wizard")]
#[command(
    long_about = "gh-wizard walks you through creating a GitHub repository, optionally from a template, and clones it locally. Pass --name to skip the interactive screens."
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub wizard: WizardArgs,

    /// Log level
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Configuration file (defaults to the per-user config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The command to run; no subcommand means the wizard with top-level flags
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Wizard(self.wizard))
    }
}

/// Options of the wizard itself
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardArgs {
    /// Template to use (owner/name, name, or 'none')
    #[arg(short, long)]
    pub template: Option<String>,

    /// Repository name; runs without the interactive screens
    #[arg(short, long)]
    pub name: Option<String>,

    /// Repository description (non-interactive mode)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Create a public repository (non-interactive mode)
    #[arg(long)]
    pub public: bool,

    /// Do not clone after creating (non-interactive mode)
    #[arg(long)]
    pub no_clone: bool,

    /// Do not add a README (non-interactive mode)
    #[arg(long)]
    pub no_readme: bool,

    /// Simulate the run without calling gh
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,
}

impl WizardArgs {
    pub fn is_interactive(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the repository creation wizard (default)
    Wizard(WizardArgs),

    /// Display and initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check GitHub CLI installation and authentication
    Auth,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a commented configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Wizard(_) => "wizard",
            Commands::Config { .. } => "config",
            Commands::Auth => "auth",
        }
    }

    /// Whether this command takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self, Commands::Wizard(args) if args.is_interactive())
    }
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_no_subcommand_runs_wizard() {
        let cli = Cli::parse_from(["gh-wizard", "--name", "demo", "-t", "none", "--yes"]);
        assert_eq!(cli.log_level, LogLevel::Warn);

        match cli.into_command() {
            Commands::Wizard(args) => {
                assert_eq!(args.name.as_deref(), Some("demo"));
                assert_eq!(args.template.as_deref(), Some("none"));
                assert!(args.yes);
                assert!(!args.dry_run);
                assert!(!args.is_interactive());
            }
            _ => panic!("Wrong command parsed"),
        }
    }

    #[test]
    fn test_bare_invocation_is_interactive() {
        let cli = Cli::parse_from(["gh-wizard"]);
        let command = cli.into_command();
        assert_eq!(command.name(), "wizard");
        assert!(command.is_interactive());
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["gh-wizard", "config", "init", "--force", "--log-level", "debug"]);
        assert_eq!(cli.log_level, LogLevel::Debug);

        match cli.into_command() {
            Commands::Config { action } => assert_eq!(action, ConfigAction::Init { force: true }),
            _ => panic!("Wrong command parsed"),
        }
    }

    #[test]
    fn test_wizard_subcommand_dry_run() {
        let cli = Cli::parse_from(["gh-wizard", "wizard", "--dry-run"]);
        match cli.into_command() {
            Commands::Wizard(args) => {
                assert!(args.dry_run);
                assert!(args.is_interactive());
            }
            _ => panic!("Wrong command parsed"),
        }
    }
}
