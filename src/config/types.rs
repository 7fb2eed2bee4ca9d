use serde::{Deserialize, Serialize};

use crate::wizard::state::RepositoryConfig;
use crate::{Result, WizardError};

/// Most recently used templates kept in the configuration
pub const MAX_RECENT_TEMPLATES: usize = 10;

/// Longest run deadline accepted from the configuration (24 hours)
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Color theme for the terminal front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    Dark,
    Light,
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeName::Default => write!(f, "default"),
            ThemeName::Dark => write!(f, "dark"),
            ThemeName::Light => write!(f, "light"),
        }
    }
}

/// User settings read from config.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Create repositories as private unless told otherwise
    pub default_private: bool,

    /// Clone locally after creation
    pub default_clone: bool,

    /// Add a README to repositories created without a template
    pub default_add_readme: bool,

    /// Template list cache timeout in minutes
    pub cache_timeout: i64,

    pub theme: ThemeName,

    /// Recently used templates, most recent first
    pub recent_templates: Vec<String>,

    /// Ceiling for a whole wizard run, in seconds
    pub timeout_secs: u64,

    /// Use the simulated backend instead of calling gh
    pub simulate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_private: true,
            default_clone: true,
            default_add_readme: true,
            cache_timeout: 30,
            theme: ThemeName::Default,
            recent_templates: Vec::new(),
            timeout_secs: 300,
            simulate: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.cache_timeout < 0 {
            return Err(WizardError::invalid_field(
                "config",
                "cache_timeout must be 0 or greater",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(WizardError::invalid_field(
                "config",
                "timeout_secs must be greater than 0",
            ));
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(WizardError::invalid_field(
                "config",
                format!("timeout_secs must be at most {MAX_TIMEOUT_SECS} (24 hours)"),
            ));
        }
        Ok(())
    }

    /// Move `full_name` to the front of the recent list
    pub fn add_recent_template(&mut self, full_name: &str) {
        self.recent_templates.retain(|name| name != full_name);
        self.recent_templates.insert(0, full_name.to_string());
        self.recent_templates.truncate(MAX_RECENT_TEMPLATES);
    }

    /// Initial repository settings for a new wizard run
    pub fn repository_defaults(&self) -> RepositoryConfig {
        RepositoryConfig {
            is_private: self.default_private,
            should_clone: self.default_clone,
            add_readme: self.default_add_readme,
            ..Default::default()
        }
    }

    /// Run deadline, never longer than [`MAX_TIMEOUT_SECS`]
    pub fn run_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.min(MAX_TIMEOUT_SECS))
    }

    /// Template list cache lifetime; `None` disables the cache
    pub fn template_cache_ttl(&self) -> Option<std::time::Duration> {
        match u64::try_from(self.cache_timeout) {
            Ok(0) | Err(_) => None,
            Ok(minutes) => Some(std::time::Duration::from_secs(minutes.saturating_mul(60))),
        }
    }
}

/// Commented template written by `config init`
pub const CONFIG_TEMPLATE: &str = r#"# gh-wizard configuration file

# Default answers for new repositories
default_private: true        # Make repositories private by default
default_clone: true          # Clone locally after creation
default_add_readme: true     # Add a README file

# Template list cache timeout (minutes)
cache_timeout: 30

# UI theme: default, dark, light
theme: default

# Give up on a wizard run after this many seconds
timeout_secs: 300

# Use the simulated backend instead of calling gh
simulate: false

# Recently used templates (updated automatically)
recent_templates: []
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_templates_are_capped_and_deduplicated() {
        let mut config = Config::default();
        for i in 0..12 {
            config.add_recent_template(&format!("octo/t{i}"));
        }
        assert_eq!(config.recent_templates.len(), MAX_RECENT_TEMPLATES);
        assert_eq!(config.recent_templates[0], "octo/t11");

        config.add_recent_template("octo/t5");
        assert_eq!(config.recent_templates[0], "octo/t5");
        assert_eq!(
            config.recent_templates.iter().filter(|n| *n == "octo/t5").count(),
            1
        );
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.cache_timeout = -1;
        assert_eq!(config.validate().unwrap_err().field(), Some("config"));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed: Config = serde_yaml_ng::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
