use super::types::{Config, CONFIG_TEMPLATE};
use crate::io::WizardPaths;
use crate::{Result, WizardError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads and writes the wizard configuration file
pub struct ConfigLoader {
    /// Location of config.yaml
    path: PathBuf,
}

impl ConfigLoader {
    /// Loader for the standard per-user location
    pub fn new() -> Result<Self> {
        Ok(Self::at(WizardPaths::new()?.config_file()))
    }

    /// Loader for an explicit file
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration; a missing file yields the defaults
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            WizardError::project(format!(
                "Failed to read configuration file {}: {}",
                self.path.display(),
                e
            ))
            .with_cause(e)
        })?;

        let config: Config = serde_yaml_ng::from_str(&contents).map_err(|e| {
            WizardError::invalid_field(
                "config",
                format!(
                    "Failed to parse configuration file {}: {}",
                    self.path.display(),
                    e
                ),
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Write `config` back, creating the directory if needed
    pub fn save(&self, config: &Config) -> Result<()> {
        let yaml = serde_yaml_ng::to_string(config).map_err(|e| {
            WizardError::project(format!("Failed to serialize configuration: {e}")).with_cause(e)
        })?;
        self.write(&yaml)
    }

    /// Write the commented template. Refuses to overwrite unless `force` is set.
    pub fn init(&self, force: bool) -> Result<()> {
        if self.path.exists() && !force {
            return Err(WizardError::validation(format!(
                "Configuration file {} already exists (use --force to overwrite)",
                self.path.display()
            )));
        }
        self.write(CONFIG_TEMPLATE)
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WizardError::project(format!(
                    "Failed to create configuration directory {}: {}",
                    parent.display(),
                    e
                ))
                .with_cause(e)
            })?;
        }

        std::fs::write(&self.path, contents).map_err(|e| {
            WizardError::project(format!(
                "Failed to write configuration file {}: {}",
                self.path.display(),
                e
            ))
            .with_cause(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::at(dir.path().join("config.yaml"));
        assert_eq!(loader.load().unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_theme_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "theme: neon\n").unwrap();

        let err = ConfigLoader::at(&path).load().unwrap_err();
        assert_eq!(err.field(), Some("config"));
    }
}
