use crate::{Result, WizardError};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Locations of the wizard's configuration and log files
#[derive(Debug, Clone)]
pub struct WizardPaths {
    /// Configuration directory (e.g. ~/.config/gh-wizard/)
    pub config_dir: PathBuf,
    /// Data directory holding the log file
    pub data_dir: PathBuf,
    /// Cache directory holding the template list
    pub cache_dir: PathBuf,
}

impl WizardPaths {
    /// Resolve the standard per-user directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "gh-wizard").ok_or_else(|| {
            WizardError::project("Failed to determine the home directory")
        })?;

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            data_dir: dirs.data_local_dir().to_path_buf(),
            cache_dir: dirs.cache_dir().to_path_buf(),
        })
    }

    /// Paths rooted at an explicit directory
    pub fn rooted_at(root: &std::path::Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            data_dir: root.to_path_buf(),
            cache_dir: root.join("cache"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("gh-wizard.log")
    }

    pub fn template_cache_file(&self) -> PathBuf {
        self.cache_dir.join("templates.yaml")
    }

    /// Create the data directory if needed
    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            WizardError::project(format!(
                "Failed to create data directory {}: {}",
                self.data_dir.display(),
                e
            ))
            .with_cause(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_paths() {
        let paths = WizardPaths::rooted_at(std::path::Path::new("/tmp/wizard"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/wizard/config.yaml"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/wizard/gh-wizard.log"));
        assert_eq!(
            paths.template_cache_file(),
            PathBuf::from("/tmp/wizard/cache/templates.yaml")
        );
    }
}
