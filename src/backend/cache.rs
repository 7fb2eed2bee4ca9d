//! Template list cache kept on disk between runs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TemplateSource;
use crate::error::{Result, WizardError};
use crate::io::WizardPaths;
use crate::wizard::state::Template;

/// Cache file contents
#[derive(Debug, Serialize, Deserialize)]
struct CachedList {
    /// When the list was fetched (Unix timestamp)
    cached_at: u64,
    templates: Vec<Template>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Serves the template list from a YAML file while it is younger than `ttl`
pub struct CachedTemplates {
    inner: Arc<dyn TemplateSource>,
    path: Option<PathBuf>,
    ttl: Duration,
}

impl CachedTemplates {
    pub fn new(inner: Arc<dyn TemplateSource>, path: PathBuf, ttl: Duration) -> Self {
        Self {
            inner,
            path: Some(path),
            ttl,
        }
    }

    /// Cache in the per-user cache directory; without one every call goes to `inner`
    pub fn in_cache_dir(inner: Arc<dyn TemplateSource>, ttl: Duration) -> Self {
        let path = match WizardPaths::new() {
            Ok(paths) => Some(paths.template_cache_file()),
            Err(e) => {
                warn!("template cache disabled: {e}");
                None
            }
        };
        Self { inner, path, ttl }
    }

    fn load(&self, path: &Path) -> Result<Option<Vec<Template>>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let cached: CachedList = serde_yaml_ng::from_str(&content).map_err(|e| {
            WizardError::project(format!("Failed to parse cache {}: {e}", path.display()))
                .with_cause(e)
        })?;

        let age = Duration::from_secs(unix_now().saturating_sub(cached.cached_at));
        if age > self.ttl {
            debug!(?age, "template cache expired");
            return Ok(None);
        }
        debug!(?age, count = cached.templates.len(), "using cached templates");
        Ok(Some(cached.templates))
    }

    fn save(&self, path: &Path, templates: &[Template]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let cached = CachedList {
            cached_at: unix_now(),
            templates: templates.to_vec(),
        };
        let content = serde_yaml_ng::to_string(&cached).map_err(|e| {
            WizardError::project("Failed to serialize template cache").with_cause(e)
        })?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "saved template cache");
        Ok(())
    }
}

#[async_trait]
impl TemplateSource for CachedTemplates {
    async fn list_templates(&self) -> Result<Vec<Template>> {
        let Some(path) = &self.path else {
            return self.inner.list_templates().await;
        };

        match self.load(path) {
            Ok(Some(templates)) => return Ok(templates),
            Ok(None) => {}
            Err(e) => warn!("ignoring unreadable template cache: {e}"),
        }

        let templates = self.inner.list_templates().await?;
        if let Err(e) = self.save(path, &templates) {
            warn!("could not write template cache: {e}");
        }
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Operation, Simulated};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn count(simulated: &Simulated) -> usize {
        simulated
            .calls()
            .iter()
            .filter(|op| **op == Operation::ListTemplates)
            .count()
    }

    #[tokio::test]
    async fn test_second_listing_comes_from_cache() {
        let dir = TempDir::new().unwrap();
        let simulated = Arc::new(Simulated::new());
        let cache = CachedTemplates::new(
            simulated.clone(),
            dir.path().join("cache").join("templates.yaml"),
            Duration::from_secs(60),
        );

        let first = cache.list_templates().await.unwrap();
        let second = cache.list_templates().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(count(&simulated), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_is_refreshed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("templates.yaml");
        let stale = CachedList {
            cached_at: unix_now() - 3600,
            templates: Vec::new(),
        };
        std::fs::write(&path, serde_yaml_ng::to_string(&stale).unwrap()).unwrap();

        let simulated = Arc::new(Simulated::new());
        let cache = CachedTemplates::new(simulated.clone(), path, Duration::from_secs(60));

        assert_eq!(cache.list_templates().await.unwrap().len(), 3);
        assert_eq!(count(&simulated), 1);
    }

    #[tokio::test]
    async fn test_failed_listing_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("templates.yaml");
        let simulated = Arc::new(
            Simulated::new().failing(Operation::ListTemplates, WizardError::backend("HTTP 502")),
        );
        let cache = CachedTemplates::new(simulated, path.clone(), Duration::from_secs(60));

        assert!(cache.list_templates().await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_back_to_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("templates.yaml");
        std::fs::write(&path, "not: [valid").unwrap();

        let simulated = Arc::new(Simulated::new());
        let cache = CachedTemplates::new(simulated.clone(), path, Duration::from_secs(60));

        assert_eq!(cache.list_templates().await.unwrap().len(), 3);
        assert_eq!(count(&simulated), 1);
    }
}
