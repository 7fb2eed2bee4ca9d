//! External collaborators the wizard drives: template listing and repository creation

pub mod cache;
pub mod gh;
pub mod simulated;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::wizard::state::{RepositoryConfig, Template};

pub use cache::CachedTemplates;
pub use gh::GhCli;
pub use simulated::{Operation, Simulated};

/// Pace of the simulated backend in dry runs
const SIMULATED_STEP_DELAY: Duration = Duration::from_millis(400);

/// Placeholder shown when the signed-in user cannot be determined
pub const UNKNOWN_USER: &str = "your-username";

/// Placeholders rewritten in a template's README
const NAME_PLACEHOLDERS: [&str; 4] = [
    "{{PROJECT_NAME}}",
    "{{project_name}}",
    "${PROJECT_NAME}",
    "${project_name}",
];
const DESCRIPTION_PLACEHOLDERS: [&str; 4] = [
    "{{DESCRIPTION}}",
    "{{description}}",
    "${DESCRIPTION}",
    "${description}",
];

/// Supplies the template repositories offered during template selection
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<Template>>;
}

/// Performs the remote and local work of a creation run.
///
/// Each method backs one task of the run. Futures may be dropped mid-flight when the
/// run is cancelled; implementations must leave no orphaned child processes behind.
#[async_trait]
pub trait RepositoryBackend: Send + Sync {
    /// Create the repository and return its web URL
    async fn create_repository(
        &self,
        config: &RepositoryConfig,
        template: Option<&Template>,
    ) -> Result<String>;

    /// Whether a repository called `name` already exists under the signed-in account
    async fn repository_exists(&self, name: &str) -> Result<bool>;

    /// Finish a repository generated from `template`: fill in the placeholders of its README
    async fn apply_template(&self, config: &RepositoryConfig, template: &Template) -> Result<()>;

    /// Add a README unless the repository already has one
    async fn add_readme(&self, config: &RepositoryConfig) -> Result<()>;

    /// Clone the repository into the working directory and return the local path
    async fn clone_locally(
        &self,
        config: &RepositoryConfig,
        repository_url: Option<&str>,
    ) -> Result<PathBuf>;

    /// Login of the account repositories are created under
    async fn current_user(&self) -> Result<String>;
}

/// Backends selected for a run
#[derive(Clone)]
pub struct Backends {
    pub repositories: Arc<dyn RepositoryBackend>,
    pub templates: Arc<dyn TemplateSource>,
}

impl Backends {
    /// The `gh` backed implementation, or the simulated one for dry runs.
    ///
    /// Template lists from `gh` are cached on disk for `template_cache_ttl` when it is set.
    pub fn select(simulate: bool, template_cache_ttl: Option<Duration>) -> Self {
        if simulate {
            let simulated = Arc::new(Simulated::new().with_delay(SIMULATED_STEP_DELAY));
            Self {
                repositories: simulated.clone(),
                templates: simulated,
            }
        } else {
            let gh = Arc::new(GhCli::new());
            let templates: Arc<dyn TemplateSource> = match template_cache_ttl {
                Some(ttl) => Arc::new(CachedTemplates::in_cache_dir(gh.clone(), ttl)),
                None => gh.clone(),
            };
            Self {
                repositories: gh,
                templates,
            }
        }
    }
}

/// README written for repositories that do not get one from a template
pub fn readme_body(config: &RepositoryConfig) -> String {
    let mut body = format!("# {}\n", config.name);
    if !config.description.is_empty() {
        body.push('\n');
        body.push_str(&config.description);
        body.push('\n');
    }
    body
}

/// Replace the project name and description placeholders of a template README.
///
/// Empty settings leave their placeholders untouched.
pub fn render_template_variables(content: &str, config: &RepositoryConfig) -> String {
    let mut rendered = content.to_string();
    let substitutions = [
        (&NAME_PLACEHOLDERS, config.name.as_str()),
        (&DESCRIPTION_PLACEHOLDERS, config.description.as_str()),
    ];
    for (placeholders, value) in substitutions {
        if value.is_empty() {
            continue;
        }
        for placeholder in placeholders {
            rendered = rendered.replace(*placeholder, value);
        }
    }
    rendered
}

/// Look a template up by `owner/name` or plain name
pub fn find_template<'a>(templates: &'a [Template], wanted: &str) -> Option<&'a Template> {
    templates
        .iter()
        .find(|t| t.full_name == wanted)
        .or_else(|| templates.iter().find(|t| t.name == wanted))
}

/// Put recently used templates first, keeping the original order otherwise
pub fn order_by_recent(templates: &mut [Template], recent: &[String]) {
    templates.sort_by_key(|t| {
        recent
            .iter()
            .position(|r| *r == t.full_name)
            .unwrap_or(usize::MAX)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(full_name: &str) -> Template {
        Template {
            name: full_name.split('/').next_back().unwrap_or_default().to_string(),
            full_name: full_name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_find_template_by_full_or_short_name() {
        let templates = vec![template("octo/api-kit"), template("me/cli-kit")];
        assert_eq!(find_template(&templates, "me/cli-kit").unwrap().name, "cli-kit");
        assert_eq!(find_template(&templates, "api-kit").unwrap().full_name, "octo/api-kit");
        assert!(find_template(&templates, "nope").is_none());
    }

    #[test]
    fn test_render_template_variables() {
        let config = RepositoryConfig {
            name: "demo".into(),
            description: "Demo project".into(),
            ..Default::default()
        };
        let readme = "# {{PROJECT_NAME}}\n\n${description}\n\ncd {{project_name}} && ${PROJECT_NAME}\n";
        assert_eq!(
            render_template_variables(readme, &config),
            "# demo\n\nDemo project\n\ncd demo && demo\n"
        );
    }

    #[test]
    fn test_empty_description_keeps_placeholder() {
        let config = RepositoryConfig {
            name: "demo".into(),
            ..Default::default()
        };
        assert_eq!(
            render_template_variables("{{PROJECT_NAME}}: {{DESCRIPTION}}", &config),
            "demo: {{DESCRIPTION}}"
        );
    }

    #[test]
    fn test_readme_body() {
        let config = RepositoryConfig {
            name: "demo".into(),
            description: "Demo project".into(),
            ..Default::default()
        };
        assert_eq!(readme_body(&config), "# demo\n\nDemo project\n");
    }

    #[test]
    fn test_recent_templates_come_first() {
        let mut templates = vec![template("a/one"), template("a/two"), template("a/three")];
        order_by_recent(&mut templates, &["a/three".to_string(), "a/two".to_string()]);
        let names: Vec<_> = templates.iter().map(|t| t.full_name.as_str()).collect();
        assert_eq!(names, vec!["a/three", "a/two", "a/one"]);
    }
}
