//! Shared wizard state: the active step, the template choice and the repository settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WizardError};

/// Maximum repository name length accepted by the hosting provider
pub const MAX_NAME_LENGTH: usize = 100;

/// One screen/stage of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    Welcome,
    TemplateSelection,
    RepositorySettings,
    Confirmation,
    Execution,
    Completed,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Welcome => "Welcome",
            Step::TemplateSelection => "Template Selection",
            Step::RepositorySettings => "Repository Settings",
            Step::Confirmation => "Confirmation",
            Step::Execution => "Execution",
            Step::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A template repository a new project may be seeded from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    pub owner: String,
    pub description: String,
    pub stars: u32,
    pub forks: u32,
    pub language: String,
    pub topics: Vec<String>,
    pub is_template: bool,
    pub private: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub clone_url: String,
}

impl Template {
    /// Name decorated with star count and language, e.g. `rust-cli (⭐ 12) [Rust]`
    pub fn display_name(&self) -> String {
        let mut result = self.name.clone();
        if self.stars > 0 {
            result.push_str(&format!(" (⭐ {})", self.stars));
        }
        if !self.language.is_empty() {
            result.push_str(&format!(" [{}]", self.language));
        }
        result
    }

    pub fn short_description(&self) -> String {
        if self.description.is_empty() {
            return "No description".to_string();
        }
        if self.description.chars().count() > 72 {
            let truncated: String = self.description.chars().take(72).collect();
            return format!("{truncated}...");
        }
        self.description.clone()
    }

    pub fn repo_url(&self) -> String {
        format!("https://github.com/{}", self.full_name)
    }
}

/// Settings of the repository being created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub should_clone: bool,
    pub add_readme: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            is_private: true,
            should_clone: true,
            add_readme: true,
        }
    }
}

impl RepositoryConfig {
    /// Minimal checks required before leaving the settings step
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(WizardError::invalid_field(
                "repository_name",
                "repository name is required",
            ));
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(WizardError::invalid_field(
                "repository_name",
                format!("repository name must be at most {MAX_NAME_LENGTH} characters"),
            ));
        }
        Ok(())
    }

    /// Arguments for `gh` that create this repository in one call
    pub fn gh_args(&self, template: Option<&Template>) -> Vec<String> {
        let mut args = vec!["repo".to_string(), "create".to_string(), self.name.clone()];

        if let Some(template) = template {
            args.push("--template".to_string());
            args.push(template.full_name.clone());
        }

        if !self.description.is_empty() {
            args.push("--description".to_string());
            args.push(self.description.clone());
        }

        args.push(if self.is_private { "--private" } else { "--public" }.to_string());

        if self.should_clone {
            args.push("--clone".to_string());
        }

        // Template repositories bring their own README
        if self.add_readme && template.is_none() {
            args.push("--add-readme".to_string());
        }

        args
    }

    /// Shell-style rendering of [`RepositoryConfig::gh_args`] for display
    pub fn gh_command(&self, template: Option<&Template>) -> String {
        let args = self
            .gh_args(template)
            .into_iter()
            .map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("\"{}\"", arg.replace('"', "\\\""))
                } else {
                    arg
                }
            })
            .collect::<Vec<_>>();
        format!("gh {}", args.join(" "))
    }
}

/// In-progress project configuration shared by every screen
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub current_step: Step,
    use_template: bool,
    selected_template: Option<Template>,
    pub repository_config: RepositoryConfig,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given repository defaults instead of the built-in ones
    pub fn with_defaults(repository_config: RepositoryConfig) -> Self {
        Self {
            repository_config,
            ..Self::default()
        }
    }

    pub fn use_template(&self) -> bool {
        self.use_template
    }

    pub fn selected_template(&self) -> Option<&Template> {
        self.selected_template.as_ref()
    }

    /// Choosing "no template" drops any previously selected template
    pub fn set_use_template(&mut self, use_template: bool) {
        self.use_template = use_template;
        if !use_template {
            self.selected_template = None;
        }
    }

    pub fn select_template(&mut self, template: Template) {
        self.use_template = true;
        self.selected_template = Some(template);
    }

    /// Whether the step-specific precondition for leaving the current step holds
    pub fn can_proceed_to_next(&self) -> bool {
        match self.current_step {
            Step::Welcome => true,
            Step::TemplateSelection => !self.use_template || self.selected_template.is_some(),
            Step::RepositorySettings => self.repository_config.validate().is_ok(),
            Step::Confirmation => true,
            Step::Execution | Step::Completed => false,
        }
    }

    /// Step following the current one in the (conditional) sequence
    pub fn next_step(&self) -> Option<Step> {
        match self.current_step {
            Step::Welcome if self.use_template => Some(Step::TemplateSelection),
            Step::Welcome => Some(Step::RepositorySettings),
            Step::TemplateSelection => Some(Step::RepositorySettings),
            Step::RepositorySettings => Some(Step::Confirmation),
            Step::Confirmation => Some(Step::Execution),
            Step::Execution => Some(Step::Completed),
            Step::Completed => None,
        }
    }

    /// Step preceding the current one; `None` where retreat is never allowed
    pub fn previous_step(&self) -> Option<Step> {
        match self.current_step {
            Step::Welcome | Step::Execution => None,
            Step::TemplateSelection => Some(Step::Welcome),
            Step::RepositorySettings if self.use_template => Some(Step::TemplateSelection),
            Step::RepositorySettings => Some(Step::Welcome),
            Step::Confirmation => Some(Step::RepositorySettings),
            Step::Completed => Some(Step::Execution),
        }
    }

    /// Throw away the run and start over at Welcome, keeping the repository defaults
    pub fn reset(&mut self, defaults: RepositoryConfig) {
        *self = Self::with_defaults(defaults);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Template {
        Template {
            name: "rust-cli".into(),
            full_name: "octo/rust-cli".into(),
            stars: 12,
            language: "Rust".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let state = WizardState::new();
        assert_eq!(state.current_step, Step::Welcome);
        assert!(!state.use_template());
        assert!(state.repository_config.is_private);
        assert!(state.repository_config.should_clone);
        assert!(state.repository_config.add_readme);
    }

    #[test]
    fn test_disabling_template_clears_selection() {
        let mut state = WizardState::new();
        state.select_template(template());
        assert!(state.use_template());
        assert!(state.selected_template().is_some());

        state.set_use_template(false);
        assert!(state.selected_template().is_none());
    }

    #[test]
    fn test_step_sequence_depends_on_template_choice() {
        let mut state = WizardState::new();
        assert_eq!(state.next_step(), Some(Step::RepositorySettings));

        state.set_use_template(true);
        assert_eq!(state.next_step(), Some(Step::TemplateSelection));

        state.current_step = Step::RepositorySettings;
        assert_eq!(state.previous_step(), Some(Step::TemplateSelection));

        state.set_use_template(false);
        assert_eq!(state.previous_step(), Some(Step::Welcome));
    }

    #[test]
    fn test_gh_args() {
        let config = RepositoryConfig {
            name: "demo".into(),
            description: "A demo".into(),
            is_private: false,
            should_clone: true,
            add_readme: true,
        };

        assert_eq!(
            config.gh_args(None),
            vec!["repo", "create", "demo", "--description", "A demo", "--public", "--clone", "--add-readme"]
        );

        let with_template = config.gh_args(Some(&template()));
        assert!(with_template.contains(&"--template".to_string()));
        assert!(!with_template.contains(&"--add-readme".to_string()));

        assert_eq!(
            config.gh_command(None),
            "gh repo create demo --description \"A demo\" --public --clone --add-readme"
        );
    }

    #[test]
    fn test_template_display() {
        let t = template();
        assert_eq!(t.display_name(), "rust-cli (⭐ 12) [Rust]");
        assert_eq!(t.short_description(), "No description");
        assert_eq!(t.repo_url(), "https://github.com/octo/rust-cli");
    }
}
