//! Summary shown before anything is created

use chrono::{DateTime, Duration, Utc};

use super::navigator::Action;
use super::plan::ExecutionPlan;
use super::state::{RepositoryConfig, Step, Template, WizardState};

/// Choices offered on the confirmation screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationAction {
    ModifySettings,
    Cancel,
    CreateRepository,
}

impl ConfirmationAction {
    pub const ALL: [ConfirmationAction; 3] = [
        ConfirmationAction::ModifySettings,
        ConfirmationAction::Cancel,
        ConfirmationAction::CreateRepository,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConfirmationAction::ModifySettings => "Modify settings",
            ConfirmationAction::Cancel => "Cancel",
            ConfirmationAction::CreateRepository => "Create repository",
        }
    }

    /// Shortcut key
    pub fn key(&self) -> char {
        match self {
            ConfirmationAction::ModifySettings => '1',
            ConfirmationAction::Cancel => '2',
            ConfirmationAction::CreateRepository => '3',
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfirmationAction::ModifySettings => "Go back and revise the repository settings",
            ConfirmationAction::Cancel => "Abandon this wizard run and return to the start",
            ConfirmationAction::CreateRepository => "Create the repository with these settings",
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.key() == key)
    }

    /// Navigation this choice triggers
    pub fn navigation(&self) -> Action {
        match self {
            ConfirmationAction::ModifySettings => Action::JumpTo(Step::RepositorySettings),
            ConfirmationAction::Cancel => Action::JumpTo(Step::Welcome),
            ConfirmationAction::CreateRepository => Action::Next,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationItem {
    pub label: String,
    pub value: String,
    pub important: bool,
}

impl ConfirmationItem {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            important: false,
        }
    }

    fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationSection {
    pub title: String,
    pub icon: String,
    pub items: Vec<ConfirmationItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationData {
    pub sections: Vec<ConfirmationSection>,
    pub actions: Vec<ConfirmationAction>,
    pub warnings: Vec<String>,
    pub repository_url: String,
    pub command: String,
    pub estimated_seconds: u64,
}

impl ConfirmationData {
    /// Summarize the state for `user`, judging template age against `now`
    pub fn build(state: &WizardState, user: &str, now: DateTime<Utc>) -> Self {
        let config = &state.repository_config;
        let template = state.selected_template();

        let mut sections = Vec::new();
        if let Some(template) = template {
            sections.push(template_section(template));
        }
        sections.push(repository_section(config));
        sections.push(destination_section(config, user));

        Self {
            sections,
            actions: ConfirmationAction::ALL.to_vec(),
            warnings: warnings(state, now),
            repository_url: format!("https://github.com/{user}/{}", config.name),
            command: config.gh_command(template),
            estimated_seconds: ExecutionPlan::from_state(state).estimated_total().as_secs(),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "✅ Yes"
    } else {
        "❌ No"
    }
}

fn template_section(template: &Template) -> ConfirmationSection {
    let mut items = vec![
        ConfirmationItem::new("Name", &template.name).important(),
        ConfirmationItem::new("Owner", &template.owner),
        ConfirmationItem::new("Language", &template.language),
        ConfirmationItem::new("Stars", format!("⭐ {}", template.stars)),
    ];
    if !template.description.is_empty() {
        items.push(ConfirmationItem::new("Description", &template.description));
    }
    if !template.topics.is_empty() {
        items.push(ConfirmationItem::new("Topics", template.topics.join(", ")));
    }
    if let Some(updated_at) = template.updated_at {
        items.push(ConfirmationItem::new(
            "Last updated",
            updated_at.format("%Y-%m-%d").to_string(),
        ));
    }

    ConfirmationSection {
        title: "Template".to_string(),
        icon: "📚".to_string(),
        items,
    }
}

fn repository_section(config: &RepositoryConfig) -> ConfirmationSection {
    let visibility = if config.is_private {
        "🔒 Private"
    } else {
        "🌐 Public"
    };
    let description = if config.description.is_empty() {
        "(none)"
    } else {
        config.description.as_str()
    };

    ConfirmationSection {
        title: "Repository".to_string(),
        icon: "⚙️".to_string(),
        items: vec![
            ConfirmationItem::new("Name", &config.name).important(),
            ConfirmationItem::new("Visibility", visibility).important(),
            ConfirmationItem::new("Description", description),
            ConfirmationItem::new("Add README", yes_no(config.add_readme)),
            ConfirmationItem::new("Clone after create", yes_no(config.should_clone)),
        ],
    }
}

fn destination_section(config: &RepositoryConfig, user: &str) -> ConfirmationSection {
    let url = if config.name.is_empty() {
        "(not set)".to_string()
    } else {
        format!("https://github.com/{user}/{}", config.name)
    };

    ConfirmationSection {
        title: "Destination".to_string(),
        icon: "📍".to_string(),
        items: vec![
            ConfirmationItem::new("GitHub user", user),
            ConfirmationItem::new("URL", url).important(),
        ],
    }
}

fn warnings(state: &WizardState, now: DateTime<Utc>) -> Vec<String> {
    let config = &state.repository_config;
    let mut warnings = Vec::new();

    if config.name.to_lowercase().contains("test") {
        warnings.push(
            "The repository name contains \"test\". Consider renaming it if this is a real project."
                .to_string(),
        );
    }

    if !config.is_private {
        warnings.push(
            "Public repositories are visible to everyone. Make sure nothing confidential is included."
                .to_string(),
        );
    }

    if let Some(updated_at) = state.selected_template().and_then(|t| t.updated_at) {
        if now.signed_duration_since(updated_at) > Duration::days(365) {
            warnings.push(
                "The selected template has not been updated in over a year. Check that it is still maintained."
                    .to_string(),
            );
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn state() -> WizardState {
        let mut state = WizardState::new();
        state.repository_config = RepositoryConfig {
            name: "demo".into(),
            ..Default::default()
        };
        state
    }

    #[test]
    fn test_sections_without_template() {
        let data = ConfirmationData::build(&state(), "octo", Utc::now());
        let titles: Vec<_> = data.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Repository", "Destination"]);
        assert_eq!(data.repository_url, "https://github.com/octo/demo");
        assert!(data.warnings.is_empty());
        // validate 2s + create 5s + readme 2s + clone 4s
        assert_eq!(data.estimated_seconds, 13);
    }

    #[test]
    fn test_warnings() {
        let mut state = state();
        state.repository_config.name = "my-Test-repo".into();
        state.repository_config.is_private = false;
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        state.select_template(Template {
            name: "old".into(),
            full_name: "octo/old".into(),
            updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single(),
            ..Default::default()
        });

        let data = ConfirmationData::build(&state, "octo", now);
        assert_eq!(data.warnings.len(), 3);
        assert_eq!(data.sections[0].title, "Template");
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            ConfirmationAction::from_key('3'),
            Some(ConfirmationAction::CreateRepository)
        );
        assert!(matches!(
            ConfirmationAction::ModifySettings.navigation(),
            Action::JumpTo(Step::RepositorySettings)
        ));
        assert_eq!(ConfirmationAction::from_key('9'), None);
    }
}
