//! In-process backend used for dry runs and tests

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::debug;

use super::{readme_body, render_template_variables, RepositoryBackend, TemplateSource};
use crate::error::{Result, WizardError};
use crate::wizard::state::{RepositoryConfig, Template};

/// Operations a [`Simulated`] backend can be scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListTemplates,
    RepositoryExists,
    CreateRepository,
    ApplyTemplate,
    AddReadme,
    CloneLocally,
    CurrentUser,
}

/// Pretends to create repositories; nothing leaves the process
pub struct Simulated {
    user: String,
    delay: Duration,
    templates: Vec<Template>,
    failures: HashMap<Operation, WizardError>,
    calls: Mutex<Vec<Operation>>,
    /// Names already taken on the simulated account
    existing: Vec<String>,
    /// README every template ships with
    template_readme: Option<String>,
    /// README of the repository created last
    readme: Mutex<Option<String>>,
}

impl Simulated {
    pub fn new() -> Self {
        Self {
            user: "octocat".to_string(),
            delay: Duration::ZERO,
            templates: sample_templates(),
            failures: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            existing: Vec::new(),
            template_readme: None,
            readme: Mutex::new(None),
        }
    }

    /// Time each operation takes
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_templates(mut self, templates: Vec<Template>) -> Self {
        self.templates = templates;
        self
    }

    /// Pretend a repository called `name` already exists
    pub fn with_existing_repository(mut self, name: impl Into<String>) -> Self {
        self.existing.push(name.into());
        self
    }

    /// README copied into repositories generated from a template
    pub fn with_template_readme(mut self, content: impl Into<String>) -> Self {
        self.template_readme = Some(content.into());
        self
    }

    /// README of the repository as the run left it
    pub fn readme(&self) -> Option<String> {
        self.readme.lock().ok().and_then(|readme| readme.clone())
    }

    fn set_readme(&self, content: Option<String>) {
        if let Ok(mut readme) = self.readme.lock() {
            *readme = content;
        }
    }

    /// Make `operation` fail with `error` every time it is called
    pub fn failing(mut self, operation: Operation, error: WizardError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    /// Operations invoked so far, in call order
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    async fn perform(&self, operation: Operation) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operation);
        }
        debug!(?operation, "simulated operation");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Default for Simulated {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_templates() -> Vec<Template> {
    let template = |name: &str, language: &str, stars: u32, description: &str, year: i32| Template {
        id: format!("sim-{name}"),
        name: name.to_string(),
        full_name: format!("octocat/{name}"),
        owner: "octocat".to_string(),
        description: description.to_string(),
        stars,
        language: language.to_string(),
        is_template: true,
        updated_at: Utc.with_ymd_and_hms(year, 1, 15, 0, 0, 0).single(),
        clone_url: format!("https://github.com/octocat/{name}.git"),
        ..Default::default()
    };

    vec![
        template("rust-cli-template", "Rust", 42, "Command-line app with clap and tracing", 2025),
        template("web-app-template", "TypeScript", 17, "Single page app with tests and CI", 2025),
        template("python-lib-template", "Python", 8, "Packaged library with pytest setup", 2021),
    ]
}

#[async_trait]
impl TemplateSource for Simulated {
    async fn list_templates(&self) -> Result<Vec<Template>> {
        self.perform(Operation::ListTemplates).await?;
        Ok(self.templates.clone())
    }
}

#[async_trait]
impl RepositoryBackend for Simulated {
    async fn create_repository(
        &self,
        config: &RepositoryConfig,
        _template: Option<&Template>,
    ) -> Result<String> {
        self.perform(Operation::CreateRepository).await?;
        self.set_readme(None);
        Ok(format!("https://github.com/{}/{}", self.user, config.name))
    }

    async fn repository_exists(&self, name: &str) -> Result<bool> {
        self.perform(Operation::RepositoryExists).await?;
        Ok(self.existing.iter().any(|existing| existing.eq_ignore_ascii_case(name)))
    }

    async fn apply_template(&self, config: &RepositoryConfig, _template: &Template) -> Result<()> {
        self.perform(Operation::ApplyTemplate).await?;
        if let Some(content) = &self.template_readme {
            self.set_readme(Some(render_template_variables(content, config)));
        }
        Ok(())
    }

    async fn add_readme(&self, config: &RepositoryConfig) -> Result<()> {
        self.perform(Operation::AddReadme).await?;
        if self.readme().is_none() {
            self.set_readme(Some(readme_body(config)));
        }
        Ok(())
    }

    async fn clone_locally(
        &self,
        config: &RepositoryConfig,
        _repository_url: Option<&str>,
    ) -> Result<PathBuf> {
        self.perform(Operation::CloneLocally).await?;
        Ok(PathBuf::from(".").join(&config.name))
    }

    async fn current_user(&self) -> Result<String> {
        self.perform(Operation::CurrentUser).await?;
        Ok(self.user.clone())
    }
}
