//! Backend that shells out to the GitHub CLI

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{readme_body, render_template_variables, RepositoryBackend, TemplateSource};
use crate::error::{Result, WizardError};
use crate::wizard::state::{RepositoryConfig, Template};

const INSTALL_URL: &str = "https://cli.github.com/";

/// Repository as returned by the REST API through `gh api`
#[derive(Debug, Deserialize)]
struct ApiRepository {
    id: u64,
    name: String,
    full_name: String,
    owner: ApiOwner,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
    #[serde(default)]
    forks_count: u32,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    is_template: bool,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    clone_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

impl From<ApiRepository> for Template {
    fn from(repo: ApiRepository) -> Self {
        Template {
            id: repo.id.to_string(),
            name: repo.name,
            full_name: repo.full_name,
            owner: repo.owner.login,
            description: repo.description.unwrap_or_default(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language.unwrap_or_default(),
            topics: repo.topics,
            is_template: repo.is_template,
            private: repo.private,
            updated_at: repo.updated_at,
            clone_url: repo.clone_url,
        }
    }
}

/// File entry from the contents API
#[derive(Debug, Deserialize)]
struct ApiFile {
    sha: String,
    /// Base64, wrapped at 60 columns
    #[serde(default)]
    content: String,
}

impl ApiFile {
    fn decoded(&self) -> Result<String> {
        let compact: String = self.content.split_whitespace().collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| {
                WizardError::backend(format!("README.md is not valid base64: {e}"))
                    .permanent()
                    .with_cause(e)
            })?;
        String::from_utf8(bytes).map_err(|e| {
            WizardError::backend("README.md is not UTF-8 text")
                .permanent()
                .with_cause(e)
        })
    }
}

/// `gh api` reports a missing resource as "Not Found (HTTP 404)"
fn is_not_found(error: &WizardError) -> bool {
    error.to_string().contains("HTTP 404")
}

/// Parse the output of `gh api --paginate`, which prints one JSON array per page
fn parse_repository_pages(output: &str) -> Result<Vec<ApiRepository>> {
    let mut repositories = Vec::new();
    for page in serde_json::Deserializer::from_str(output).into_iter::<Vec<ApiRepository>>() {
        let page = page.map_err(|e| {
            WizardError::backend(format!("unexpected response from gh api: {e}"))
                .permanent()
                .with_cause(e)
        })?;
        repositories.extend(page);
    }
    Ok(repositories)
}

/// Find the repository URL `gh repo create` prints on success
fn parse_created_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .rev()
        .find(|line| line.starts_with("https://"))
        .map(str::to_string)
}

/// `gh` command runner implementing both collaborators
pub struct GhCli {
    program: String,
    login: OnceCell<String>,
}

impl GhCli {
    pub fn new() -> Self {
        Self::with_program("gh")
    }

    /// Use a different executable, e.g. a wrapper script
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            login: OnceCell::new(),
        }
    }

    async fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        debug!(program = %self.program, args = ?args, "running command");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    WizardError::backend(format!(
                        "GitHub CLI ({}) was not found. Install it from {INSTALL_URL}",
                        self.program
                    ))
                    .permanent()
                    .with_cause(e)
                } else {
                    WizardError::backend(format!("failed to run {}: {e}", self.program)).with_cause(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let subcommand = args.iter().take(2).cloned().collect::<Vec<_>>().join(" ");
            return Err(WizardError::backend(format!(
                "{} {subcommand} failed: {}",
                self.program,
                if stderr.is_empty() { output.status.to_string() } else { stderr }
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn owner(&self) -> Result<&str> {
        self.login
            .get_or_try_init(|| async {
                let login = self.run(["api", "user", "--jq", ".login"]).await?;
                if login.is_empty() {
                    return Err(WizardError::backend("gh api user returned no login"));
                }
                Ok(login)
            })
            .await
            .map(String::as_str)
    }

    /// README.md of `owner/name`, or `None` when the repository has none
    async fn fetch_readme(&self, owner: &str, name: &str) -> Result<Option<ApiFile>> {
        match self
            .run(["api".to_string(), format!("repos/{owner}/{name}/contents/README.md")])
            .await
        {
            Ok(output) => {
                let file = serde_json::from_str(&output).map_err(|e| {
                    WizardError::backend(format!("unexpected response from gh api: {e}"))
                        .permanent()
                        .with_cause(e)
                })?;
                Ok(Some(file))
            }
            Err(error) if is_not_found(&error) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Create README.md, or replace the revision `sha` of it
    async fn put_readme(
        &self,
        owner: &str,
        name: &str,
        message: &str,
        body: &str,
        sha: Option<&str>,
    ) -> Result<()> {
        let content = base64::engine::general_purpose::STANDARD.encode(body);
        let mut args = vec![
            "api".to_string(),
            "--method".to_string(),
            "PUT".to_string(),
            format!("repos/{owner}/{name}/contents/README.md"),
            "-f".to_string(),
            format!("message={message}"),
            "-f".to_string(),
            format!("content={content}"),
        ];
        if let Some(sha) = sha {
            args.extend(["-f".to_string(), format!("sha={sha}")]);
        }
        self.run(args).await?;
        Ok(())
    }

    /// Installed `gh` version line
    pub async fn version(&self) -> Result<String> {
        let output = self.run(["--version"]).await?;
        Ok(output.lines().next().unwrap_or_default().to_string())
    }

    /// `git` and `gh` must be installed and `gh` signed in
    pub async fn check_prerequisites(&self) -> Result<()> {
        let git = Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await;
        if git.is_err() {
            return Err(WizardError::validation(
                "git was not found. Install Git before creating repositories",
            ));
        }

        self.version().await.map_err(|_| {
            WizardError::validation(format!("GitHub CLI (gh) was not found. Install it from {INSTALL_URL}"))
        })?;

        self.run(["auth", "status"]).await.map_err(|_| {
            WizardError::validation("GitHub CLI is not logged in. Run 'gh auth login' first")
        })?;

        Ok(())
    }
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateSource for GhCli {
    async fn list_templates(&self) -> Result<Vec<Template>> {
        let output = self.run(["api", "user/repos", "--paginate"]).await?;
        let templates = parse_repository_pages(&output)?
            .into_iter()
            .filter(|repo| repo.is_template)
            .map(Template::from)
            .collect::<Vec<_>>();
        debug!(count = templates.len(), "listed template repositories");
        Ok(templates)
    }
}

#[async_trait]
impl RepositoryBackend for GhCli {
    async fn create_repository(
        &self,
        config: &RepositoryConfig,
        template: Option<&Template>,
    ) -> Result<String> {
        // Cloning and the README are separate steps of the run
        let create_only = RepositoryConfig {
            should_clone: false,
            add_readme: false,
            ..config.clone()
        };
        let stdout = self.run(create_only.gh_args(template)).await?;

        match parse_created_url(&stdout) {
            Some(url) => Ok(url),
            None => Ok(format!("https://github.com/{}/{}", self.owner().await?, config.name)),
        }
    }

    async fn repository_exists(&self, name: &str) -> Result<bool> {
        let owner = self.owner().await?;
        match self
            .run([
                "api".to_string(),
                format!("repos/{owner}/{name}"),
                "--jq".to_string(),
                ".full_name".to_string(),
            ])
            .await
        {
            Ok(_) => Ok(true),
            Err(error) if is_not_found(&error) => Ok(false),
            Err(error) => Err(WizardError::backend(format!(
                "could not check whether {owner}/{name} already exists"
            ))
            .with_cause(error)),
        }
    }

    async fn apply_template(&self, config: &RepositoryConfig, template: &Template) -> Result<()> {
        let owner = self.owner().await?;
        let generated_from = self
            .run([
                "api".to_string(),
                format!("repos/{owner}/{}", config.name),
                "--jq".to_string(),
                ".template_repository.full_name // \"\"".to_string(),
            ])
            .await?;

        if generated_from != template.full_name {
            return Err(WizardError::backend(format!(
                "{owner}/{} was not generated from {}",
                config.name, template.full_name
            ))
            .permanent());
        }

        let Some(readme) = self.fetch_readme(owner, &config.name).await? else {
            debug!(template = %template.full_name, "template has no README to fill in");
            return Ok(());
        };
        let original = readme.decoded()?;
        let rendered = render_template_variables(&original, config);
        if rendered == original {
            return Ok(());
        }
        self.put_readme(
            owner,
            &config.name,
            "Fill in template placeholders",
            &rendered,
            Some(&readme.sha),
        )
        .await
    }

    async fn add_readme(&self, config: &RepositoryConfig) -> Result<()> {
        let owner = self.owner().await?;
        if self.fetch_readme(owner, &config.name).await?.is_some() {
            debug!(repository = %config.name, "README already present");
            return Ok(());
        }
        self.put_readme(owner, &config.name, "Add README", &readme_body(config), None)
            .await
    }

    async fn clone_locally(
        &self,
        config: &RepositoryConfig,
        repository_url: Option<&str>,
    ) -> Result<PathBuf> {
        let source = match repository_url {
            Some(url) => url.to_string(),
            None => format!("{}/{}", self.owner().await?, config.name),
        };
        let target = std::env::current_dir()?.join(&config.name);
        if target.exists() {
            return Err(WizardError::project(format!(
                "{} already exists, not cloning over it",
                target.display()
            )));
        }

        self.run([
            "repo".to_string(),
            "clone".to_string(),
            source,
            target.display().to_string(),
        ])
        .await?;
        Ok(target)
    }

    async fn current_user(&self) -> Result<String> {
        self.owner().await.map(str::to_string)
    }
}
