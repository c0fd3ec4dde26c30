//! Runner configuration.

use super::error::ConfigError;
use crate::outputs::ActionOutputs;
use crate::templates::{RepoContext, TemplateContext, WorkflowContext};
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Template used when the `filename` input is not set.
pub const DEFAULT_TEMPLATE_PATH: &str = ".github/DISCUSSION_TEMPLATE.md";

/// Configuration for a single action run.
///
/// Holds everything the pipeline would otherwise read from the process:
/// environment, clock, workflow context and output channel.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the discussion template.
    template_path: PathBuf,
    /// Name of the discussion category to file under.
    category: String,
    /// Repository owner.
    owner: String,
    /// Repository name.
    repo: String,
    /// GitHub token used for API calls.
    token: String,
    /// Base URI of the GitHub API, if not the public one.
    api_url: Option<String>,
    /// GraphQL endpoint, if not the one belonging to `api_url`.
    graphql_url: Option<String>,
    /// Environment exposed to templates as `env`.
    env: BTreeMap<String, String>,
    /// Milliseconds since the Unix epoch, exposed as `date`.
    timestamp_millis: i64,
    /// Workflow run details exposed to templates.
    workflow: WorkflowContext,
    /// Where `number` and `url` are reported.
    outputs: ActionOutputs,
}

impl RunnerConfig {
    /// Creates a configuration with an empty environment, the current time,
    /// and outputs printed to stdout.
    ///
    /// An empty `template_path` falls back to [`DEFAULT_TEMPLATE_PATH`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepository`] if `repository` is not `owner/name`.
    pub fn new(
        template_path: Option<PathBuf>,
        category: String,
        repository: &str,
        token: String,
    ) -> Result<Self, ConfigError> {
        let (owner, repo) = parse_repository(repository)?;
        let template_path = template_path
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH));

        Ok(Self {
            template_path,
            category,
            owner,
            repo,
            token,
            api_url: None,
            graphql_url: None,
            env: BTreeMap::new(),
            timestamp_millis: Utc::now().timestamp_millis(),
            workflow: WorkflowContext::default(),
            outputs: ActionOutputs::stdout(),
        })
    }

    /// Like [`RunnerConfig::new`], but snapshots the process environment for
    /// templates, the workflow context and the output channel.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepository`] if `repository` is not `owner/name`.
    pub fn from_env(
        template_path: Option<PathBuf>,
        category: String,
        repository: &str,
        token: String,
    ) -> Result<Self, ConfigError> {
        let env: BTreeMap<String, String> = std::env::vars().collect();
        let workflow = WorkflowContext::from_env(&env);
        let outputs = ActionOutputs::from_env(&env);

        Ok(Self::new(template_path, category, repository, token)?
            .with_workflow(workflow)
            .with_outputs(outputs)
            .with_env(env))
    }

    /// Sets the environment exposed to templates.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Sets the timestamp exposed to templates.
    pub fn with_timestamp_millis(mut self, timestamp_millis: i64) -> Self {
        self.timestamp_millis = timestamp_millis;
        self
    }

    /// Sets the workflow context exposed to templates.
    pub fn with_workflow(mut self, workflow: WorkflowContext) -> Self {
        self.workflow = workflow;
        self
    }

    /// Sets where outputs are written.
    pub fn with_outputs(mut self, outputs: ActionOutputs) -> Self {
        self.outputs = outputs;
        self
    }

    /// Sets a custom GitHub API base URI.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.api_url = api_url.filter(|url| !url.is_empty());
        self
    }

    /// Sets a custom GitHub GraphQL endpoint.
    pub fn with_graphql_url(mut self, graphql_url: Option<String>) -> Self {
        self.graphql_url = graphql_url.filter(|url| !url.is_empty());
        self
    }

    /// Returns the template path.
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Returns the requested category name.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the GitHub API base URI override.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Returns the GitHub GraphQL endpoint override.
    pub fn graphql_url(&self) -> Option<&str> {
        self.graphql_url.as_deref()
    }

    /// Returns the output channel.
    pub fn outputs(&self) -> &ActionOutputs {
        &self.outputs
    }

    /// Builds the context templates are rendered against.
    pub fn template_context(&self) -> TemplateContext {
        TemplateContext {
            workflow: self.workflow.clone(),
            repo: RepoContext {
                owner: self.owner.clone(),
                repo: self.repo.clone(),
            },
            env: self.env.clone(),
            date: self.timestamp_millis,
        }
    }
}

/// Splits `owner/name`.
fn parse_repository(repository: &str) -> Result<(String, String), ConfigError> {
    let invalid = || ConfigError::InvalidRepository {
        value: repository.to_string(),
    };

    let (owner, name) = repository.trim().split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return Err(invalid());
    }

    Ok((owner.to_string(), name.to_string()))
}
