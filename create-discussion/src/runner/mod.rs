//! Orchestrates rendering a template and opening a discussion from it.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_TEMPLATE_PATH};
pub use error::{ConfigError, RunnerError};

use crate::platform::{
    resolve_category, resolve_repository, CreatedDiscussion, DiscussionPlatform, GitHubPlatform,
    NewDiscussion, PlatformError,
};
use crate::templates::{load_template, RenderedTemplate, TemplateRenderer};
use tracing::{debug, error, info};

/// Runs the action: load → render → resolve → create → report.
pub struct Runner<P> {
    config: RunnerConfig,
    platform: P,
    renderer: TemplateRenderer,
}

impl Runner<GitHubPlatform> {
    /// Builds a runner talking to GitHub with the configured token.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let platform = GitHubPlatform::new(config.token(), config.api_url(), config.graphql_url())?;
        Ok(Self::with_platform(config, platform))
    }
}

impl<P: DiscussionPlatform> Runner<P> {
    /// Builds a runner on top of any platform implementation.
    pub fn with_platform(config: RunnerConfig, platform: P) -> Self {
        Self {
            config,
            platform,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Returns the platform the runner talks to.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Executes the full flow and reports the `number` and `url` outputs.
    pub async fn run(&self) -> Result<CreatedDiscussion, RunnerError> {
        let template = self.config.template_path();

        let document = load_template(template)?;
        info!(
            template = %template.display(),
            title = %document.attributes.title,
            labels = ?document.labels(),
            "Front matter parsed"
        );

        let rendered = self
            .renderer
            .render(&document, &self.config.template_context())?;
        debug!(title = %rendered.title, body = %rendered.body, "Templates compiled");

        info!(title = %rendered.title, "Creating new discussion");
        let discussion = match self.create(rendered).await {
            Ok(discussion) => discussion,
            Err(source) => {
                let err = RunnerError::Creating {
                    template: template.display().to_string(),
                    source,
                };
                report_creation_error(&err);
                return Err(err);
            }
        };

        self.config.outputs().set_outputs(&discussion)?;
        info!(
            "Created discussion {}#{}: {}",
            discussion.title, discussion.number, discussion.url
        );

        Ok(discussion)
    }

    /// Resolves the repository and category, then creates the discussion.
    async fn create(&self, rendered: RenderedTemplate) -> Result<CreatedDiscussion, PlatformError> {
        let owner = self.config.owner();
        let repo = self.config.repo();

        let repository = resolve_repository(&self.platform, owner, repo).await?;
        let category = resolve_category(&self.platform, owner, repo, self.config.category()).await?;
        debug!(repository_id = %repository.id, category_id = %category.id, "Resolved ids");

        self.platform
            .create_discussion(&NewDiscussion {
                repository_id: repository.id,
                category_id: category.id,
                title: rendered.title,
                body: rendered.body,
            })
            .await
    }
}

fn report_creation_error(err: &RunnerError) {
    if let RunnerError::Creating { template, source } = err {
        error!(
            template = %template,
            "An error occurred while creating the discussion. This might be caused by a malformed discussion title, or a typo in the labels. Check {template}!"
        );
        error!(error = %source, "Platform error");
        for detail in source.sub_errors() {
            error!(detail = %detail, "Platform error detail");
        }
    }
}
