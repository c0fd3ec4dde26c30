//! Runner error types.

use crate::platform::PlatformError;

/// Invalid action inputs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The repository is not in `owner/name` form.
    #[error("Invalid repository '{value}', expected 'owner/name'")]
    InvalidRepository { value: String },
}

/// Errors that can occur while running the action.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Invalid action inputs.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Template loading and rendering errors.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Resolving the repository or category, or creating the discussion, failed.
    #[error(
        "An error occurred while creating the discussion. This might be caused by a malformed discussion title, or a typo in the labels. Check {template}!\n\n{source}"
    )]
    Creating {
        /// Template path, as given.
        template: String,
        source: PlatformError,
    },

    /// Writing step outputs failed.
    #[error(transparent)]
    Outputs(#[from] crate::outputs::OutputError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Client(#[from] PlatformError),
}

impl RunnerError {
    /// Whether the runner already logged this error in detail, with every
    /// platform sub-error. Callers should then only annotate, not log again.
    #[must_use]
    pub fn is_logged(&self) -> bool {
        matches!(self, Self::Creating { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_creation_errors_are_logged_by_the_runner() {
        let creating = RunnerError::Creating {
            template: ".github/DISCUSSION_TEMPLATE.md".to_string(),
            source: PlatformError::RepoNotFound {
                owner: "octo".to_string(),
                repo: "hello".to_string(),
            },
        };
        assert!(creating.is_logged());

        let config = RunnerError::from(ConfigError::InvalidRepository {
            value: "bad".to_string(),
        });
        assert!(!config.is_logged());
    }
}
