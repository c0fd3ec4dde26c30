//! Platform error types.

use thiserror::Error;

/// Errors that can occur while talking to the discussion platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The repository does not exist or is not visible to the token.
    #[error("Could not find repo: {owner}/{repo}")]
    RepoNotFound { owner: String, repo: String },

    /// The repository has no discussion categories.
    #[error("Discussions are not enabled on {owner}/{repo}")]
    DiscussionsDisabled { owner: String, repo: String },

    /// No category matched the requested name.
    #[error("Could not find discussion category \"{category}\" in {owner}/{repo}.")]
    CategoryNotFound {
        category: String,
        owner: String,
        repo: String,
    },

    /// The platform rejected or failed the request.
    #[error("{message}")]
    RequestFailed {
        /// Raw message reported by the platform or transport.
        message: String,
        /// Individual error messages, when the platform reports several.
        errors: Vec<String>,
    },

    /// A configured endpoint is not a usable absolute URL.
    #[error("Invalid GitHub endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl PlatformError {
    /// Detailed sub-errors reported alongside the main message.
    #[must_use]
    pub fn sub_errors(&self) -> &[String] {
        match self {
            Self::RequestFailed { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<octocrab::Error> for PlatformError {
    fn from(error: octocrab::Error) -> Self {
        match &error {
            octocrab::Error::GitHub { source, .. } => Self::RequestFailed {
                message: source.message.clone(),
                errors: source
                    .errors
                    .iter()
                    .flatten()
                    .map(|e| {
                        e.get("message")
                            .and_then(serde_json::Value::as_str)
                            .map_or_else(|| e.to_string(), str::to_string)
                    })
                    .collect(),
            },
            octocrab::Error::Graphql { source, .. } => {
                let errors: Vec<String> = source.0.iter().map(|e| e.message.clone()).collect();
                Self::RequestFailed {
                    message: errors.first().cloned().unwrap_or_else(|| source.to_string()),
                    errors,
                }
            }
            // octocrab's own Display appends a backtrace; report the cause instead.
            _ => Self::RequestFailed {
                message: std::error::Error::source(&error)
                    .map_or_else(|| error.to_string(), ToString::to_string),
                errors: Vec::new(),
            },
        }
    }
}
