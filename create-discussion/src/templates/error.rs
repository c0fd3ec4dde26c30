//! Template loading and rendering error types.

use thiserror::Error;

/// Errors that can occur while loading or rendering a discussion template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Failed to read the template file.
    #[error("Failed to read template '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The front matter header could not be parsed.
    #[error("Malformed template '{path}': {message}")]
    MalformedTemplate { path: String, message: String },

    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    Render(#[from] handlebars::RenderError),
}
