//! Discussion template loading and rendering.
//!
//! A template is a Markdown file with a YAML front matter header holding the
//! discussion `title` (and optionally `labels`), followed by the body. Both
//! title and body are rendered with Handlebars against a [`TemplateContext`].

mod context;
mod error;
mod front_matter;
mod renderer;

pub use context::{RepoContext, TemplateContext, WorkflowContext};
pub use error::TemplateError;
pub use front_matter::{
    list_to_array, parse_attributes, split_front_matter, FrontMatter, FrontMatterAttributes,
    Labels,
};
pub use renderer::{
    create_handlebars_registry, RenderedTemplate, TemplateRenderer, DEFAULT_DATE_FORMAT,
};

use std::path::Path;
use tracing::debug;

/// A template file split into front matter attributes and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDocument {
    /// Parsed front matter.
    pub attributes: FrontMatterAttributes,

    /// Everything after the front matter.
    pub body: String,
}

impl TemplateDocument {
    /// Parses template text. `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MalformedTemplate`] if the front matter is
    /// missing, is not valid YAML, or has no `title`.
    pub fn parse(content: &str, path: &Path) -> Result<Self, TemplateError> {
        let malformed = |message: String| TemplateError::MalformedTemplate {
            path: path.display().to_string(),
            message,
        };

        let (header, body) = match split_front_matter(content) {
            Some(split) => (split.header, split.body),
            None => ("", content),
        };
        let attributes = parse_attributes(header).map_err(malformed)?;

        Ok(Self {
            attributes,
            body: body.to_string(),
        })
    }

    /// Labels declared in the front matter.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.attributes.labels()
    }
}

/// Reads and parses a template file.
///
/// # Errors
///
/// Returns [`TemplateError::Io`] if the file can't be read, or
/// [`TemplateError::MalformedTemplate`] if its header can't be parsed.
pub fn load_template(path: &Path) -> Result<TemplateDocument, TemplateError> {
    debug!(path = %path.display(), "Reading from file");

    let content = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    TemplateDocument::parse(&content, path)
}
