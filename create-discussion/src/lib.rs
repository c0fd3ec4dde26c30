#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod outputs;
pub mod platform;
pub mod runner;
pub mod templates;

pub use outputs::{error_annotation, ActionOutputs, OutputError};
pub use platform::{
    category_matches, find_category, resolve_category, resolve_repository, CreatedDiscussion,
    DiscussionCategory, DiscussionPlatform, GitHubPlatform, NewDiscussion, PlatformError,
    RepositoryRecord,
};
pub use runner::{ConfigError, Runner, RunnerConfig, RunnerError, DEFAULT_TEMPLATE_PATH};
pub use templates::{
    list_to_array, load_template, FrontMatterAttributes, Labels, RenderedTemplate,
    TemplateContext, TemplateDocument, TemplateError, TemplateRenderer,
};
