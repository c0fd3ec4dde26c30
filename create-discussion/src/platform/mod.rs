//! The discussion platform and the lookups the pipeline needs from it.
//!
//! [`DiscussionPlatform`] exposes exactly the three calls the action makes,
//! so the pipeline can run against [`GitHubPlatform`] or an in-memory double.

mod category;
mod error;
mod github;
mod graphql;

pub use category::{category_matches, find_category, normalize_category_name};
pub use error::PlatformError;
pub use github::{graphql_url_for, GitHubPlatform};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Maximum number of categories fetched. There is no pagination.
pub const CATEGORY_PAGE_SIZE: usize = 10;

/// A repository as known to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRecord {
    /// Platform-assigned node id.
    pub id: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

/// A discussion category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionCategory {
    /// Platform-assigned node id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Input for creating a discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDiscussion {
    pub repository_id: String,
    pub category_id: String,
    pub title: String,
    pub body: String,
}

/// A discussion returned by the platform after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedDiscussion {
    /// Platform-assigned node id.
    pub id: String,
    /// Repository-scoped discussion number.
    pub number: u64,
    pub title: String,
    pub url: String,
}

/// Operations the action performs against the hosting platform.
#[async_trait]
pub trait DiscussionPlatform: Send + Sync {
    /// Looks up a repository. `Ok(None)` if it does not exist.
    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<RepositoryRecord>, PlatformError>;

    /// Lists the first [`CATEGORY_PAGE_SIZE`] discussion categories of a repository.
    async fn list_discussion_categories(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<DiscussionCategory>, PlatformError>;

    /// Creates a discussion.
    async fn create_discussion(
        &self,
        discussion: &NewDiscussion,
    ) -> Result<CreatedDiscussion, PlatformError>;
}

/// Resolves a repository's node id.
///
/// # Errors
///
/// Returns [`PlatformError::RepoNotFound`] if the platform has no record of
/// the repository, or any error raised by the platform.
pub async fn resolve_repository<P: DiscussionPlatform + ?Sized>(
    platform: &P,
    owner: &str,
    name: &str,
) -> Result<RepositoryRecord, PlatformError> {
    debug!(owner, name, "Resolving repository");

    platform
        .get_repository(owner, name)
        .await?
        .ok_or_else(|| PlatformError::RepoNotFound {
            owner: owner.to_string(),
            repo: name.to_string(),
        })
}

/// Resolves a category name to the matching discussion category.
///
/// # Errors
///
/// See [`find_category`]; platform errors are passed through.
pub async fn resolve_category<P: DiscussionPlatform + ?Sized>(
    platform: &P,
    owner: &str,
    name: &str,
    category_name: &str,
) -> Result<DiscussionCategory, PlatformError> {
    info!(owner, name, category = category_name, "Getting discussion categories");

    let categories = platform.list_discussion_categories(owner, name).await?;
    debug!(?categories, "Discussion categories");

    find_category(&categories, category_name, owner, name)
}
