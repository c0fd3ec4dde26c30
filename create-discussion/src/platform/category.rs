//! Discussion category matching.

use super::{DiscussionCategory, PlatformError};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds a category name for comparison: trimmed, accents stripped, lowercased.
#[must_use]
pub fn normalize_category_name(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `candidate` names the same category as `wanted`, ignoring case and accents.
#[must_use]
pub fn category_matches(candidate: &str, wanted: &str) -> bool {
    normalize_category_name(candidate) == normalize_category_name(wanted)
}

/// Picks the category named `wanted` from a repository's categories.
///
/// # Errors
///
/// Returns [`PlatformError::DiscussionsDisabled`] if `categories` is empty,
/// or [`PlatformError::CategoryNotFound`] if none matches.
pub fn find_category(
    categories: &[DiscussionCategory],
    wanted: &str,
    owner: &str,
    repo: &str,
) -> Result<DiscussionCategory, PlatformError> {
    if categories.is_empty() {
        return Err(PlatformError::DiscussionsDisabled {
            owner: owner.to_string(),
            repo: repo.to_string(),
        });
    }

    categories
        .iter()
        .find(|category| category_matches(&category.name, wanted))
        .cloned()
        .ok_or_else(|| PlatformError::CategoryNotFound {
            category: wanted.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
}
