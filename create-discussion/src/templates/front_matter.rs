//! YAML front matter splitting and deserialization.

use serde::Deserialize;

/// Opening and closing delimiter of a front matter block.
const DELIMITER: &str = "---";

/// Alternative closing delimiter (YAML end-of-document marker).
const END_OF_DOCUMENT: &str = "...";

/// Parsed attributes from the front matter of a discussion template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrontMatterAttributes {
    /// Discussion title, may contain placeholders.
    pub title: String,

    /// Labels, either a comma-joined string or a list.
    #[serde(default)]
    pub labels: Option<Labels>,
}

/// Labels as written in the front matter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Labels {
    /// `labels: [bug, question]`
    List(Vec<String>),
    /// `labels: bug, question`
    Joined(String),
}

impl FrontMatterAttributes {
    /// Returns the labels as an ordered list.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        list_to_array(self.labels.as_ref())
    }
}

/// A template split into its raw header and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// YAML between the delimiters.
    pub header: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Splits a front matter block from the start of `content`.
///
/// The block must open on the first line with `---` and closes at the next
/// line consisting of `---` or `...`. Returns `None` when the content does
/// not start with a complete block.
#[must_use]
pub fn split_front_matter(content: &str) -> Option<FrontMatter<'_>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == DELIMITER || trimmed == END_OF_DOCUMENT {
            return Some(FrontMatter {
                header: &content[header_start..offset],
                body: &content[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    None
}

/// Parses a front matter header into attributes.
///
/// # Errors
///
/// Returns a human readable message if the header is empty, is not valid
/// YAML, or lacks a string `title`.
pub fn parse_attributes(header: &str) -> Result<FrontMatterAttributes, String> {
    if header.trim().is_empty() {
        return Err("missing front matter with a `title` field".to_string());
    }

    serde_yaml::from_str(header).map_err(|e| e.to_string())
}

/// Normalizes a label specification into an ordered list.
///
/// `None` yields an empty list and a list is returned as-is. A string is
/// split on `", "`, so `"a,b"` stays a single label. Items are trimmed and
/// empty ones dropped.
#[must_use]
pub fn list_to_array(labels: Option<&Labels>) -> Vec<String> {
    match labels {
        None => Vec::new(),
        Some(Labels::List(list)) => list.clone(),
        Some(Labels::Joined(joined)) => joined
            .split(", ")
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect(),
    }
}
