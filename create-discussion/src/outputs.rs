//! Step outputs and failure annotations for GitHub Actions.
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT`. Outside of a
//! runner (no `GITHUB_OUTPUT`), they are printed to stdout instead.

use crate::platform::CreatedDiscussion;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while writing step outputs.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to write the output file.
    #[error("Failed to write outputs to '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputTarget {
    File(PathBuf),
    Stdout,
}

/// Where the action's named outputs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutputs {
    target: OutputTarget,
}

impl ActionOutputs {
    /// Writes outputs to the given file, appending.
    #[must_use]
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: OutputTarget::File(path.into()),
        }
    }

    /// Prints outputs to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            target: OutputTarget::Stdout,
        }
    }

    /// Uses `GITHUB_OUTPUT` from an environment snapshot, falling back to stdout.
    #[must_use]
    pub fn from_env(env: &BTreeMap<String, String>) -> Self {
        match env.get("GITHUB_OUTPUT").filter(|path| !path.is_empty()) {
            Some(path) => Self::to_file(path),
            None => Self::stdout(),
        }
    }

    /// Output file, if writing to one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            OutputTarget::File(path) => Some(path),
            OutputTarget::Stdout => None,
        }
    }

    /// Reports the created discussion as the `number` and `url` outputs.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Io`] if the output file can't be written.
    pub fn set_outputs(&self, discussion: &CreatedDiscussion) -> Result<(), OutputError> {
        let number = discussion.number.to_string();
        self.write(&[("number", number.as_str()), ("url", discussion.url.as_str())])
    }

    fn write(&self, outputs: &[(&str, &str)]) -> Result<(), OutputError> {
        let mut lines = String::new();
        for (name, value) in outputs {
            debug!(name, value, "Setting output");
            lines.push_str(&format_output(name, value));
        }

        match &self.target {
            OutputTarget::Stdout => {
                print!("{lines}");
                Ok(())
            }
            OutputTarget::File(path) => {
                let io_error = |source| OutputError::Io {
                    path: path.display().to_string(),
                    source,
                };
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(io_error)?;
                file.write_all(lines.as_bytes()).map_err(io_error)
            }
        }
    }
}

/// Formats one output line. Multi-line values use the heredoc form.
fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') {
        format!("{name}<<{DELIMITER}\n{value}\n{DELIMITER}\n")
    } else {
        format!("{name}={value}\n")
    }
}

const DELIMITER: &str = "CREATE_DISCUSSION_EOF";

/// Formats a failure as a workflow `::error::` command.
#[must_use]
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
