//! GraphQL response envelope.

use super::PlatformError;
use serde::Deserialize;

/// A GraphQL response: `data`, `errors`, or both.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    message: String,
}

impl<T> GraphQlResponse<T> {
    /// Returns the data, or the reported errors as [`PlatformError::RequestFailed`].
    ///
    /// Any error fails the request even if partial data came back.
    pub(crate) fn into_result(self, operation: &str) -> Result<T, PlatformError> {
        let errors: Vec<String> = self
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.message)
            .collect();

        if let Some(first) = errors.first() {
            return Err(PlatformError::RequestFailed {
                message: format!("{operation}: {first}"),
                errors,
            });
        }

        self.data.ok_or_else(|| PlatformError::RequestFailed {
            message: format!("{operation}: response contained no data"),
            errors: Vec::new(),
        })
    }
}
