use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error response from the API
///
/// Returned by servers in the body of non-2xx responses, and inline on watch
/// streams as `ERROR` events.
#[derive(Error, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[error("{message}: {reason}")]
pub struct ErrorResponse {
    /// The status, usually `"Failure"`
    #[serde(default)]
    pub status: String,
    /// A message about the error
    #[serde(default)]
    pub message: String,
    /// A machine-readable reason for the error
    #[serde(default)]
    pub reason: String,
    /// The suggested http return code
    #[serde(default)]
    pub code: u16,
}
