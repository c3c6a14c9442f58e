//! Generic api response types
use serde::{Deserialize, Serialize};

/// A status report returned for many mutating calls
///
/// Servers answer delete calls with either the deleted object or one of these,
/// depending on how far the deletion has progressed.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Status of the operation, `"Success"` or `"Failure"`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    /// A human-readable description of the status of this operation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// A machine-readable description of why this operation is in this status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Suggested HTTP return code (0 if unset)
    #[serde(default, skip_serializing_if = "is_u16_zero")]
    pub code: u16,
}

impl Status {
    /// Returns a successful `Status`
    pub fn success() -> Self {
        Status {
            status: "Success".to_string(),
            ..Default::default()
        }
    }

    /// Checks if this `Status` reports success
    pub fn is_success(&self) -> bool {
        self.status == "Success"
    }
}

fn is_u16_zero(n: &u16) -> bool {
    *n == 0
}
