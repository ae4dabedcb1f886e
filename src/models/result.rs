//! Normalized dispatch outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic message the composite inquiry reports when either leg fails.
pub const CONTACT_REQUEST_FAILED: &str = "Failed to send contact request";

/// Outcome of one dispatch attempt.
///
/// A success always carries `data` and never `error`; a failure carries
/// `error` and never `data`. The constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DispatchResult {
    /// A successful dispatch with its channel-specific payload.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed dispatch with a message suitable for direct display.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Both legs of a composite inquiry, so callers can tell a partial failure
/// (email delivered, SMS not) from a total one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequestOutcome {
    pub email: DispatchResult,
    pub sms: DispatchResult,
}

impl ContactRequestOutcome {
    /// True only when both legs succeeded.
    pub fn is_success(&self) -> bool {
        self.email.is_success() && self.sms.is_success()
    }

    /// True when exactly one leg went through.
    pub fn is_partial(&self) -> bool {
        self.email.is_success() != self.sms.is_success()
    }

    /// Collapse to the all-or-nothing result: the leg payloads on success,
    /// the generic failure message otherwise.
    pub fn into_result(self) -> DispatchResult {
        if self.is_success() {
            DispatchResult::ok(serde_json::json!({
                "email": self.email.data,
                "sms": self.sms.data,
            }))
        } else {
            DispatchResult::failure(CONTACT_REQUEST_FAILED)
        }
    }
}
