//! Payloads exchanged with the backend contact endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Code the backend puts in `extensions.code` for rejected credentials.
pub const UNAUTHENTICATED_CODE: &str = "UNAUTHENTICATED";

/// Email send mutation, pre-serialized.
pub const SEND_EMAIL_MUTATION: &str = r#"mutation SendEmail($emailData: EmailInput!) {
  sendEmail(emailData: $emailData) {
    success
    messageId
  }
}"#;

/// SMS send mutation, pre-serialized.
pub const SEND_SMS_MUTATION: &str = r#"mutation SendSMS($smsData: SMSInput!) {
  sendSMS(smsData: $smsData) {
    success
    messageId
  }
}"#;

/// Variables for [`SEND_EMAIL_MUTATION`] (key `emailData`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailData {
    pub to: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// Variables for [`SEND_SMS_MUTATION`] (key `smsData`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsData {
    pub to: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// What the backend reports back for a send mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Envelope of every backend response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphqlErrorExtensions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

impl GraphqlError {
    pub fn is_unauthenticated(&self) -> bool {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.code.as_deref())
            == Some(UNAUTHENTICATED_CODE)
    }
}

impl GraphqlResponse {
    /// Errors reported by the backend, empty when there were none.
    pub fn errors(&self) -> &[GraphqlError] {
        self.errors.as_deref().unwrap_or_default()
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.errors().iter().any(GraphqlError::is_unauthenticated)
    }

    /// All error messages joined for display.
    pub fn error_message(&self) -> String {
        let messages: Vec<&str> = self
            .errors()
            .iter()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
            .collect();

        if messages.is_empty() {
            "GraphQL error".to_string()
        } else {
            messages.join("; ")
        }
    }
}
