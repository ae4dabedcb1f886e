//! Email channel, delivered through the backend `sendEmail` mutation.

use super::{send_mutation, ChannelAdapter};
use crate::domain::{EmailAddress, ValidationError};
use crate::models::wire::SEND_EMAIL_MUTATION;
use crate::models::{Channel, ContactRequest, DispatchResult, EmailData};
use crate::transport::AsyncTransport;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Sends email through the backend.
///
/// By default the recipient is only checked for presence. Strict mode also
/// checks the address format through [`EmailAddress`]; it is opt-in because
/// a format check can turn away legitimate unusual addresses.
pub struct EmailAdapter {
    transport: Arc<dyn AsyncTransport>,
    auth_token: Option<String>,
    strict_validation: bool,
}

impl EmailAdapter {
    pub fn new(transport: Arc<dyn AsyncTransport>, auth_token: Option<String>) -> Self {
        Self {
            transport,
            auth_token,
            strict_validation: false,
        }
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    fn validate(&self, request: &ContactRequest) -> Result<EmailData, String> {
        let to = request.recipient_address.trim();
        if to.is_empty() {
            return Err("Recipient email address is required".to_string());
        }

        if self.strict_validation {
            EmailAddress::new(to).map_err(|e| e.to_string())?;
        }

        if request.message_text().trim().is_empty() {
            return Err(ValidationError::MissingMessage.to_string());
        }

        Ok(EmailData {
            to: to.to_string(),
            subject: request.subject.clone().unwrap_or_default(),
            message: request.message_text().to_string(),
            from: request.sender_address.clone(),
        })
    }
}

#[async_trait]
impl ChannelAdapter for EmailAdapter {
    async fn deliver(&self, request: &ContactRequest) -> DispatchResult {
        let email_data = match self.validate(request) {
            Ok(data) => data,
            Err(message) => return DispatchResult::failure(message),
        };

        tracing::debug!(to = %email_data.to, "Sending email");

        send_mutation(
            self.transport.as_ref(),
            Channel::Email,
            SEND_EMAIL_MUTATION,
            serde_json::json!({ "emailData": email_data }),
            self.auth_token.clone(),
            "sendEmail",
        )
        .await
    }

    fn success_message(&self, _data: &Value) -> String {
        "Email sent successfully!".to_string()
    }
}
