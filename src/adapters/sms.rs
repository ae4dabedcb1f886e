//! SMS channel, delivered through the backend `sendSMS` mutation.

use super::{send_mutation, ChannelAdapter};
use crate::domain::ValidationError;
use crate::models::wire::SEND_SMS_MUTATION;
use crate::models::{Channel, ContactRequest, DispatchResult, SmsData};
use crate::transport::AsyncTransport;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Sends SMS through the backend. The recipient is checked for presence only.
pub struct SmsAdapter {
    transport: Arc<dyn AsyncTransport>,
    auth_token: Option<String>,
}

impl SmsAdapter {
    pub fn new(transport: Arc<dyn AsyncTransport>, auth_token: Option<String>) -> Self {
        Self {
            transport,
            auth_token,
        }
    }

    fn validate(request: &ContactRequest) -> Result<SmsData, String> {
        let to = request.recipient_address.trim();
        if to.is_empty() {
            return Err("Recipient phone number is required".to_string());
        }
        if request.message_text().trim().is_empty() {
            return Err(ValidationError::MissingMessage.to_string());
        }

        Ok(SmsData {
            to: to.to_string(),
            message: request.message_text().to_string(),
            from: request.sender_address.clone(),
        })
    }
}

#[async_trait]
impl ChannelAdapter for SmsAdapter {
    async fn deliver(&self, request: &ContactRequest) -> DispatchResult {
        let sms_data = match Self::validate(request) {
            Ok(data) => data,
            Err(message) => return DispatchResult::failure(message),
        };

        tracing::debug!(to = %sms_data.to, "Sending SMS");

        send_mutation(
            self.transport.as_ref(),
            Channel::Sms,
            SEND_SMS_MUTATION,
            serde_json::json!({ "smsData": sms_data }),
            self.auth_token.clone(),
            "sendSMS",
        )
        .await
    }

    fn success_message(&self, _data: &Value) -> String {
        "SMS sent successfully!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::ScriptedTransport;
    use crate::error::TransportError;
    use serde_json::json;

    #[tokio::test]
    async fn test_sends_sms_data_without_token() {
        let transport = Arc::new(ScriptedTransport::replying(vec![Ok(
            json!({"sendSMS": {"success": true, "messageId": "s-1"}}),
        )]));
        let adapter = SmsAdapter::new(transport.clone(), None);

        let result = adapter
            .deliver(&ContactRequest::sms("+1 555 0100", "Viewing at 5?"))
            .await;

        assert!(result.is_success());
        let sent = transport.requests.lock().unwrap()[0].clone();
        assert_eq!(sent.operation, SEND_SMS_MUTATION);
        assert!(sent.auth_token.is_none());
        assert_eq!(
            sent.variables,
            json!({"smsData": {"to": "+1 555 0100", "message": "Viewing at 5?"}})
        );
    }

    #[tokio::test]
    async fn test_empty_recipient_makes_no_call() {
        let transport = Arc::new(ScriptedTransport::default());
        let adapter = SmsAdapter::new(transport.clone(), None);

        let result = adapter.deliver(&ContactRequest::sms("", "hi")).await;

        assert_eq!(result.error(), Some("Recipient phone number is required"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_message_makes_no_call() {
        let transport = Arc::new(ScriptedTransport::default());
        let adapter = SmsAdapter::new(transport.clone(), None);

        let result = adapter.deliver(&ContactRequest::sms("555", " ")).await;

        assert_eq!(result.error(), Some("Message is required"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_field_is_failure() {
        let transport = Arc::new(ScriptedTransport::replying(vec![Ok(json!({"other": {}}))]));
        let adapter = SmsAdapter::new(transport, None);

        let result = adapter.deliver(&ContactRequest::sms("555", "hi")).await;

        assert_eq!(result.error(), Some("Missing sendSMS in response"));
    }

    #[tokio::test]
    async fn test_exhausted_transport_error_is_caught() {
        let transport = Arc::new(ScriptedTransport::replying(vec![Err(TransportError::http(
            503,
            "HTTP error! status: 503",
        ))]));
        let adapter = SmsAdapter::new(transport, None);

        let result = adapter.deliver(&ContactRequest::sms("555", "hi")).await;

        assert_eq!(result.error(), Some("HTTP error! status: 503"));
    }
}
