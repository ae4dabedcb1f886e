//! WhatsApp channel: builds a click-to-chat link and opens it.

use super::{ChannelAdapter, Launcher, DELIVERY_UNCONFIRMED, PHONE_NOT_AVAILABLE};
use crate::domain::{PhoneNumber, ValidationError};
use crate::models::{ContactRequest, DispatchResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Build the click-to-chat link for `digits`.
///
/// `use_web` picks WhatsApp Web; otherwise the `wa.me` link the mobile app
/// intercepts.
pub fn whatsapp_link(digits: &str, message: &str, use_web: bool) -> String {
    let text = urlencoding::encode(message);
    if use_web {
        format!("https://web.whatsapp.com/send?phone={}&text={}", digits, text)
    } else {
        format!("https://wa.me/{}?text={}", digits, text)
    }
}

/// Opens WhatsApp chats. No network call is made.
///
/// The message only prefills the chat, so an empty one is accepted and
/// yields a link ending in `text=`; the user types into an empty chat.
pub struct WhatsAppAdapter {
    launcher: Arc<dyn Launcher>,
}

impl WhatsAppAdapter {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl ChannelAdapter for WhatsAppAdapter {
    async fn deliver(&self, request: &ContactRequest) -> DispatchResult {
        let phone = match PhoneNumber::new(request.recipient_address.as_str()) {
            Ok(phone) => phone,
            Err(ValidationError::MissingRecipient) => {
                return DispatchResult::failure(PHONE_NOT_AVAILABLE)
            }
            Err(_) => return DispatchResult::failure("Invalid phone number"),
        };

        let url = whatsapp_link(phone.digits(), request.message_text(), request.use_web);
        self.launcher.open_url(&url);

        DispatchResult::ok(json!({
            "url": url,
            "delivery": DELIVERY_UNCONFIRMED,
        }))
    }

    fn success_message(&self, _data: &Value) -> String {
        "Opening WhatsApp...".to_string()
    }
}
