//! Call channel: dials on mobile, shows the number elsewhere.

use super::{ChannelAdapter, DeviceKind, Launcher, DELIVERY_UNCONFIRMED, PHONE_NOT_AVAILABLE};
use crate::domain::{PhoneNumber, ValidationError};
use crate::models::{ContactRequest, DispatchResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Places phone calls. No network call is made.
pub struct CallAdapter {
    launcher: Arc<dyn Launcher>,
    device: DeviceKind,
}

impl CallAdapter {
    pub fn new(launcher: Arc<dyn Launcher>, device: DeviceKind) -> Self {
        Self { launcher, device }
    }
}

#[async_trait]
impl ChannelAdapter for CallAdapter {
    async fn deliver(&self, request: &ContactRequest) -> DispatchResult {
        let phone = match PhoneNumber::new(request.recipient_address.as_str()) {
            Ok(phone) => phone,
            Err(ValidationError::MissingRecipient) => {
                return DispatchResult::failure(PHONE_NOT_AVAILABLE)
            }
            Err(_) => return DispatchResult::failure("Invalid phone number"),
        };
        let digits = phone.digits();

        match self.device {
            DeviceKind::Mobile => {
                let uri = format!("tel:{}", digits);
                self.launcher.open_url(&uri);
                DispatchResult::ok(json!({
                    "uri": uri,
                    "number": digits,
                    "device": self.device.as_str(),
                    "delivery": DELIVERY_UNCONFIRMED,
                }))
            }
            DeviceKind::Desktop => {
                self.launcher.show_number(digits);
                DispatchResult::ok(json!({
                    "number": digits,
                    "device": self.device.as_str(),
                    "delivery": DELIVERY_UNCONFIRMED,
                }))
            }
        }
    }

    fn success_message(&self, data: &Value) -> String {
        let number = data.get("number").and_then(Value::as_str).unwrap_or_default();
        match self.device {
            DeviceKind::Mobile => format!("Calling {}...", number),
            DeviceKind::Desktop => format!("Phone number: {}", number),
        }
    }
}
