//! Channel adapters.
//!
//! One adapter per contact channel. Email and SMS go through the backend
//! transport; WhatsApp and calls only build a deep link and hand it to a
//! [`Launcher`]. Every adapter turns its failures into a
//! [`DispatchResult`] instead of returning an error.

pub mod call;
pub mod email;
pub mod sms;
pub mod whatsapp;

pub use call::CallAdapter;
pub use email::EmailAdapter;
pub use sms::SmsAdapter;
pub use whatsapp::WhatsAppAdapter;

use crate::models::{Channel, ContactRequest, DispatchResult, SendReceipt};
use crate::transport::AsyncTransport;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Error shown when a WhatsApp or call target is blank.
pub const PHONE_NOT_AVAILABLE: &str = "Phone number not available";

/// Marker put in the data of fire-and-forget channels: the link was handed
/// off, nobody confirmed the app actually opened.
pub const DELIVERY_UNCONFIRMED: &str = "unconfirmed";

static MOBILE_USER_AGENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("Failed to compile mobile user agent regex")
});

/// Channel-specific send/open logic.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Validate the target and perform the send/open action.
    async fn deliver(&self, request: &ContactRequest) -> DispatchResult;

    /// Confirmation shown to the user after a successful delivery.
    fn success_message(&self, data: &Value) -> String;
}

/// Side effects of the link-based channels.
///
/// Opening is fire-and-forget: implementations must not block or report
/// back whether the target app handled the link.
pub trait Launcher: Send + Sync {
    /// Open a URL in a new browsing context (or hand it to the OS).
    fn open_url(&self, url: &str);

    /// Show a number to the user for manual dialing.
    fn show_number(&self, number: &str);
}

/// Launcher that only records the action in the log.
///
/// Used by the MCP server, where the link travels back to the caller in the
/// result data and the caller's client does the opening.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLauncher;

impl Launcher for TracingLauncher {
    fn open_url(&self, url: &str) {
        tracing::info!(url = %url, "Opening link");
    }

    fn show_number(&self, number: &str) {
        tracing::info!(number = %number, "Showing number for manual dialing");
    }
}

/// What kind of device the user is on; decides how a call is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceKind {
    Mobile,
    #[default]
    Desktop,
}

impl DeviceKind {
    /// Classify a browser user agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if MOBILE_USER_AGENT_REGEX.is_match(user_agent) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

/// Run a send mutation and read the receipt under `field`.
///
/// Transport errors arrive here only after the retry budget is spent.
async fn send_mutation(
    transport: &dyn AsyncTransport,
    channel: Channel,
    operation: &str,
    variables: Value,
    auth_token: Option<String>,
    field: &str,
) -> DispatchResult {
    let data = match transport.request(operation, variables, auth_token).await {
        Ok(data) => data,
        Err(err) => {
            tracing::error!(channel = %channel, error = %err, "Backend send failed");
            return DispatchResult::failure(err.message);
        }
    };

    let receipt = data
        .get(field)
        .cloned()
        .map(serde_json::from_value::<SendReceipt>);

    match receipt {
        Some(Ok(receipt)) if receipt.success => {
            DispatchResult::ok(serde_json::to_value(&receipt).unwrap_or(Value::Null))
        }
        Some(Ok(_)) => DispatchResult::failure(channel.failure_fallback()),
        Some(Err(e)) => DispatchResult::failure(format!("Unexpected {} response: {}", field, e)),
        None => DispatchResult::failure(format!("Missing {} in response", field)),
    }
}
