//! Contact request model and the per-channel option structs callers build it from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A communication medium a contact action can go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
    #[serde(rename = "whatsapp")]
    WhatsApp,
    Call,
}

impl Channel {
    /// Fallback error shown when a failure carries no message of its own.
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            Self::Email => "Failed to send email",
            Self::Sms => "Failed to send SMS",
            Self::WhatsApp => "Failed to open WhatsApp",
            Self::Call => "Failed to make call",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Email => "email",
            Self::Sms => "SMS",
            Self::WhatsApp => "WhatsApp",
            Self::Call => "call",
        };
        f.write_str(label)
    }
}

/// One attempted contact action.
///
/// Built through the per-channel constructors; the fields a channel doesn't
/// use stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub channel: Channel,

    /// Email address or phone number, depending on the channel
    pub recipient_address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<String>,

    /// Email only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Required for email, SMS and WhatsApp; absent for calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// WhatsApp only: open WhatsApp Web instead of the mobile link
    #[serde(default)]
    pub use_web: bool,
}

impl ContactRequest {
    fn new(channel: Channel, recipient_address: impl Into<String>) -> Self {
        Self {
            channel,
            recipient_address: recipient_address.into(),
            sender_address: None,
            subject: None,
            message: None,
            use_web: false,
        }
    }

    pub fn email(
        to: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject: Some(subject.into()),
            message: Some(message.into()),
            ..Self::new(Channel::Email, to)
        }
    }

    pub fn sms(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(Channel::Sms, to)
        }
    }

    pub fn whatsapp(
        phone_number: impl Into<String>,
        message: impl Into<String>,
        use_web: bool,
    ) -> Self {
        Self {
            message: Some(message.into()),
            use_web,
            ..Self::new(Channel::WhatsApp, phone_number)
        }
    }

    pub fn call(phone_number: impl Into<String>) -> Self {
        Self::new(Channel::Call, phone_number)
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender_address = Some(sender.into());
        self
    }

    /// Message body, empty when absent.
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Options for [`crate::dispatch::ContactDispatcher::send_email`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailOptions {
    pub to: String,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl From<SendEmailOptions> for ContactRequest {
    fn from(opts: SendEmailOptions) -> Self {
        let request = ContactRequest::email(opts.to, opts.subject, opts.message);
        match opts.from {
            Some(from) => request.with_sender(from),
            None => request,
        }
    }
}

/// Options for [`crate::dispatch::ContactDispatcher::send_sms`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSmsOptions {
    pub to: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl From<SendSmsOptions> for ContactRequest {
    fn from(opts: SendSmsOptions) -> Self {
        let request = ContactRequest::sms(opts.to, opts.message);
        match opts.from {
            Some(from) => request.with_sender(from),
            None => request,
        }
    }
}

/// Options for [`crate::dispatch::ContactDispatcher::open_whatsapp`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWhatsAppOptions {
    pub phone_number: String,
    pub message: String,
    #[serde(default)]
    pub use_web: bool,
}

impl From<OpenWhatsAppOptions> for ContactRequest {
    fn from(opts: OpenWhatsAppOptions) -> Self {
        ContactRequest::whatsapp(opts.phone_number, opts.message, opts.use_web)
    }
}

/// A student's inquiry about a listing, delivered to the landlord by email
/// with an SMS heads-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequestOptions {
    pub recipient_email: String,
    pub recipient_phone: String,
    pub sender_name: String,
    pub sender_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_phone: Option<String>,
    pub listing_title: String,
    pub message: String,
}

impl ContactRequestOptions {
    /// The email leg: the full inquiry, replies going to the student.
    pub fn email_request(&self) -> ContactRequest {
        let mut body = format!(
            "You have a new inquiry about \"{}\".\n\nFrom: {} <{}>\n",
            self.listing_title, self.sender_name, self.sender_email
        );
        if let Some(phone) = self.sender_phone.as_deref().filter(|p| !p.trim().is_empty()) {
            body.push_str(&format!("Phone: {}\n", phone));
        }
        body.push_str(&format!("\n{}", self.message));

        ContactRequest::email(
            self.recipient_email.clone(),
            format!("New inquiry about {}", self.listing_title),
            body,
        )
        .with_sender(self.sender_email.clone())
    }

    /// The SMS leg: a short notification pointing at the email.
    pub fn sms_request(&self) -> ContactRequest {
        ContactRequest::sms(
            self.recipient_phone.clone(),
            format!(
                "New inquiry from {} about {}. Check your email for details.",
                self.sender_name, self.listing_title
            ),
        )
    }
}
