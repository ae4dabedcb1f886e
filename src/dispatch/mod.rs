//! Dispatch orchestrator.
//!
//! [`ContactDispatcher`] is the single entry point for contact actions. It
//! resolves the adapter for the request's channel, runs it, normalizes the
//! outcome and mirrors it into its [`FeedbackState`]. It never retries;
//! retries belong to the transport and only apply to email and SMS.

pub mod state;

pub use state::{DispatchState, FeedbackState, InFlight};

use crate::adapters::{
    CallAdapter, ChannelAdapter, DeviceKind, EmailAdapter, Launcher, SmsAdapter, WhatsAppAdapter,
};
use crate::config::Config;
use crate::models::result::CONTACT_REQUEST_FAILED;
use crate::models::{
    Channel, ContactRequest, ContactRequestOptions, ContactRequestOutcome, DispatchResult,
    OpenWhatsAppOptions, SendEmailOptions, SendSmsOptions,
};
use crate::transport::AsyncTransport;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Confirmation shown after a composite inquiry went through on both legs.
pub const CONTACT_REQUEST_SENT: &str = "Contact request sent successfully!";

/// Coordinates validation, adapter invocation and result normalization.
///
/// One dispatcher owns one feedback state. Concurrent dispatches on the same
/// dispatcher share it: `loading` holds until the last one ends and the
/// latest outcome's message wins. Callers that need independent feedback
/// use separate dispatchers.
pub struct ContactDispatcher {
    email: Arc<dyn ChannelAdapter>,
    sms: Arc<dyn ChannelAdapter>,
    whatsapp: Arc<dyn ChannelAdapter>,
    call: Arc<dyn ChannelAdapter>,
    feedback: FeedbackState,
}

impl ContactDispatcher {
    /// Create a dispatcher from explicit adapters.
    pub fn new(
        email: Arc<dyn ChannelAdapter>,
        sms: Arc<dyn ChannelAdapter>,
        whatsapp: Arc<dyn ChannelAdapter>,
        call: Arc<dyn ChannelAdapter>,
    ) -> Self {
        Self {
            email,
            sms,
            whatsapp,
            call,
            feedback: FeedbackState::new(),
        }
    }

    /// Wire the standard adapters from configuration.
    ///
    /// The configured API token is handed to the network-backed adapters,
    /// which pass it explicitly on every transport call.
    pub fn from_config(
        config: &Config,
        transport: Arc<dyn AsyncTransport>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        let email = EmailAdapter::new(transport.clone(), config.api_token.clone())
            .with_strict_validation(config.strict_email_validation);
        let sms = SmsAdapter::new(transport, config.api_token.clone());
        let whatsapp = WhatsAppAdapter::new(launcher.clone());
        let call = CallAdapter::new(
            launcher,
            DeviceKind::from_user_agent(&config.client_user_agent),
        );

        Self::new(
            Arc::new(email),
            Arc::new(sms),
            Arc::new(whatsapp),
            Arc::new(call),
        )
    }

    fn adapter(&self, channel: Channel) -> &dyn ChannelAdapter {
        match channel {
            Channel::Email => self.email.as_ref(),
            Channel::Sms => self.sms.as_ref(),
            Channel::WhatsApp => self.whatsapp.as_ref(),
            Channel::Call => self.call.as_ref(),
        }
    }

    /// Dispatch one contact request and record the outcome in the state.
    pub async fn dispatch(&self, request: ContactRequest) -> DispatchResult {
        let _in_flight = self.feedback.begin();

        let channel = request.channel;
        let result = self.deliver(&request).await;

        match (result.data(), result.error()) {
            (Some(data), _) if result.is_success() => {
                let message = self.adapter(channel).success_message(data);
                info!(channel = %channel, "{}", message);
                self.feedback.succeed(message);
            }
            (_, error) => {
                let error = error.unwrap_or(channel.failure_fallback());
                warn!(channel = %channel, error = %error, "Dispatch failed");
                self.feedback.fail(error);
            }
        }

        result
    }

    /// Run the adapter without touching the state.
    ///
    /// A panicking adapter and a failure without a message both become the
    /// channel's fallback failure.
    async fn deliver(&self, request: &ContactRequest) -> DispatchResult {
        let channel = request.channel;
        let adapter = self.adapter(channel);

        let result = match AssertUnwindSafe(adapter.deliver(request))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(channel = %channel, "Adapter panicked");
                return DispatchResult::failure(channel.failure_fallback());
            }
        };

        match result.error() {
            Some(error) if error.trim().is_empty() => {
                DispatchResult::failure(channel.failure_fallback())
            }
            _ => result,
        }
    }

    pub async fn send_email(&self, opts: SendEmailOptions) -> DispatchResult {
        self.dispatch(opts.into()).await
    }

    pub async fn send_sms(&self, opts: SendSmsOptions) -> DispatchResult {
        self.dispatch(opts.into()).await
    }

    pub async fn open_whatsapp(&self, opts: OpenWhatsAppOptions) -> DispatchResult {
        self.dispatch(opts.into()).await
    }

    pub async fn make_phone_call(&self, phone_number: &str) -> DispatchResult {
        self.dispatch(ContactRequest::call(phone_number)).await
    }

    /// Send a listing inquiry: the email and its SMS notification run
    /// concurrently and both outcomes are returned.
    ///
    /// The state reports success only if both legs succeeded.
    pub async fn send_contact_request(&self, opts: ContactRequestOptions) -> ContactRequestOutcome {
        let _in_flight = self.feedback.begin();

        let email_request = opts.email_request();
        let sms_request = opts.sms_request();
        let (email, sms) = tokio::join!(
            self.deliver(&email_request),
            self.deliver(&sms_request)
        );

        let outcome = ContactRequestOutcome { email, sms };
        if outcome.is_success() {
            info!(listing = %opts.listing_title, "{}", CONTACT_REQUEST_SENT);
            self.feedback.succeed(CONTACT_REQUEST_SENT);
        } else {
            warn!(
                email_error = outcome.email.error().unwrap_or("none"),
                sms_error = outcome.sms.error().unwrap_or("none"),
                "Contact request failed"
            );
            self.feedback.fail(CONTACT_REQUEST_FAILED);
        }

        outcome
    }

    /// Drop the error and success messages. Idempotent.
    pub fn clear_messages(&self) {
        self.feedback.clear();
    }

    /// Current state snapshot.
    pub fn state(&self) -> DispatchState {
        self.feedback.snapshot()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<DispatchState> {
        self.feedback.subscribe()
    }
}
