//! Data models for contact dispatch.
//!
//! This module contains the contact request handed to the orchestrator, the
//! normalized result returned to callers, and the payloads exchanged with the
//! backend contact endpoint.

pub mod request;
pub mod result;
pub mod wire;

pub use request::{
    Channel, ContactRequest, ContactRequestOptions, OpenWhatsAppOptions, SendEmailOptions,
    SendSmsOptions,
};
pub use result::{ContactRequestOutcome, DispatchResult};
pub use wire::{
    EmailData, GraphqlError, GraphqlErrorExtensions, GraphqlResponse, SendReceipt, SmsData,
};
