//! Housing Contact - contact dispatch core for a student-housing marketplace.
//!
//! This library lets a student reach a landlord (and vice versa) through four
//! channels: email and SMS delivered by the backend's GraphQL endpoint, a
//! WhatsApp click-to-chat link, and a phone call. The dispatch API is exposed
//! to assistants as an MCP server.
//!
//! # Architecture
//!
//! - **error**: Transport and configuration error types
//! - **config**: Configuration management from environment variables
//! - **domain**: Validated email addresses and phone numbers
//! - **models**: Requests, dispatch results and GraphQL wire types
//! - **transport**: GraphQL client with bounded exponential-backoff retry
//! - **metrics**: Counters for backend attempts, failures and retries
//! - **adapters**: One adapter per contact channel
//! - **dispatch**: Orchestrator and caller-visible feedback state
//! - **server**: MCP protocol server

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod transport;

// Re-export commonly used types
pub use adapters::{ChannelAdapter, DeviceKind, Launcher, TracingLauncher};
pub use config::Config;
pub use dispatch::{ContactDispatcher, DispatchState};
pub use error::{ConfigError, TransportError, TransportErrorKind};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{
    Channel, ContactRequest, ContactRequestOptions, ContactRequestOutcome, DispatchResult,
    OpenWhatsAppOptions, SendEmailOptions, SendSmsOptions,
};
pub use server::ContactMcpServer;
pub use transport::{
    AsyncGraphqlClient, AsyncTransport, GraphqlClient, RetryPolicy, RetryingTransport,
};
