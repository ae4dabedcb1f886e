//! Transport client for the backend contact endpoint.
//!
//! `GraphqlClient` performs one blocking attempt against `{base}/graphql`
//! with `ureq`. `AsyncGraphqlClient` moves those attempts onto tokio's
//! blocking pool, and `RetryingTransport` layers bounded exponential backoff
//! on top. Adapters only ever see the [`AsyncTransport`] trait.

mod async_wrapper;
mod retry;

pub use async_wrapper::{AsyncGraphqlClient, GraphqlExecutor};
pub use retry::{AsyncTransport, RetryPolicy, RetryingTransport};

use crate::config::Config;
use crate::error::{TransportError, TransportResult};
use crate::metrics::{HttpTimer, Metrics};
use crate::models::GraphqlResponse;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Blocking GraphQL client for the backend contact endpoint.
///
/// Each call is a single attempt; retries live in [`RetryingTransport`].
#[derive(Clone)]
pub struct GraphqlClient {
    /// Backend base URL, without the `/graphql` suffix
    base_url: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl GraphqlClient {
    /// Create a new GraphqlClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.api_base_url.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a GraphqlClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Full URL of the GraphQL endpoint.
    fn endpoint(&self) -> String {
        format!("{}/graphql", self.base_url.trim_end_matches('/'))
    }

    /// Run one operation and return its `data` object.
    ///
    /// `operation` must already be a serialized GraphQL document. The token,
    /// when given, is sent as `Authorization: Bearer {token}`.
    pub fn execute(
        &self,
        operation: &str,
        variables: &Value,
        auth_token: Option<&str>,
    ) -> TransportResult<Value> {
        let url = self.endpoint();
        let body = serde_json::json!({
            "query": operation,
            "variables": variables,
        });

        tracing::debug!("POST {}", url);

        let timer = HttpTimer::new(self.metrics.clone());
        let mut request = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json");
        if let Some(token) = auth_token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        let result = request
            .send_json(&body)
            .map_err(|e| self.map_error(e))
            .and_then(|response| {
                let text = response
                    .into_string()
                    .map_err(|e| TransportError::network(e.to_string()))?;
                Self::parse_body(&text)
            });

        match &result {
            Ok(_) => {
                tracing::debug!("POST {} - Success", url);
                timer.complete();
            }
            Err(e) => {
                tracing::debug!("POST {} - Error: {}", url, e);
                timer.complete_with_error();
            }
        }

        result
    }

    /// Interpret a 2xx body: errors win over data, and data must be present.
    fn parse_body(text: &str) -> TransportResult<Value> {
        let response: GraphqlResponse = serde_json::from_str(text)?;

        if response.is_unauthenticated() {
            return Err(TransportError::authentication(response.error_message()));
        }
        if !response.errors().is_empty() {
            return Err(TransportError::graphql(response.error_message()));
        }

        response
            .data
            .filter(|data| !data.is_null())
            .ok_or_else(|| TransportError::graphql("No data in response"))
    }

    /// Map a ureq error to a TransportError.
    fn map_error(&self, error: ureq::Error) -> TransportError {
        match error {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();

                // GraphQL servers often put the auth rejection in a 4xx body
                match serde_json::from_str::<GraphqlResponse>(&body) {
                    Ok(parsed) if parsed.is_unauthenticated() => {
                        TransportError::authentication(parsed.error_message())
                    }
                    _ => TransportError::http(code, format!("HTTP error! status: {}", code)),
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    TransportError::network("Connection failed")
                } else {
                    TransportError::network(transport.to_string())
                }
            }
        }
    }
}
