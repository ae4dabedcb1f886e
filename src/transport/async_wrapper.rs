//! Async wrapper around the blocking GraphqlClient.
//!
//! This module provides an async interface to the synchronous client by using
//! `tokio::task::spawn_blocking` to run HTTP attempts on a dedicated thread
//! pool, keeping the async runtime free while a request is in flight.

use crate::error::{TransportError, TransportResult};
use crate::metrics::Metrics;
use crate::transport::GraphqlClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A single attempt against the backend, with no retry.
#[async_trait]
pub trait GraphqlExecutor: Send + Sync {
    async fn execute(
        &self,
        operation: &str,
        variables: &Value,
        auth_token: Option<&str>,
    ) -> TransportResult<Value>;
}

/// Async wrapper around the blocking [`GraphqlClient`].
#[derive(Clone)]
pub struct AsyncGraphqlClient {
    client: Arc<GraphqlClient>,
}

impl AsyncGraphqlClient {
    pub fn new(client: GraphqlClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Metrics of the wrapped client.
    pub fn metrics(&self) -> &Metrics {
        self.client.metrics()
    }
}

#[async_trait]
impl GraphqlExecutor for AsyncGraphqlClient {
    async fn execute(
        &self,
        operation: &str,
        variables: &Value,
        auth_token: Option<&str>,
    ) -> TransportResult<Value> {
        let client = self.client.clone();
        let operation = operation.to_string();
        let variables = variables.clone();
        let auth_token = auth_token.map(str::to_string);

        tokio::task::spawn_blocking(move || {
            client.execute(&operation, &variables, auth_token.as_deref())
        })
        .await
        .map_err(|e| TransportError::network(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportErrorKind;

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) is closed on test machines
        let client = GraphqlClient::with_base_url("http://127.0.0.1:9".to_string());
        let async_client = AsyncGraphqlClient::new(client);

        let err = async_client
            .execute("query { ping }", &Value::Null, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind, TransportErrorKind::Network);
        assert_eq!(async_client.metrics().http_errors_total(), 1);

        // Should be able to clone
        let _cloned = async_client.clone();
    }
}
