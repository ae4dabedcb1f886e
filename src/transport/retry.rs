//! Bounded retry with exponential backoff.

use crate::error::TransportResult;
use crate::metrics::Metrics;
use crate::transport::GraphqlExecutor;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Request contract the network-backed adapters depend on.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Run `operation` with `variables`, retrying transient failures.
    ///
    /// Fails only once the attempt budget is spent, or immediately on an
    /// authentication failure.
    async fn request(
        &self,
        operation: &str,
        variables: Value,
        auth_token: Option<String>,
    ) -> TransportResult<Value>;
}

/// How many attempts a request gets and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_retries: u32,

    /// Delay before the second attempt
    pub base_delay: Duration,

    /// Ceiling for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// Attempts actually made; zero still means one try.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay to wait after failed attempt `attempt` (1-indexed):
    /// `min(base_delay * 2^(attempt-1), max_delay)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let factor = 1u32 << exponent;
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// [`AsyncTransport`] that retries a [`GraphqlExecutor`] per [`RetryPolicy`].
pub struct RetryingTransport<E> {
    executor: E,
    policy: RetryPolicy,
    metrics: Metrics,
}

impl<E: GraphqlExecutor> RetryingTransport<E> {
    pub fn new(executor: E, policy: RetryPolicy) -> Self {
        Self {
            executor,
            policy,
            metrics: Metrics::new(),
        }
    }

    /// Share a metrics collector, e.g. the wrapped client's.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[async_trait]
impl<E: GraphqlExecutor> AsyncTransport for RetryingTransport<E> {
    async fn request(
        &self,
        operation: &str,
        variables: Value,
        auth_token: Option<String>,
    ) -> TransportResult<Value> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            debug!(attempt, max_attempts, "Sending backend request");

            let err = match self
                .executor
                .execute(operation, &variables, auth_token.as_deref())
                .await
            {
                Ok(data) => return Ok(data),
                Err(err) => err,
            };

            if !err.is_retryable() {
                warn!(attempt, error = %err, "Authentication failed, not retrying");
                self.metrics.record_auth_failure();
                return Err(err);
            }

            if attempt >= max_attempts {
                warn!(attempt, error = %err, "Backend request failed, retries exhausted");
                return Err(err);
            }

            let delay = self.policy.delay_for(attempt);
            warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Backend request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            self.metrics.record_retry();
            attempt += 1;
        }
    }
}
