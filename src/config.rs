//! Configuration management for the contact dispatch server.
//!
//! This module handles loading and validating configuration from environment variables.
//! It avoids polluting stdout (which MCP uses for communication) by loading the
//! .env file through `dotenvy`, which never prints.

use crate::error::{ConfigError, ConfigResult};
use crate::transport::RetryPolicy;
use std::env;
use std::time::Duration;

/// Configuration for the contact dispatch server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL; the GraphQL endpoint lives at `{base}/graphql`
    pub api_base_url: String,

    /// Bearer token passed explicitly to every transport call
    pub api_token: Option<String>,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Total attempts per backend request (default: 3)
    pub max_retries: u32,

    /// First backoff delay in milliseconds (default: 1000)
    pub retry_base_delay_ms: u64,

    /// Backoff ceiling in milliseconds (default: 10000)
    pub retry_max_delay_ms: u64,

    /// Validate email format instead of presence only (default: false)
    pub strict_email_validation: bool,

    /// User agent of the client the call channel acts for (default: empty, desktop)
    pub client_user_agent: String,

    /// Open WhatsApp Web instead of the mobile link when the caller doesn't say (default: false)
    pub whatsapp_use_web: bool,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `CONTACT_API_BASE_URL`: Base URL of the backend
    ///
    /// Optional environment variables:
    /// - `CONTACT_API_TOKEN`: Bearer token for the backend
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `MAX_RETRIES`: Attempts per request, at least 1 (default: 3)
    /// - `RETRY_BASE_DELAY_MS`: First backoff delay (default: 1000)
    /// - `RETRY_MAX_DELAY_MS`: Backoff ceiling (default: 10000)
    /// - `STRICT_EMAIL_VALIDATION`: `true`/`false` (default: false)
    /// - `CLIENT_USER_AGENT`: Device user agent for the call channel
    /// - `WHATSAPP_USE_WEB`: `true`/`false` (default: false)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let api_base_url = env::var("CONTACT_API_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("CONTACT_API_BASE_URL".to_string()))?;

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "CONTACT_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        // An empty token means "no token", not an empty bearer header
        let api_token = env::var("CONTACT_API_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let max_retries = Self::parse_env_u32("MAX_RETRIES", 3)?;
        if max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_RETRIES".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let retry_base_delay_ms = Self::parse_env_u64("RETRY_BASE_DELAY_MS", 1000)?;
        let retry_max_delay_ms = Self::parse_env_u64("RETRY_MAX_DELAY_MS", 10_000)?;
        if retry_max_delay_ms < retry_base_delay_ms {
            return Err(ConfigError::InvalidValue {
                var: "RETRY_MAX_DELAY_MS".to_string(),
                reason: format!("Must not be below RETRY_BASE_DELAY_MS ({})", retry_base_delay_ms),
            });
        }

        let strict_email_validation = Self::parse_env_bool("STRICT_EMAIL_VALIDATION", false)?;
        let whatsapp_use_web = Self::parse_env_bool("WHATSAPP_USE_WEB", false)?;
        let client_user_agent = env::var("CLIENT_USER_AGENT").unwrap_or_default();
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            api_base_url,
            api_token,
            request_timeout,
            max_retries,
            retry_base_delay_ms,
            retry_max_delay_ms,
            strict_email_validation,
            client_user_agent,
            whatsapp_use_web,
            log_level,
        })
    }

    /// Retry policy for the transport client.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
        }
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u32 with a default value.
    fn parse_env_u32(var_name: &str, default: u32) -> ConfigResult<u32> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as a boolean flag with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: String::new(),
            api_token: None,
            request_timeout: 10,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            retry_max_delay_ms: 10_000,
            strict_email_validation: false,
            client_user_agent: String::new(),
            whatsapp_use_web: false,
            log_level: "error".to_string(),
        }
    }
}
