//! Immutable client configuration.

use log::debug;
use reqwest::Url;
use reqwest::header::HeaderValue;
use std::time::Duration;

use crate::error::ApiError;

/// Default per-attempt timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default number of retries for idempotent requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Delay before the first retry in milliseconds; doubles on each retry.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;

/// Settings shared by every call made through a [`Client`](crate::Client).
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    credential: String,
    timeout: Duration,
    max_retries: usize,
    retry_base_delay: Duration,
}

impl ClientConfig {
    /// Validates and normalizes a config with default timeout and retry settings.
    pub fn new(base_url: &str, credential: &str) -> Result<Self, ApiError> {
        Self::builder(base_url, credential).build()
    }

    pub fn builder(base_url: &str, credential: &str) -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_url: base_url.to_string(),
            credential: credential.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("credential", &mask_credential(&self.credential))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay", &self.retry_base_delay)
            .finish()
    }
}

/// Builder returned by [`ClientConfig::builder`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    credential: String,
    timeout: Duration,
    max_retries: usize,
    retry_base_delay: Duration,
}

impl ClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn build(self) -> Result<ClientConfig, ApiError> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::invalid_argument("base URL must not be empty"));
        }

        let parsed = Url::parse(&base_url).map_err(|e| {
            ApiError::invalid_argument(format!("invalid base URL '{}': {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::invalid_argument(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ApiError::invalid_argument(
                "base URL must not contain a query or fragment",
            ));
        }

        if self.credential.is_empty() {
            return Err(ApiError::invalid_argument("credential must not be empty"));
        }
        HeaderValue::from_str(&format!("Bearer {}", self.credential)).map_err(|_| {
            ApiError::invalid_argument("credential contains characters not allowed in a header")
        })?;

        if self.timeout.is_zero() {
            return Err(ApiError::invalid_argument("timeout must be greater than zero"));
        }

        debug!(
            "Configured client for {} with credential {}",
            base_url,
            mask_credential(&self.credential)
        );

        Ok(ClientConfig {
            base_url,
            credential: self.credential,
            timeout: self.timeout,
            max_retries: self.max_retries,
            retry_base_delay: self.retry_base_delay,
        })
    }
}

/// Masks a credential for logs, keeping at most the first and last four characters.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() < 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}
