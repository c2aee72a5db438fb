use anyhow::{Context, Result};
use log::debug;
use std::time::Duration;

use crate::config::{ClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};
use crate::http::Client;

/// Connection settings gathered from command-line flags and the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOptions {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub max_retries: usize,
}

impl ConnectOptions {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Builds a ready-to-use client from CLI settings.
#[tracing::instrument(skip(options), fields(base_url = %options.base_url))]
pub fn connect(options: &ConnectOptions) -> Result<Client> {
    let config = ClientConfig::builder(&options.base_url, &options.api_key)
        .timeout(Duration::from_millis(options.timeout_ms))
        .max_retries(options.max_retries)
        .build()
        .context("Invalid client configuration")?;
    debug!("Using client config {:?}", config);

    Client::new(config).context("Failed to create API client")
}
