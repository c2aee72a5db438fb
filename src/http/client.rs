//! Authenticated JSON client with retry, timeout, and cancellation.

use log::{debug, warn};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::retry::{backoff_delay, should_retry};
use super::transport::{ReqwestTransport, Transport};
use super::types::{ApiResponse, HttpRequest, HttpResponse, Method, RequestSpec};
use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};

/// Longest slice of a non-JSON error body used as an error message.
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// Per-call behavior switches.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Allow POST and PUT to be retried on transport failures.
    pub retry_non_idempotent: bool,
    /// Aborts the call, including any pending backoff, when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retry_non_idempotent(mut self, enabled: bool) -> Self {
        self.retry_non_idempotent = enabled;
        self
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Client for the Enterprise API.
///
/// Holds only immutable configuration and a transport handle, so one instance
/// can serve any number of concurrent calls.
pub struct Client<T = ReqwestTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client<ReqwestTransport> {
    /// Builds a client on a fresh `reqwest` connection pool.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                ApiError::invalid_argument(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self::with_transport(config, ReqwestTransport::new(http)))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `method path` with an optional JSON body using default call options.
    ///
    /// `method` is matched case-insensitively against GET, POST, PUT and DELETE.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        self.request_with(method, path, body, &CallOptions::default())
            .await
    }

    pub async fn request_with(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        options: &CallOptions,
    ) -> Result<ApiResponse, ApiError> {
        let method = method.parse::<Method>()?;
        let spec = RequestSpec {
            method,
            path: path.to_string(),
            body,
        };
        self.send(spec, options).await
    }

    /// Runs one logical call, retrying transport failures when allowed.
    #[tracing::instrument(skip(self, spec, options), fields(method = %spec.method, path = %spec.path))]
    pub async fn send(
        &self,
        spec: RequestSpec,
        options: &CallOptions,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.build_request(&spec)?;
        let max_attempts = if spec.method.is_idempotent() || options.retry_non_idempotent {
            self.config.max_retries().saturating_add(1)
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            debug!(
                "{} {}: attempt {}/{}",
                spec.method, request.url, attempt, max_attempts
            );

            let error = match self.attempt(request.clone(), options).await {
                Ok(response) => return interpret_response(response),
                Err(e) => e,
            };

            if attempt >= max_attempts
                || !should_retry(spec.method, options.retry_non_idempotent, &error)
            {
                debug!("{} {}: giving up: {}", spec.method, request.url, error);
                return Err(error);
            }

            let delay = backoff_delay(self.config.retry_base_delay(), attempt);
            warn!(
                "{} {}: attempt {}/{} failed ({}), retrying in {}ms...",
                spec.method,
                request.url,
                attempt,
                max_attempts,
                error,
                delay.as_millis()
            );
            wait_or_cancel(tokio::time::sleep(delay), options).await?;
            attempt += 1;
        }
    }

    /// Builds the wire request without touching the network.
    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest, ApiError> {
        if !spec.path.starts_with('/') {
            return Err(ApiError::invalid_argument(format!(
                "path must begin with '/': {}",
                spec.path
            )));
        }

        let body = spec
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::invalid_argument(format!("failed to serialize body: {}", e)))?;

        Ok(HttpRequest {
            method: spec.method,
            url: format!("{}{}", self.config.base_url(), spec.path),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.credential()),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    /// One transport exchange bounded by the configured timeout.
    async fn attempt(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<HttpResponse, ApiError> {
        let timeout = self.config.timeout();
        let exchange =
            async { tokio::time::timeout(timeout, self.transport.execute(request)).await };
        match wait_or_cancel(exchange, options).await? {
            Ok(result) => result.map_err(ApiError::from),
            Err(_elapsed) => Err(TransportError::timeout(timeout).into()),
        }
    }
}

/// Drives `future` to completion unless the call's cancellation token fires first.
async fn wait_or_cancel<F: std::future::Future>(
    future: F,
    options: &CallOptions,
) -> Result<F::Output, ApiError> {
    match &options.cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(ApiError::Cancelled),
            output = future => Ok(output),
        },
        None => Ok(future.await),
    }
}

/// Turns a raw response into a parsed body or a classified error.
fn interpret_response(response: HttpResponse) -> Result<ApiResponse, ApiError> {
    let status = response.status;

    if status >= 400 {
        let body: Option<Value> = serde_json::from_slice(&response.body).ok();
        let message = error_message(status, body.as_ref(), &response.body);
        return Err(ApiError::Http {
            status,
            message,
            body,
        });
    }

    let text = String::from_utf8_lossy(&response.body);
    if text.trim().is_empty() {
        return Ok(ApiResponse {
            status_code: status,
            body: Value::Object(serde_json::Map::new()),
        });
    }

    let body = serde_json::from_slice(&response.body)
        .map_err(|source| ApiError::Decode { status, source })?;
    Ok(ApiResponse {
        status_code: status,
        body,
    })
}

/// Picks the most useful message for an error response: a JSON `message`,
/// `error` or `detail` string, then the raw body text, then the status text.
fn error_message(status: u16, json: Option<&Value>, raw: &[u8]) -> String {
    if let Some(json) = json {
        for key in ["message", "error", "detail"] {
            if let Some(text) = json.get(key).and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }

    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if !text.is_empty() && json.is_none() {
        return text.chars().take(MAX_ERROR_MESSAGE_CHARS).collect();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
        .to_string()
}
