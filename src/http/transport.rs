//! The network boundary: one request in, one response (or failure) out.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use super::types::{HttpRequest, HttpResponse};
use crate::error::{TransportError, TransportErrorKind};

/// Performs a single transport exchange. Retries, timeouts, and status
/// handling belong to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest` connection pool.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), header_value(name, value)?);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify_reqwest_error)?;

        debug!("Received HTTP {} with {} bytes", status, body.len());

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Converts a header value, marking credentials sensitive so they stay out of logs.
fn header_value(name: &str, value: &str) -> Result<HeaderValue, TransportError> {
    let mut header = HeaderValue::from_str(value).map_err(|e| {
        TransportError::new(
            TransportErrorKind::Other,
            format!("invalid value for header {}", name),
        )
        .with_source(e)
    })?;
    if name.eq_ignore_ascii_case(AUTHORIZATION.as_str()) {
        header.set_sensitive(true);
    }
    Ok(header)
}

/// Maps a reqwest failure onto the transport taxonomy, keeping it as the source.
pub fn classify_reqwest_error(error: reqwest::Error) -> TransportError {
    let kind = if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, error.to_string()).with_source(error)
}
