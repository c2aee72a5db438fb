//! Error taxonomy for Enterprise API calls.

use std::fmt;

/// Boxed error kept as the underlying cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a single transport exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, reset, or name resolution failed.
    Connect,
    /// The attempt exceeded the configured timeout.
    Timeout,
    /// Any other failure while sending the request or reading the response.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Other => write!(f, "other"),
        }
    }
}

/// A failed transport exchange, with the network-level cause attached.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("no response within {}ms", after.as_millis()),
        )
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }
}

/// Coarse classification of an [`ApiError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Transport(TransportErrorKind),
    Http,
    Decode,
    Cancelled,
}

/// Errors returned by [`Client`](crate::Client) and the endpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The caller passed something the client refuses to send.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The exchange never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a 4xx or 5xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        /// The response body, when it was valid JSON.
        body: Option<serde_json::Value>,
    },

    /// A successful response carried a body that is not valid JSON, or
    /// JSON that does not fit the expected shape.
    #[error("failed to decode response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ApiError::Transport(e) => ErrorKind::Transport(e.kind()),
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Decode { .. } => ErrorKind::Decode,
            ApiError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Only transport failures are worth another attempt; the caller still
    /// decides whether the method allows one.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
