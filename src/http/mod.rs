//! HTTP layer: request building, transport, retry and response classification.

mod client;
mod retry;
mod transport;
mod types;

pub use client::{CallOptions, Client};
pub use retry::{MAX_BACKOFF_MS, backoff_delay, should_retry};
#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{ReqwestTransport, Transport, classify_reqwest_error};
pub use types::{ApiResponse, HttpRequest, HttpResponse, Method, RequestSpec};
