//! Typed client for the Enterprise API.
//!
//! [`Client`] performs authenticated JSON calls against a base URL, retries
//! idempotent requests on transport failures, and reports every failure as a
//! typed [`ApiError`]. [`EnterpriseApi`] layers the documented agent, task,
//! result, deployment, status and message endpoints on top of it.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;

pub use api::{AgentId, EnterpriseApi, NewAgent, NewTask, Page};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, ErrorKind, TransportError, TransportErrorKind};
pub use http::{
    ApiResponse, CallOptions, Client, HttpRequest, HttpResponse, Method, ReqwestTransport,
    RequestSpec, Transport,
};
pub use tokio_util::sync::CancellationToken;
