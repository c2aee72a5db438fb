use anyhow::{Context, Result};
use serde_json::Value;

use crate::http::{CallOptions, Client, Transport};

use super::parse_json_arg;

/// Send an arbitrary request and return the response body.
///
/// `retry` lets POST and PUT be retried on transport failures like GET and DELETE.
#[tracing::instrument(skip(client, body))]
pub async fn request<T: Transport>(
    client: &Client<T>,
    method: &str,
    path: &str,
    body: Option<&str>,
    retry: bool,
) -> Result<Value> {
    let body = body
        .map(|raw| parse_json_arg(raw, "request body"))
        .transpose()?;
    let options = CallOptions::new().retry_non_idempotent(retry);

    let response = client
        .request_with(method, path, body, &options)
        .await
        .with_context(|| format!("{} {} failed", method.to_uppercase(), path))?;
    Ok(response.body)
}
