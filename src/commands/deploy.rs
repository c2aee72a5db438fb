//! Deployment commands.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::{EnterpriseApi, Page};

use super::parse_json_arg;

#[tracing::instrument(skip(api))]
pub async fn list_deployments<A: EnterpriseApi>(api: &A, page: Page) -> Result<Value> {
    api.list_deployments(page)
        .await
        .context("Failed to list deployments")
}

#[tracing::instrument(skip(api, data))]
pub async fn create_deployment<A: EnterpriseApi>(api: &A, data: &str) -> Result<Value> {
    let data = parse_json_arg(data, "deployment data")?;
    api.create_deployment(&data)
        .await
        .context("Failed to create deployment")
}
