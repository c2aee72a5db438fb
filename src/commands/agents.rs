use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

use crate::api::{AgentId, EnterpriseApi, NewAgent};

use super::parse_json_arg;

/// Register a new agent
#[tracing::instrument(skip(api))]
pub async fn register<A: EnterpriseApi>(
    api: &A,
    agent_id: &str,
    agent_type: &str,
) -> Result<Value> {
    let agent = NewAgent {
        agent_id: agent_id.parse()?,
        agent_type: agent_type.to_string(),
    };
    api.register_agent(&agent)
        .await
        .with_context(|| format!("Failed to register agent {}", agent_id))
}

/// Fetch the results produced by an agent
#[tracing::instrument(skip(api))]
pub async fn results<A: EnterpriseApi>(api: &A, agent_id: &str) -> Result<Value> {
    let agent_id: AgentId = agent_id.parse()?;
    debug!("Fetching results for {}", agent_id);
    api.get_results(&agent_id)
        .await
        .with_context(|| format!("Failed to fetch results for agent {}", agent_id))
}

#[tracing::instrument(skip(api))]
pub async fn status<A: EnterpriseApi>(api: &A, agent_id: &str) -> Result<Value> {
    let agent_id: AgentId = agent_id.parse()?;
    api.get_agent_status(&agent_id)
        .await
        .with_context(|| format!("Failed to fetch status of agent {}", agent_id))
}

#[tracing::instrument(skip(api, data))]
pub async fn update_status<A: EnterpriseApi>(
    api: &A,
    agent_id: &str,
    data: &str,
) -> Result<Value> {
    let agent_id: AgentId = agent_id.parse()?;
    let data = parse_json_arg(data, "status data")?;
    api.update_agent_status(&agent_id, &data)
        .await
        .with_context(|| format!("Failed to update status of agent {}", agent_id))
}

/// Delete an agent's status record. Returns `{"deleted": true}` on success.
#[tracing::instrument(skip(api))]
pub async fn delete_status<A: EnterpriseApi>(api: &A, agent_id: &str) -> Result<Value> {
    let agent_id: AgentId = agent_id.parse()?;
    api.delete_agent_status(&agent_id)
        .await
        .with_context(|| format!("Failed to delete status of agent {}", agent_id))?;
    Ok(serde_json::json!({ "deleted": true }))
}
