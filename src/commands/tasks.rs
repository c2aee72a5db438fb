use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::{EnterpriseApi, NewTask};

use super::parse_json_arg;

/// Assign a task to an agent. `data` is an optional JSON document passed as `task_data`.
#[tracing::instrument(skip(api, data))]
pub async fn assign<A: EnterpriseApi>(
    api: &A,
    agent_id: &str,
    description: &str,
    data: Option<&str>,
) -> Result<Value> {
    let task_data = match data {
        Some(raw) => parse_json_arg(raw, "task data")?,
        None => Value::Object(serde_json::Map::new()),
    };
    let task = NewTask {
        agent_id: agent_id.parse()?,
        task_description: description.to_string(),
        task_data,
    };
    api.assign_task(&task)
        .await
        .with_context(|| format!("Failed to assign task to agent {}", agent_id))
}
