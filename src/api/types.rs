use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: u32 = 20;

/// Identifier of an agent, safe to interpolate into a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId(String);

impl AgentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AgentId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ApiError::invalid_argument("agent id must not be empty"));
        }
        if let Some(c) = s
            .chars()
            .find(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
        {
            return Err(ApiError::invalid_argument(format!(
                "agent id '{}' contains forbidden character {:?}",
                s, c
            )));
        }
        Ok(AgentId(s.to_string()))
    }
}

impl TryFrom<String> for AgentId {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AgentId> for String {
    fn from(id: AgentId) -> Self {
        id.0
    }
}

/// Body of `POST /agents`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NewAgent {
    pub agent_id: AgentId,
    pub agent_type: String,
}

/// Body of `POST /tasks`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NewTask {
    pub agent_id: AgentId,
    pub task_description: String,
    #[serde(default)]
    pub task_data: Value,
}

/// Pagination window for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    pub fn query(&self) -> String {
        format!("limit={}&offset={}", self.limit, self.offset)
    }
}
