//! Typed operations for the Enterprise API endpoints.

mod types;

use async_trait::async_trait;
use log::info;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{Client, Method, RequestSpec, Transport};

pub use types::{AgentId, DEFAULT_LIMIT, NewAgent, NewTask, Page};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnterpriseApi: Send + Sync {
    async fn register_agent(&self, agent: &NewAgent) -> Result<Value, ApiError>;
    async fn assign_task(&self, task: &NewTask) -> Result<Value, ApiError>;
    async fn get_results(&self, agent_id: &AgentId) -> Result<Value, ApiError>;
    async fn list_deployments(&self, page: Page) -> Result<Value, ApiError>;
    async fn create_deployment(&self, data: &Value) -> Result<Value, ApiError>;
    async fn get_agent_status(&self, agent_id: &AgentId) -> Result<Value, ApiError>;
    async fn update_agent_status(
        &self,
        agent_id: &AgentId,
        data: &Value,
    ) -> Result<Value, ApiError>;
    async fn delete_agent_status(&self, agent_id: &AgentId) -> Result<(), ApiError>;
    async fn list_messages(&self, page: Page) -> Result<Value, ApiError>;
    async fn create_message(&self, data: &Value) -> Result<Value, ApiError>;
}

impl<T: Transport> Client<T> {
    async fn call(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let mut spec = RequestSpec::new(method, path);
        spec.body = body;
        Ok(self.send(spec, &Default::default()).await?.body)
    }
}

fn to_body<B: Serialize>(payload: &B) -> Result<Value, ApiError> {
    serde_json::to_value(payload)
        .map_err(|e| ApiError::invalid_argument(format!("failed to serialize body: {}", e)))
}

fn require_object(data: &Value) -> Result<Value, ApiError> {
    if data.is_object() {
        Ok(data.clone())
    } else {
        Err(ApiError::invalid_argument("request body must be a JSON object"))
    }
}

#[async_trait]
impl<T: Transport> EnterpriseApi for Client<T> {
    #[tracing::instrument(skip(self))]
    async fn register_agent(&self, agent: &NewAgent) -> Result<Value, ApiError> {
        info!("Registering agent {} ({})", agent.agent_id, agent.agent_type);
        self.call(Method::Post, "/agents".to_string(), Some(to_body(agent)?))
            .await
    }

    #[tracing::instrument(skip(self, task), fields(agent_id = %task.agent_id))]
    async fn assign_task(&self, task: &NewTask) -> Result<Value, ApiError> {
        info!("Assigning task to agent {}", task.agent_id);
        self.call(Method::Post, "/tasks".to_string(), Some(to_body(task)?))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_results(&self, agent_id: &AgentId) -> Result<Value, ApiError> {
        self.call(Method::Get, format!("/results/{}", agent_id), None)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn list_deployments(&self, page: Page) -> Result<Value, ApiError> {
        self.call(Method::Get, format!("/agent/deploy?{}", page.query()), None)
            .await
    }

    #[tracing::instrument(skip(self, data))]
    async fn create_deployment(&self, data: &Value) -> Result<Value, ApiError> {
        self.call(
            Method::Post,
            "/agent/deploy".to_string(),
            Some(require_object(data)?),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_agent_status(&self, agent_id: &AgentId) -> Result<Value, ApiError> {
        self.call(Method::Get, format!("/agent/status/{}", agent_id), None)
            .await
    }

    #[tracing::instrument(skip(self, data))]
    async fn update_agent_status(
        &self,
        agent_id: &AgentId,
        data: &Value,
    ) -> Result<Value, ApiError> {
        self.call(
            Method::Put,
            format!("/agent/status/{}", agent_id),
            Some(require_object(data)?),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_agent_status(&self, agent_id: &AgentId) -> Result<(), ApiError> {
        info!("Deleting status of agent {}", agent_id);
        self.call(Method::Delete, format!("/agent/status/{}", agent_id), None)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_messages(&self, page: Page) -> Result<Value, ApiError> {
        self.call(Method::Get, format!("/queue/message?{}", page.query()), None)
            .await
    }

    #[tracing::instrument(skip(self, data))]
    async fn create_message(&self, data: &Value) -> Result<Value, ApiError> {
        self.call(
            Method::Post,
            "/queue/message".to_string(),
            Some(require_object(data)?),
        )
        .await
    }
}
