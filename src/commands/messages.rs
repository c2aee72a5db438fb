//! Message queue commands.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::{EnterpriseApi, Page};

use super::parse_json_arg;

#[tracing::instrument(skip(api))]
pub async fn list_messages<A: EnterpriseApi>(api: &A, page: Page) -> Result<Value> {
    api.list_messages(page)
        .await
        .context("Failed to list messages")
}

#[tracing::instrument(skip(api, data))]
pub async fn create_message<A: EnterpriseApi>(api: &A, data: &str) -> Result<Value> {
    let data = parse_json_arg(data, "message data")?;
    api.create_message(&data)
        .await
        .context("Failed to create message")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockEnterpriseApi;
    use crate::error::{ApiError, TransportError, TransportErrorKind};
    use mockall::predicate::eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_messages_round_trip_through_api() {
        let mut api = MockEnterpriseApi::new();
        api.expect_list_messages()
            .with(eq(Page::default()))
            .returning(|_| Ok(json!([])));
        api.expect_create_message()
            .returning(|data| Ok(data.clone()));

        assert_eq!(list_messages(&api, Page::default()).await.unwrap(), json!([]));
        assert_eq!(
            create_message(&api, r#"{"body":"hi"}"#).await.unwrap(),
            json!({"body": "hi"})
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let mut api = MockEnterpriseApi::new();
        api.expect_list_messages().returning(|_| {
            Err(ApiError::from(TransportError::new(
                TransportErrorKind::Timeout,
                "no response within 10ms",
            )))
        });

        let err = list_messages(&api, Page::default()).await.unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(rendered.contains("Failed to list messages"));
        assert!(rendered.contains("timeout"));
    }
}
