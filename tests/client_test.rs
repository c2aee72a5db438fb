use eapi::{
    ApiError, CallOptions, CancellationToken, Client, ClientConfig, EnterpriseApi, ErrorKind,
    NewAgent, TransportErrorKind,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn client(url: &str) -> Client {
    let config = ClientConfig::builder(url, "test-key")
        .retry_base_delay(Duration::from_millis(1))
        .build()
        .unwrap();
    Client::new(config).unwrap()
}

#[tokio::test]
async fn test_request_against_real_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/agents")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"agent_id": "a1", "agent_type": "research"})))
        .with_status(200)
        .with_body(r#"{"id":"a1"}"#)
        .create_async()
        .await;

    let response = client(&server.url())
        .request(
            "POST",
            "/agents",
            Some(json!({"agent_id": "a1", "agent_type": "research"})),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, json!({"id": "a1"}));
}

#[tokio::test]
async fn test_base_url_with_prefix_and_trailing_slash() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/results/a1")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let response = client(&format!("{}/v1/", server.url()))
        .request("GET", "/results/a1", None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_http_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/results/x")
        .with_status(500)
        .with_body("database down")
        .expect(1)
        .create_async()
        .await;

    let err = client(&server.url())
        .request("GET", "/results/x", None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.to_string(), "HTTP 500: database down");
}

#[tokio::test]
async fn test_typed_endpoint_against_real_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/agents")
        .match_body(Matcher::Json(json!({
            "agent_id": "research_agent_001",
            "agent_type": "research"
        })))
        .with_status(201)
        .with_body(r#"{"registered":true}"#)
        .create_async()
        .await;

    let agent = NewAgent {
        agent_id: "research_agent_001".parse().unwrap(),
        agent_type: "research".to_string(),
    };
    let value = client(&server.url()).register_agent(&agent).await.unwrap();

    mock.assert_async().await;
    assert_eq!(value, json!({"registered": true}));
}

#[tokio::test]
async fn test_connection_refused_retries_then_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .request("GET", "/results/a1", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport(TransportErrorKind::Connect));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_cancel_before_send() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/results/a1")
        .expect(0)
        .create_async()
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let err = client(&server.url())
        .request_with(
            "GET",
            "/results/a1",
            None,
            &CallOptions::new().cancel_on(token),
        )
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ApiError::Cancelled));
}

#[tokio::test]
async fn test_shared_client_serves_concurrent_calls() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/results/agent-\d$".to_string()))
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .expect(5)
        .create_async()
        .await;

    let client = Arc::new(client(&server.url()));
    let mut handles = Vec::new();
    for i in 0..5 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client
                .request("GET", &format!("/results/agent-{}", i), None)
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().body, json!({"ok": true}));
    }

    mock.assert_async().await;
}
