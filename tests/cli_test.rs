use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};

fn eapi(url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("eapi"));
    cmd.env_remove("EAPI_BASE_URL")
        .env_remove("EAPI_API_KEY")
        .env_remove("EAPI_TIMEOUT_MS")
        .env_remove("EAPI_MAX_RETRIES")
        .arg("--base-url")
        .arg(url)
        .arg("--api-key")
        .arg("test-key");
    cmd
}

#[test]
fn test_register_agent_end_to_end() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("POST", "/agents")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "agent_id": "research_agent_001",
            "agent_type": "research"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"a1"}"#)
        .create();

    eapi(&url)
        .args(["agents", "register", "research_agent_001", "research"])
        .assert()
        .success()
        .stdout(predicates::str::contains(r#""id": "a1""#));

    mock.assert();
}

#[test]
fn test_assign_task_end_to_end() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("POST", "/tasks")
        .match_body(Matcher::Json(serde_json::json!({
            "agent_id": "research_agent_001",
            "task_description": "Analyze the sentiment of a given text.",
            "task_data": {"text": "This is a great product!"}
        })))
        .with_status(201)
        .with_body(r#"{"task_id":"t-1"}"#)
        .create();

    eapi(&url)
        .args([
            "tasks",
            "assign",
            "research_agent_001",
            "Analyze the sentiment of a given text.",
            "--data",
            r#"{"text": "This is a great product!"}"#,
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("t-1"));

    mock.assert();
}

#[test]
fn test_results_not_found_fails() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/results/x")
        .with_status(404)
        .with_body(r#"{"message":"unknown agent"}"#)
        .expect(1)
        .create();

    eapi(&url)
        .args(["results", "get", "x"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("HTTP 404: unknown agent"));

    mock.assert();
}

#[test]
fn test_invalid_json_response_fails() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/agent/status/a1")
        .with_status(200)
        .with_body("definitely not json")
        .create();

    eapi(&url)
        .args(["status", "get", "a1"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to decode response body"));
}

#[test]
fn test_delete_with_empty_body() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("DELETE", "/agent/status/a1")
        .with_status(204)
        .create();

    eapi(&url)
        .args(["status", "delete", "a1"])
        .assert()
        .success()
        .stdout(predicates::str::contains(r#""deleted": true"#));

    mock.assert();
}

#[test]
fn test_list_messages_sends_pagination() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/queue/message?limit=5&offset=10")
        .with_status(200)
        .with_body(r#"[{"id":"m-1"}]"#)
        .create();

    eapi(&url)
        .args(["messages", "list", "--limit", "5", "--offset", "10"])
        .assert()
        .success()
        .stdout(predicates::str::contains("m-1"));

    mock.assert();
}

#[test]
fn test_raw_request_rejects_unsupported_method() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server.mock("PATCH", "/agents").expect(0).create();

    eapi(&url)
        .args(["request", "PATCH", "/agents"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unsupported HTTP method"));

    mock.assert();
}

#[test]
fn test_missing_api_key_fails() {
    let mut cmd = Command::new(cargo::cargo_bin!("eapi"));
    cmd.env_remove("EAPI_API_KEY")
        .env("EAPI_BASE_URL", "http://127.0.0.1:9")
        .args(["results", "get", "a1"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("No API key given"));
}

#[test]
fn test_connection_refused_is_reported() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    eapi(&format!("http://{}", addr))
        .args(["results", "get", "a1", "--max-retries", "0"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("transport failure"));
}
