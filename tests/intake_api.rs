//! Integration tests for the intake REST API.
//!
//! Each test starts the Axum app on a random port, backed by a wiremock
//! records API, and drives it over HTTP with reqwest.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_intake::records::{HttpRecordsTransport, SubmissionClient};
use patient_intake::registration::{RegistrationDesk, RegistrationRouteState, registration_routes};
use patient_intake::tools::{SubmitRegistrationTool, ToolRegistry, ToolRouteState, tool_routes};

use common::{complete_record, fast_policy};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Start the intake API pointed at `records_url`, return its port.
async fn start_server(records_url: String) -> u16 {
    let transport = HttpRecordsTransport::new(records_url, None).unwrap();
    let client = SubmissionClient::new(Arc::new(transport), fast_policy());
    let desk = Arc::new(RegistrationDesk::new(client));
    let tools = Arc::new(ToolRegistry::new());
    tools.register_sync(Arc::new(SubmitRegistrationTool::new(Arc::clone(&desk))));
    let app = registration_routes(RegistrationRouteState { desk })
        .merge(tool_routes(ToolRouteState { registry: tools }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    port
}

async fn records_api(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn rest_health_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let records = records_api(201, json!({})).await;
        let port = start_server(records.uri()).await;

        let resp = reqwest::get(format!("http://127.0.0.1:{port}/health"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_submit_registration_success() {
    timeout(TEST_TIMEOUT, async {
        let records = records_api(201, json!({"PatientId": 77})).await;
        let port = start_server(records.uri()).await;

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/registrations"))
            .json(&complete_record())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["response"], json!({"PatientId": 77}));
        assert!(body.get("error").is_none());
        assert!(body.get("isNetworkError").is_none());

        let id = body["registrationId"].as_str().unwrap();
        let resp = reqwest::get(format!("http://127.0.0.1:{port}/api/registrations/{id}"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let state: Value = resp.json().await.unwrap();
        assert_eq!(state["phase"], "submitted");
        assert_eq!(state["lastOutcome"], "submitted");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_submit_incomplete_registration() {
    timeout(TEST_TIMEOUT, async {
        let records = records_api(201, json!({})).await;
        let port = start_server(records.uri()).await;

        let mut payload = serde_json::to_value(complete_record()).unwrap();
        payload["Address"]
            .as_object_mut()
            .unwrap()
            .remove("ZipCode");
        payload["PatientInformation"]["SSN"] = json!("   ");

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/registrations"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(
            body["missingFields"],
            json!(["PatientInformation.SSN", "Address.ZipCode"])
        );
        assert!(body.get("registrationId").is_none());
        assert!(records.received_requests().await.unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_submit_registration_rejected_upstream() {
    timeout(TEST_TIMEOUT, async {
        let records = records_api(400, json!({"error": "duplicate SSN"})).await;
        let port = start_server(records.uri()).await;

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/registrations"))
            .json(&complete_record())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 502);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["isNetworkError"], false);
        assert!(body["error"].as_str().unwrap().contains("duplicate SSN"));
        assert_eq!(records.received_requests().await.unwrap().len(), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_unknown_registration_returns_404() {
    timeout(TEST_TIMEOUT, async {
        let records = records_api(201, json!({})).await;
        let port = start_server(records.uri()).await;

        let resp = reqwest::get(format!(
            "http://127.0.0.1:{port}/api/registrations/{}",
            uuid::Uuid::new_v4()
        ))
        .await
        .unwrap();
        assert_eq!(resp.status(), 404);

        let resp = reqwest::get(format!("http://127.0.0.1:{port}/api/registrations/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_lists_dialogue_tools() {
    timeout(TEST_TIMEOUT, async {
        let records = records_api(201, json!({})).await;
        let port = start_server(records.uri()).await;

        let resp = reqwest::get(format!("http://127.0.0.1:{port}/api/tools"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let tools: Value = resp.json().await.unwrap();
        let tools = tools.as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "submit_patient_registration");
        assert_eq!(
            tools[0]["parameters"]["required"],
            json!(["PatientInformation", "Address"])
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_dialogue_tool_submits_registration() {
    timeout(TEST_TIMEOUT, async {
        let records = records_api(201, json!({"PatientId": 9})).await;
        let port = start_server(records.uri()).await;

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/tools/submit_patient_registration"))
            .json(&complete_record())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["result"]["success"], true);
        assert_eq!(body["result"]["response"], json!({"PatientId": 9}));
        assert_eq!(records.received_requests().await.unwrap().len(), 1);

        let id = body["result"]["registrationId"].as_str().unwrap();
        let state: Value = reqwest::get(format!("http://127.0.0.1:{port}/api/registrations/{id}"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(state["phase"], "submitted");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_dialogue_tool_errors() {
    timeout(TEST_TIMEOUT, async {
        let records = records_api(201, json!({})).await;
        let port = start_server(records.uri()).await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/tools/book_appointment"))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/tools/submit_patient_registration"))
            .json(&json!({"PatientInformation": "Jane Doe"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("PatientInformation"));
        assert!(records.received_requests().await.unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}
