mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_reports_database_up() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "dataroom-service");
}

#[tokio::test]
async fn metrics_endpoint_serves_text() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
}
