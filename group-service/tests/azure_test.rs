mod common;

use common::{TEST_TENANT, TestApp};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn connection_test_reports_organization() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/organization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "id": "org-1", "displayName": "Contoso" }]
        })))
        .mount(&app.graph_server)
        .await;

    let response = Client::new()
        .get(format!("{}/azure/test", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "connected");
    assert_eq!(body["tenant_id"], TEST_TENANT);
    assert_eq!(body["organization"], "Contoso");
}

#[tokio::test]
async fn connection_test_handles_missing_org_info() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/organization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&app.graph_server)
        .await;

    let response = Client::new()
        .get(format!("{}/azure/test", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "connected");
    assert!(body.get("organization").is_none());
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("could not retrieve organization info"));
}

#[tokio::test]
async fn connection_test_folds_remote_failure_into_payload() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/organization"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": "InternalServerError", "message": "boom" }
        })))
        .mount(&app.graph_server)
        .await;

    let response = Client::new()
        .get(format!("{}/azure/test", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().contains("boom"));
}

#[tokio::test]
async fn connection_test_reports_auth_failure_as_failed_status() {
    // Separate app whose token endpoint rejects the credentials.
    let app = TestApp::spawn().await;

    app.graph_server.reset().await;
    Mock::given(method("POST"))
        .and(path(format!("/{TEST_TENANT}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret"
        })))
        .mount(&app.graph_server)
        .await;

    let response = Client::new()
        .get(format!("{}/azure/test", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().contains("Token request failed"));
}
