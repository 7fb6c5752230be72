use group_service::config::{AzureAdConfig, Environment, GroupConfig};
use group_service::startup::Application;
use secrecy::SecretString;
use serde_json::json;
use service_core::config::Config as CoreConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TENANT: &str = "test-tenant";

/// Service under test plus the wiremock server standing in for both the
/// Azure AD login endpoint and the Graph API.
pub struct TestApp {
    pub address: String,
    pub graph_server: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let graph_server = MockServer::start().await;

        // The token endpoint answers for every test; individual tests mount
        // their own Graph mocks.
        Mock::given(method("POST"))
            .and(path(format!("/{TEST_TENANT}/oauth2/v2.0/token")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "test-access-token"
            })))
            .mount(&graph_server)
            .await;

        let config = GroupConfig {
            common: CoreConfig {
                port: 0,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            environment: Environment::Dev,
            service_name: "group-service".to_string(),
            service_version: "test".to_string(),
            log_level: "info".to_string(),
            azure: AzureAdConfig {
                tenant_id: TEST_TENANT.to_string(),
                client_id: "test-client".to_string(),
                client_secret: SecretString::new("test-secret".to_string()),
                graph_base_url: graph_server.uri(),
                graph_api_version: "v1.0".to_string(),
                login_base_url: graph_server.uri(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let address = format!("http://127.0.0.1:{port}");

        // Wait for the server to accept requests.
        let client = reqwest::Client::new();
        let health_url = format!("{address}/health");
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            graph_server,
        }
    }

    /// Requests the mock Graph server has seen, excluding token exchanges.
    pub async fn graph_requests(&self) -> Vec<wiremock::Request> {
        self.graph_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| !r.url.path().ends_with("/token"))
            .collect()
    }
}
