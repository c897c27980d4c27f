//! Shared helpers for genai-gateway integration tests.

use genai_gateway::config::{
    AuthConfig, AwsConfig, GatewayConfig, KendraConfig, ModelConfig, StorageConfig,
    DEFAULT_CALLER_MARKER, DEFAULT_CLAUDE_MODEL, DEFAULT_IMAGE_MODEL, DEFAULT_LLAMA_MODEL,
};
use genai_gateway::services::mock::{MockInvoker, MockObjectStore, MockSearchClient};
use genai_gateway::services::retriever::SearchHit;
use genai_gateway::startup::{Application, Clients};
use std::sync::Arc;
use std::time::Duration;

pub const INDEX_ID: &str = "test-index";
pub const BUCKET: &str = "test-bucket";
pub const CALLER_AGENT: &str = "Mozilla/5.0 (compatible; AppsheetBot/1.0)";

pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        common: service_core::config::Config { port: 0 },
        log_level: "debug".to_string(),
        aws: AwsConfig { region: None },
        auth: AuthConfig {
            caller_marker: DEFAULT_CALLER_MARKER.to_string(),
        },
        models: ModelConfig {
            claude_model: DEFAULT_CLAUDE_MODEL.to_string(),
            llama_model: DEFAULT_LLAMA_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        },
        kendra: KendraConfig {
            index_id: INDEX_ID.to_string(),
        },
        storage: StorageConfig {
            bucket_name: BUCKET.to_string(),
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub invoker: Arc<MockInvoker>,
    pub search: Arc<MockSearchClient>,
    pub store: Arc<MockObjectStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn post(&self, handler: &str, user_agent: &str, body: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/{}", self.address, handler))
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Spawn the application on a random port, backed by the given search hits
/// and a fresh mock invoker and object store.
pub async fn spawn_app(hits: Vec<SearchHit>) -> TestApp {
    let invoker = Arc::new(MockInvoker::new());
    let search = Arc::new(MockSearchClient::with_hits(hits));
    let store = Arc::new(MockObjectStore::new(BUCKET));

    let clients = Clients {
        invoker: invoker.clone(),
        search: search.clone(),
        store: store.clone(),
    };

    let app = Application::build(test_config(), clients)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestApp {
        address: format!("http://localhost:{}", port),
        invoker,
        search,
        store,
        client: reqwest::Client::new(),
    }
}
