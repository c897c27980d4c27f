//! Application startup and lifecycle management.
//!
//! Service clients are built once per process and injected; every handler
//! shares them read-only.

use crate::auth::Authorizer;
use crate::config::GatewayConfig;
use crate::handlers::{http, Handler, HandlerKind, Handlers, PromptService};
use crate::services::{
    BedrockInvoker, CompletionClient, ImageClient, ImagePromptWriter, ImageService,
    KendraSearchClient, ModelInvoker, ObjectStore, RagService, Retriever, S3ObjectStore,
    SearchClient,
};
use aws_config::{BehaviorVersion, Region};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Handles to the managed services.
#[derive(Clone)]
pub struct Clients {
    pub invoker: Arc<dyn ModelInvoker>,
    pub search: Arc<dyn SearchClient>,
    pub store: Arc<dyn ObjectStore>,
}

impl Clients {
    /// Build the AWS SDK clients from the default credential chain.
    pub async fn from_aws(config: &GatewayConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.aws.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        tracing::info!(
            region = ?sdk_config.region().map(|r| r.as_ref()),
            "Loaded AWS configuration"
        );

        Self {
            invoker: Arc::new(BedrockInvoker::new(aws_sdk_bedrockruntime::Client::new(
                &sdk_config,
            ))),
            search: Arc::new(KendraSearchClient::new(aws_sdk_kendra::Client::new(
                &sdk_config,
            ))),
            store: Arc::new(S3ObjectStore::new(
                aws_sdk_s3::Client::new(&sdk_config),
                config.storage.bucket_name.clone(),
            )),
        }
    }
}

impl Handlers {
    pub fn build(config: &GatewayConfig, clients: &Clients) -> Result<Self, AppError> {
        let authorizer = Authorizer::new(config.auth.caller_marker.clone());

        let claude = CompletionClient::new(clients.invoker.clone(), &config.models.claude_model)?;
        let llama = CompletionClient::new(clients.invoker.clone(), &config.models.llama_model)?;
        let rag = RagService::new(
            Retriever::new(clients.search.clone(), &config.kendra.index_id),
            claude.clone(),
        );
        let image = ImageService::new(
            ImagePromptWriter::new(clients.invoker.clone(), &config.models.claude_model)?,
            ImageClient::new(clients.invoker.clone(), &config.models.image_model),
            clients.store.clone(),
        );

        tracing::info!(
            claude_model = %config.models.claude_model,
            llama_model = %config.models.llama_model,
            image_model = %config.models.image_model,
            kendra_index = %config.kendra.index_id,
            "Initialized handlers"
        );

        Ok(Self {
            claude: handler(HandlerKind::Claude, &authorizer, Arc::new(claude)),
            llama: handler(HandlerKind::Llama, &authorizer, Arc::new(llama)),
            kendra: handler(HandlerKind::Kendra, &authorizer, Arc::new(rag)),
            image: handler(HandlerKind::Image, &authorizer, Arc::new(image)),
        })
    }
}

fn handler(
    kind: HandlerKind,
    authorizer: &Authorizer,
    service: Arc<dyn PromptService>,
) -> Arc<Handler> {
    Arc::new(Handler::new(kind, authorizer.clone(), service))
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub handlers: Handlers,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::health_check))
        .route("/:kind", post(http::invoke))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration and service clients.
    pub async fn build(config: GatewayConfig, clients: Clients) -> Result<Self, AppError> {
        let handlers = Handlers::build(&config, &clients)?;

        // Port 0 picks a random port (tests).
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("GenAI gateway listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState { handlers },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
