//! Application startup and lifecycle management.

use crate::config::SafebiteConfig;
use crate::handlers;
use crate::services::identity::{FirebaseTokenVerifier, IdentityVerifier};
use crate::services::providers::gemini::GeminiTextProvider;
use crate::services::providers::TextProvider;
use crate::services::store::{DocumentStore, MongoStore};
use crate::services::tokenizer::{RuleTokenizer, Tokenizer};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Process-lifetime collaborators shared by every request. Built once at
/// startup, never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub tokenizer: Arc<dyn Tokenizer>,
    pub text_provider: Arc<dyn TextProvider>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/api/user/profile",
            get(handlers::get_profile)
                .post(handlers::create_profile)
                .put(handlers::update_profile),
        )
        .route("/api/user/chef-card", get(handlers::generate_chef_card))
        .route(
            "/api/user/logs",
            get(handlers::list_logs).post(handlers::add_log),
        )
        .route("/api/allergens", get(handlers::list_allergens))
        .route("/api/allergens/:allergen_id", get(handlers::get_allergen))
        .route("/api/analyze-text", post(handlers::analyze_text))
        .route(
            "/api/predictive-analytics",
            get(handlers::get_predictive_analytics),
        )
        .route(
            "/api/educational-resources",
            get(handlers::list_educational_resources),
        )
        .route("/api/alerts", get(handlers::get_alerts))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect every external collaborator and bind the listener.
    ///
    /// Any failure here is fatal: the process must not serve requests with
    /// a missing store, verifier or model.
    pub async fn build(config: SafebiteConfig) -> Result<Self, AppError> {
        let store = MongoStore::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("MongoDB connection failed: {}", e)))?;

        store.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            AppError::ConfigError(anyhow::anyhow!("MongoDB index setup failed: {}", e))
        })?;

        let verifier = FirebaseTokenVerifier::new(&config.firebase)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        tracing::info!(
            project_id = %config.firebase.project_id,
            "Initialized Firebase token verifier"
        );

        let text_provider = GeminiTextProvider::new(config.gemini.clone())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        tracing::info!(model = %text_provider.model(), "Initialized Gemini text provider");

        let state = AppState {
            store: Arc::new(store),
            verifier: Arc::new(verifier),
            tokenizer: Arc::new(RuleTokenizer),
            text_provider: Arc::new(text_provider),
        };

        // Port 0 picks a random port, for tests.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("SafeBite service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until_stopped(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
