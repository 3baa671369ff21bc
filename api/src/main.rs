use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use raildesk_core::handler::ComplaintHandler;
use raildesk_core::llm::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL, OllamaClient};
use raildesk_core::store::LogStore;

mod error;
mod routes;
mod state;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Raildesk API",
        version = "0.1.0",
        description = "Railway passenger complaint intake: keyword urgency classification, \
                       empathetic replies via a local model (with deterministic fallback), \
                       and append-only JSON complaint logs."
    ),
    paths(
        routes::health::health_check,
        routes::complaints::create_complaint,
        routes::complaints::query,
        routes::stats::get_stats,
        routes::logs::get_logs,
        routes::emergency::create_emergency,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::complaints::ComplaintRequest,
        routes::complaints::ComplaintResponse,
        routes::stats::StatsResponse,
        routes::logs::LogsResponse,
        routes::emergency::EmergencyRequest,
        routes::emergency::EmergencyResponse,
        raildesk_core::handler::ComplaintOutcome,
        raildesk_core::stats::ComplaintStats,
        crate::error::ApiError,
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "raildesk_api=debug,raildesk_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let log_dir = std::env::var("RAILDESK_LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let store = LogStore::new(&log_dir);
    store.init().expect("Failed to initialize log store");

    let ollama_url =
        std::env::var("RAILDESK_OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
    let model = std::env::var("RAILDESK_OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let timeout_secs: u64 = std::env::var("RAILDESK_OLLAMA_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(120);

    let generator = Arc::new(
        OllamaClient::new(
            ollama_url.clone(),
            model.clone(),
            Duration::from_secs(timeout_secs),
        )
        .expect("Failed to build Ollama HTTP client"),
    );
    let handler = Arc::new(ComplaintHandler::new(store.clone(), generator));
    let app_state = state::AppState { handler, store };

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::complaints::router())
        .merge(routes::stats::router())
        .merge(routes::logs::router())
        .merge(routes::emergency::router())
        .fallback(error::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%ollama_url, %model, %log_dir, "Raildesk API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
