use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use portal_api::config::Config;
use portal_api::db::kv::{KeyValueStore, MemoryStore};
use portal_api::db::pg::PgPortalStore;
use portal_api::db::store::PortalStore;
use portal_api::routes::ApiDoc;
use portal_api::AppState;

#[tokio::main]
async fn main() {
    // Env vars may come from the environment instead of a .env file.
    if dotenvy::dotenv().is_err() {
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(env_path);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let port = config.port;

    let db = portal_api::db::pool::connect(&config).await;
    let store: Arc<dyn PortalStore> = Arc::new(PgPortalStore::new(db));

    // TODO: read sessions from the login service's Redis instead of process memory.
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    tracing::info!(
        import_error_preview = config.import_error_preview,
        max_upload_bytes = config.max_upload_bytes,
        "portal-api configured"
    );

    let state = AppState {
        store,
        kv,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(portal_api::routes::router().with_state(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "portal-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(?err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
