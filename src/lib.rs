pub mod aggregation;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
pub mod middleware;
pub mod models;
pub mod state;

use axum::{Router, http::StatusCode, middleware as axum_middleware};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use config::Config;
use db::MongoReviewStore;
use errors::AppError;
use middleware::{cors_layer, log_body_middleware, panic_response};
use state::AppState;

/// Assembles the full router: `/api` routes, shared layers, and either the
/// static site (production) or a plain 404 fallback.
pub fn create_app(state: AppState, config: &Config) -> Router {
    let api = http::create_http_routes(state);
    let api = if config.log_bodies {
        api.layer(axum_middleware::from_fn(log_body_middleware))
    } else {
        api
    };

    let app = Router::new().nest("/api", api);

    let app = if config.is_production() {
        let index = config.static_dir.join("index.html");
        tracing::info!("Serving frontend from {}", config.static_dir.display());
        app.route_service("/", ServeFile::new(index))
            .fallback_service(ServeDir::new(&config.static_dir))
    } else {
        app.fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer())
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store = MongoReviewStore::connect(&config).await?;
    let state = AppState::new(store);

    let app = create_app(state.clone(), &config);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.shutdown().await;
    tracing::info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
}
