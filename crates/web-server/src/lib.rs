use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use configuration::{settings::Config, ServerSettings};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod assembler;
pub mod error;
pub mod handlers;

pub use assembler::{ResponseAssembler, TradingData};
pub use error::AppError;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub assembler: ResponseAssembler,
}

/// Builds the application router. Split out from `run_server` so tests can
/// drive it without binding a socket.
pub fn build_router(state: Arc<AppState>, settings: &ServerSettings) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/trading-data", get(handlers::get_trading_data))
        .with_state(state)
        .layer(cors_layer(settings))
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(settings: &ServerSettings) -> CorsLayer {
    let origin = if settings.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = settings
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring unparsable CORS origin.");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Tracing is initialized by the binary, not here.
    let assembler = ResponseAssembler::from_config(&config)?;
    let app_state = Arc::new(AppState { assembler });
    let app = build_router(app_state, &config.server);

    let addr = config.server.bind_address;
    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal."),
        Err(err) => tracing::error!(error = ?err, "Failed to listen for the shutdown signal."),
    }
}
