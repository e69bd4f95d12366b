use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod models;
mod routes;
mod state;

use config::Config;
use state::Store;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("persistence_service=info,tower_http=info")),
        )
        .init();

    let config = Config::load();

    let store = match Store::connect(config.backend).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize storage backend: {}", e);
            std::process::exit(1);
        }
    };

    match &store {
        Store::Ready(backend) => {
            if let Err(e) = backend.test_connection().await {
                error!("Failed to connect to storage backend: {}", e);
                std::process::exit(1);
            }
            info!("Storage backend connection successful");
        }
        Store::Misconfigured(e) => {
            warn!("Storage is not configured, every request will fail: {}", e);
        }
    }

    let app = routes::router(store);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Persistence service starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
