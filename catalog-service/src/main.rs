use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod models;
mod routes;
mod services;
mod session;
mod utils;
mod views;

use config::Config;
use routes::browse::DEFAULT_LIMIT;
use routes::AppState;
use services::catalog::OpenLibraryClient;
use services::frontend::Frontend;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_service=info,tower_http=info")),
        )
        .init();

    let config = Config::load();

    let catalog = Arc::new(OpenLibraryClient::new(
        &config.catalog_base_url,
        &config.covers_base_url,
        &config.trending_user,
    ));
    let frontend = Frontend::new(catalog, &config);

    info!("Loading default subject '{}'", config.default_subject);
    let request = frontend
        .load_subject(&config.default_subject, DEFAULT_LIMIT)
        .await;
    frontend.spawn_chart(request);
    frontend.load_trending().await;

    let app = routes::router(AppState {
        frontend,
        default_subject: config.default_subject.clone(),
        chart_enabled: config.chart_enabled,
    });

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Catalog service starting on {}", addr);

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
