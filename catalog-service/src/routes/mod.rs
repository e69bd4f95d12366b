pub mod browse;
pub mod health;

use crate::services::frontend::Frontend;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use browse::{chart_config, close_modal, index, search, subject, trending, work_details};
use health::health_check;

#[derive(Clone)]
pub struct AppState {
    pub frontend: Frontend,
    pub default_subject: String,
    pub chart_enabled: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/status", get(health_check))
        .route("/search", get(search))
        .route("/subject", get(subject))
        .route("/works/:work_id", get(work_details))
        .route("/modal/close", get(close_modal))
        .route("/trending", get(trending))
        .route("/chart.json", get(chart_config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
