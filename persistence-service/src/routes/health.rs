use crate::models::responses::HealthResponse;
use crate::state::Store;
use axum::{extract::State, response::Json};

pub async fn health_check(State(store): State<Store>) -> Json<HealthResponse> {
    let (status, backend) = match &store {
        Store::Ready(backend) => ("running", backend.name()),
        Store::Misconfigured(_) => ("misconfigured", "none"),
    };

    Json(HealthResponse {
        service: "persistence-service".to_string(),
        status: status.to_string(),
        backend: backend.to_string(),
    })
}
