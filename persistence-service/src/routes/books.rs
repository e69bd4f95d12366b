use crate::error::ApiError;
use crate::models::book::SaveBookRequest;
use crate::models::responses::{ListResponse, SaveResponse};
use crate::state::Store;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
}

/// Parses the save body from raw bytes so clients that omit `Content-Type` still work.
/// Non-object bodies carry no fields and fail validation downstream.
fn parse_save_body(body: &[u8]) -> Result<SaveBookRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SaveBookRequest::default());
    }

    let mut value: Value = serde_json::from_slice(body)?;
    // Some clients double-encode the payload as a JSON string.
    if let Value::String(inner) = &value {
        value = serde_json::from_str(inner)?;
    }

    match value {
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Ok(SaveBookRequest::default()),
    }
}

pub fn resolve_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(0, MAX_LIST_LIMIT)
}

pub async fn save_book(
    State(store): State<Store>,
    body: Bytes,
) -> Result<Json<SaveResponse>, ApiError> {
    let backend = store.backend()?;
    let book = parse_save_body(&body)?.validate()?;

    info!("Saving book {} ({})", book.work_id, book.title);

    let saved = backend.upsert_book(&book).await.map_err(|e| {
        error!("save-book error: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(SaveResponse {
        message: "Saved!".to_string(),
        saved,
    }))
}

pub async fn list_saved_books(
    State(store): State<Store>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let backend = store.backend()?;
    let limit = resolve_limit(params.limit.as_deref());

    let saved_books = backend.list_books(limit).await.map_err(|e| {
        error!("saved-books error: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(ListResponse {
        count: saved_books.len(),
        saved_books,
    }))
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn post_only() -> ApiError {
    ApiError::MethodNotAllowed("POST")
}

pub async fn get_only() -> ApiError {
    ApiError::MethodNotAllowed("GET")
}
