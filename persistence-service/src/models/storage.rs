use crate::models::book::{NewSavedBook, SavedBook};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Mutex;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("Connection error: {0}")]
    Connection(String),
}

#[async_trait]
pub trait StorageBackend {
    /// Inserts the book, or replaces the row that already holds its `work_id`.
    async fn upsert_book(&self, book: &NewSavedBook) -> Result<SavedBook, StorageError>;
    /// Newest first, at most `limit` rows.
    async fn list_books(&self, limit: i64) -> Result<Vec<SavedBook>, StorageError>;
    async fn test_connection(&self) -> Result<(), StorageError>;
    fn name(&self) -> &'static str;
}

const TABLE: &str = "saved_books";

/// Hosted Postgres behind a PostgREST endpoint, authenticated with the service role key.
pub struct SupabaseBackend {
    client: reqwest::Client,
    rest_url: String,
}

#[derive(Debug, Deserialize)]
struct RestError {
    message: Option<String>,
}

impl SupabaseBackend {
    pub fn new(supabase_url: &str, service_key: &str) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(service_key)
            .map_err(|e| StorageError::Connection(format!("invalid service key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", service_key))
            .map_err(|e| StorageError::Connection(format!("invalid service key: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1/{}", supabase_url.trim_end_matches('/'), TABLE),
        })
    }

    async fn read_rows(response: reqwest::Response) -> Result<Vec<SavedBook>, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<RestError>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("store responded with {}", status));
        error!("Supabase request failed ({}): {}", status, body);
        Err(StorageError::Rejected(message))
    }
}

#[async_trait]
impl StorageBackend for SupabaseBackend {
    async fn upsert_book(&self, book: &NewSavedBook) -> Result<SavedBook, StorageError> {
        let response = self
            .client
            .post(&self.rest_url)
            .query(&[("on_conflict", "work_id"), ("select", "*")])
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[book])
            .send()
            .await?;

        Self::read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Rejected("upsert returned no row".to_string()))
    }

    async fn list_books(&self, limit: i64) -> Result<Vec<SavedBook>, StorageError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(&self.rest_url)
            .query(&[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        Self::read_rows(response).await
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        let response = self
            .client
            .get(&self.rest_url)
            .query(&[("select", "work_id"), ("limit", "1")])
            .send()
            .await?;
        Self::read_rows(response).await.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPool::connect(database_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS saved_books (
                work_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT,
                cover_url TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_saved_books_created_at ON saved_books(created_at DESC)
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    fn row_to_book(row: &PgRow) -> SavedBook {
        SavedBook {
            work_id: row.get("work_id"),
            title: row.get("title"),
            author: row.get("author"),
            cover_url: row.get("cover_url"),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        }
    }
}

#[async_trait]
impl StorageBackend for PostgresBackend {
    async fn upsert_book(&self, book: &NewSavedBook) -> Result<SavedBook, StorageError> {
        let row = sqlx::query(
            r#"
            INSERT INTO saved_books (work_id, title, author, cover_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (work_id) DO UPDATE SET
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                cover_url = EXCLUDED.cover_url
            RETURNING work_id, title, author, cover_url, created_at
            "#,
        )
        .bind(&book.work_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.cover_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::row_to_book(&row))
    }

    async fn list_books(&self, limit: i64) -> Result<Vec<SavedBook>, StorageError> {
        let rows = sqlx::query(
            "SELECT work_id, title, author, cover_url, created_at FROM saved_books ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::row_to_book).collect())
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// Process-local store; rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryBackend {
    rows: Mutex<Vec<SavedBook>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<SavedBook>>, StorageError> {
        self.rows
            .lock()
            .map_err(|_| StorageError::Connection("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn upsert_book(&self, book: &NewSavedBook) -> Result<SavedBook, StorageError> {
        let mut rows = self.lock()?;

        if let Some(existing) = rows.iter_mut().find(|row| row.work_id == book.work_id) {
            existing.title = book.title.clone();
            existing.author = book.author.clone();
            existing.cover_url = book.cover_url.clone();
            return Ok(existing.clone());
        }

        let saved = SavedBook {
            work_id: book.work_id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            cover_url: book.cover_url.clone(),
            created_at: Utc::now(),
        };
        rows.push(saved.clone());
        Ok(saved)
    }

    async fn list_books(&self, limit: i64) -> Result<Vec<SavedBook>, StorageError> {
        let rows = self.lock()?;

        // Later inserts win ties on created_at.
        let mut newest_first: Vec<SavedBook> = rows.iter().rev().cloned().collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        newest_first.truncate(limit.max(0) as usize);

        Ok(newest_first)
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        self.lock().map(|_| ())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Query, State},
        http::{HeaderMap, Method, StatusCode},
        response::{IntoResponse, Json, Response},
        routing::any,
        Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct RestCall {
        method: Method,
        query: HashMap<String, String>,
        headers: HeaderMap,
        body: String,
    }

    /// Stand-in PostgREST endpoint that records each call.
    struct FakeRest {
        calls: Mutex<Vec<RestCall>>,
        reject: bool,
    }

    async fn fake_rest(
        State(rest): State<Arc<FakeRest>>,
        method: Method,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
        body: String,
    ) -> Response {
        rest.calls.lock().unwrap().push(RestCall {
            method,
            query,
            headers,
            body,
        });

        if rest.reject {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "message": "permission denied for table saved_books" })),
            )
                .into_response();
        }

        Json(json!([{
            "work_id": "OL1W",
            "title": "Dune",
            "author": null,
            "cover_url": null,
            "created_at": "2024-05-01T12:00:00Z"
        }]))
        .into_response()
    }

    async fn spawn_fake_rest(reject: bool) -> (String, Arc<FakeRest>) {
        let rest = Arc::new(FakeRest {
            calls: Mutex::new(Vec::new()),
            reject,
        });
        let app = Router::new()
            .route("/rest/v1/saved_books", any(fake_rest))
            .with_state(rest.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        (format!("http://{}", addr), rest)
    }

    fn header<'a>(call: &'a RestCall, name: &str) -> Option<&'a str> {
        call.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn book(work_id: &str, title: &str) -> NewSavedBook {
        NewSavedBook {
            work_id: work_id.to_string(),
            title: title.to_string(),
            author: None,
            cover_url: None,
        }
    }

    #[tokio::test]
    async fn test_memory_upsert_replaces_existing_row() {
        let backend = MemoryBackend::new();

        let first = backend.upsert_book(&book("OL1W", "Dune")).await.unwrap();
        let second = backend
            .upsert_book(&book("OL1W", "Dune (Updated)"))
            .await
            .unwrap();

        assert_eq!(second.title, "Dune (Updated)");
        assert_eq!(second.created_at, first.created_at);

        let rows = backend.list_books(50).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Dune (Updated)");
    }

    #[tokio::test]
    async fn test_memory_list_is_newest_first_and_bounded() {
        let backend = MemoryBackend::new();
        for i in 0..5 {
            backend
                .upsert_book(&book(&format!("OL{}W", i), "Book"))
                .await
                .unwrap();
        }

        let rows = backend.list_books(3).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.work_id.as_str()).collect();
        assert_eq!(ids, vec!["OL4W", "OL3W", "OL2W"]);
    }

    #[tokio::test]
    async fn test_memory_list_zero_limit() {
        let backend = MemoryBackend::new();
        backend.upsert_book(&book("OL1W", "Dune")).await.unwrap();
        assert!(backend.list_books(0).await.unwrap().is_empty());
    }

    #[test]
    fn test_supabase_rest_url() {
        let backend = SupabaseBackend::new("https://example.supabase.co/", "secret").unwrap();
        assert_eq!(
            backend.rest_url,
            "https://example.supabase.co/rest/v1/saved_books"
        );
    }

    #[tokio::test]
    async fn test_supabase_upsert_request_shape() {
        let (url, rest) = spawn_fake_rest(false).await;
        let backend = SupabaseBackend::new(&url, "service-key").unwrap();

        let saved = backend.upsert_book(&book("OL1W", "Dune")).await.unwrap();
        assert_eq!(saved.work_id, "OL1W");
        assert_eq!(saved.author, None);

        let calls = rest.calls.lock().unwrap();
        let call = &calls[0];
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.query.get("on_conflict").map(String::as_str), Some("work_id"));
        assert_eq!(call.query.get("select").map(String::as_str), Some("*"));
        assert_eq!(header(call, "apikey"), Some("service-key"));
        assert_eq!(header(call, "authorization"), Some("Bearer service-key"));
        assert_eq!(
            header(call, "prefer"),
            Some("resolution=merge-duplicates,return=representation")
        );

        let body: Value = serde_json::from_str(&call.body).unwrap();
        assert_eq!(body[0]["work_id"], "OL1W");
        assert_eq!(body[0]["title"], "Dune");
    }

    #[tokio::test]
    async fn test_supabase_list_request_shape() {
        let (url, rest) = spawn_fake_rest(false).await;
        let backend = SupabaseBackend::new(&url, "service-key").unwrap();

        let rows = backend.list_books(7).await.unwrap();
        assert_eq!(rows.len(), 1);

        let calls = rest.calls.lock().unwrap();
        let call = &calls[0];
        assert_eq!(call.method, Method::GET);
        assert_eq!(call.query.get("order").map(String::as_str), Some("created_at.desc"));
        assert_eq!(call.query.get("limit").map(String::as_str), Some("7"));
        assert_eq!(call.query.get("select").map(String::as_str), Some("*"));
    }

    #[tokio::test]
    async fn test_supabase_rejection_carries_store_message() {
        let (url, _rest) = spawn_fake_rest(true).await;
        let backend = SupabaseBackend::new(&url, "service-key").unwrap();

        let err = backend.upsert_book(&book("OL1W", "Dune")).await.unwrap_err();
        assert_eq!(err.to_string(), "permission denied for table saved_books");
    }
}
