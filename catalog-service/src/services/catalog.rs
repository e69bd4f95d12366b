use crate::models::catalog::{
    BookSummary, ReadingLogResponse, SearchResponse, SubjectResponse, TrendingPick, WorkDetail,
    WorkResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use urlencoding::encode;

pub const TRENDING_LIMIT: usize = 12;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog responded with {status} for {url}")]
    Status { status: u16, url: String },
}

/// Read-only access to the book catalog. Each call is a single GET with no retry.
#[async_trait]
pub trait CatalogApi {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<BookSummary>, CatalogError>;
    async fn by_subject(&self, subject: &str, limit: usize)
        -> Result<Vec<BookSummary>, CatalogError>;
    async fn work_details(&self, work_id: &str) -> Result<WorkDetail, CatalogError>;
    async fn trending(&self) -> Result<Vec<TrendingPick>, CatalogError>;
}

pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
    covers_base: String,
    trending_user: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str, covers_base: &str, trending_user: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            covers_base: covers_base.trim_end_matches('/').to_string(),
            trending_user: trending_user.to_string(),
        }
    }

    pub fn search_url(&self, query: &str, limit: usize) -> String {
        format!("{}/search.json?q={}&limit={}", self.base_url, encode(query), limit)
    }

    pub fn subject_url(&self, subject: &str, limit: usize) -> String {
        format!("{}/subjects/{}.json?limit={}", self.base_url, encode(subject), limit)
    }

    pub fn work_url(&self, work_id: &str) -> String {
        format!("{}/works/{}.json", self.base_url, encode(work_id))
    }

    pub fn trending_url(&self) -> String {
        format!(
            "{}/people/{}/books/want-to-read.json?limit={}",
            self.base_url,
            encode(&self.trending_user),
            TRENDING_LIMIT
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!("Catalog request {} failed: {}", url, response.status());
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogApi for OpenLibraryClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<BookSummary>, CatalogError> {
        let data: SearchResponse = self.get_json(&self.search_url(query, limit)).await?;

        Ok(data
            .docs
            .unwrap_or_default()
            .into_iter()
            .map(|doc| doc.into_summary(&self.covers_base))
            .collect())
    }

    async fn by_subject(
        &self,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<BookSummary>, CatalogError> {
        let data: SubjectResponse = self.get_json(&self.subject_url(subject, limit)).await?;

        Ok(data
            .works
            .unwrap_or_default()
            .into_iter()
            .map(|work| work.into_summary(&self.covers_base))
            .collect())
    }

    async fn work_details(&self, work_id: &str) -> Result<WorkDetail, CatalogError> {
        let data: WorkResponse = self.get_json(&self.work_url(work_id)).await?;
        Ok(data.into_detail())
    }

    async fn trending(&self) -> Result<Vec<TrendingPick>, CatalogError> {
        let data: ReadingLogResponse = self.get_json(&self.trending_url()).await?;

        Ok(data
            .reading_log_entries
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.into_pick(&self.covers_base))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenLibraryClient {
        OpenLibraryClient::new(
            "https://openlibrary.org/",
            "https://covers.openlibrary.org",
            "mekBot",
        )
    }

    #[test]
    fn test_urls_are_encoded() {
        let client = client();
        assert_eq!(
            client.search_url("lord of the rings", 12),
            "https://openlibrary.org/search.json?q=lord%20of%20the%20rings&limit=12"
        );
        assert_eq!(
            client.subject_url("science fiction", 6),
            "https://openlibrary.org/subjects/science%20fiction.json?limit=6"
        );
        assert_eq!(
            client.work_url("OL45883W"),
            "https://openlibrary.org/works/OL45883W.json"
        );
        assert_eq!(
            client.trending_url(),
            "https://openlibrary.org/people/mekBot/books/want-to-read.json?limit=12"
        );
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_an_error() {
        let client = OpenLibraryClient::new("http://127.0.0.1:9", "http://127.0.0.1:9", "nobody");
        assert!(client.search("dune", 5).await.is_err());
    }
}
