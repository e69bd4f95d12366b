use crate::models::catalog::{BookSummary, TrendingPick, WorkDetail};
use crate::services::catalog::{CatalogApi, CatalogError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory catalog for tests. Unknown work ids answer 404.
#[derive(Default)]
pub struct StubCatalog {
    pub listings: HashMap<String, Vec<BookSummary>>,
    pub subjects: HashMap<String, Vec<String>>,
    pub trending: Vec<TrendingPick>,
    pub fail: bool,
    pub failing_queries: Vec<String>,
    pub detail_calls: AtomicUsize,
}

impl StubCatalog {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_listing(mut self, key: &str, books: Vec<BookSummary>) -> Self {
        self.listings.insert(key.to_string(), books);
        self
    }

    pub fn with_work(mut self, work_id: &str, subjects: &[&str]) -> Self {
        self.subjects.insert(
            work_id.to_string(),
            subjects.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Makes `search` fail for one query while everything else still answers.
    pub fn failing_for(mut self, query: &str) -> Self {
        self.failing_queries.push(query.to_string());
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.fail {
            Err(CatalogError::Status {
                status: 503,
                url: "stub".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn summary(title: &str, work_id: Option<&str>) -> BookSummary {
    BookSummary {
        title: title.to_string(),
        author: None,
        year: None,
        cover_url: None,
        work_id: work_id.map(str::to_string),
    }
}

#[async_trait]
impl CatalogApi for StubCatalog {
    async fn search(&self, query: &str, _: usize) -> Result<Vec<BookSummary>, CatalogError> {
        self.check()?;
        if self.failing_queries.iter().any(|q| q == query) {
            return Err(CatalogError::Status {
                status: 503,
                url: query.to_string(),
            });
        }
        Ok(self.listings.get(query).cloned().unwrap_or_default())
    }

    async fn by_subject(&self, subject: &str, _: usize) -> Result<Vec<BookSummary>, CatalogError> {
        self.check()?;
        Ok(self.listings.get(subject).cloned().unwrap_or_default())
    }

    async fn work_details(&self, work_id: &str) -> Result<WorkDetail, CatalogError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        match self.subjects.get(work_id) {
            Some(subjects) => Ok(WorkDetail {
                title: format!("Work {}", work_id),
                description: "About it".to_string(),
                subjects: subjects.clone(),
            }),
            None => Err(CatalogError::Status {
                status: 404,
                url: work_id.to_string(),
            }),
        }
    }

    async fn trending(&self) -> Result<Vec<TrendingPick>, CatalogError> {
        self.check()?;
        Ok(self.trending.clone())
    }
}
