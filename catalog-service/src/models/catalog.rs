//! Catalog records as the frontend uses them, plus the raw Open Library
//! response shapes they are normalized from.
//!
//! Each source shape has exactly one normalization function:
//!
//! - search results (`docs`) via [`SearchDoc::into_summary`]
//! - subject listings (`works`) via [`SubjectWork::into_summary`]
//! - reading-log entries via [`ReadingLogEntry::into_pick`]
//! - work detail documents via [`WorkResponse::into_detail`]
use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNTITLED: &str = "Untitled";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const MAX_DETAIL_SUBJECTS: usize = 12;

/// The catalog sends publication years both as numbers and as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublishYear {
    Number(i64),
    Text(String),
}

impl fmt::Display for PublishYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishYear::Number(year) => write!(f, "{}", year),
            PublishYear::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub title: String,
    pub author: Option<String>,
    pub year: Option<PublishYear>,
    pub cover_url: Option<String>,
    pub work_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingPick {
    pub title: String,
    pub work_id: Option<String>,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkDetail {
    pub title: String,
    pub description: String,
    pub subjects: Vec<String>,
}

/// Extracts `<id>` from a `/works/<id>` key.
pub fn work_id_from_key(key: Option<&str>) -> Option<String> {
    key?.strip_prefix("/works/")
        .filter(|id| !id.is_empty() && !id.contains('/'))
        .map(str::to_string)
}

/// Medium-size cover image for a numeric cover id.
pub fn cover_url(covers_base: &str, cover_id: Option<i64>) -> Option<String> {
    cover_id
        .filter(|id| *id > 0)
        .map(|id| format!("{}/b/id/{}-M.jpg", covers_base.trim_end_matches('/'), id))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank_year(year: Option<PublishYear>) -> Option<PublishYear> {
    match year {
        Some(PublishYear::Text(text)) if text.trim().is_empty() => None,
        other => other,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    pub docs: Option<Vec<SearchDoc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub title_suggest: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub first_publish_year: Option<PublishYear>,
    pub cover_i: Option<i64>,
}

impl SearchDoc {
    pub fn into_summary(self, covers_base: &str) -> BookSummary {
        BookSummary {
            work_id: work_id_from_key(self.key.as_deref()),
            title: non_blank(self.title)
                .or_else(|| non_blank(self.title_suggest))
                .unwrap_or_else(|| UNTITLED.to_string()),
            author: non_blank(self.author_name.and_then(|names| names.into_iter().next())),
            year: non_blank_year(self.first_publish_year),
            cover_url: cover_url(covers_base, self.cover_i),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubjectResponse {
    pub works: Option<Vec<SubjectWork>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorRef {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubjectWork {
    pub key: Option<String>,
    pub title: Option<String>,
    pub authors: Option<Vec<AuthorRef>>,
    pub first_publish_year: Option<PublishYear>,
    pub first_publish_date: Option<PublishYear>,
    pub cover_id: Option<i64>,
}

impl SubjectWork {
    pub fn into_summary(self, covers_base: &str) -> BookSummary {
        BookSummary {
            work_id: work_id_from_key(self.key.as_deref()),
            title: non_blank(self.title).unwrap_or_else(|| UNTITLED.to_string()),
            author: non_blank(
                self.authors
                    .and_then(|authors| authors.into_iter().next())
                    .and_then(|author| author.name),
            ),
            year: non_blank_year(self.first_publish_year)
                .or_else(|| non_blank_year(self.first_publish_date)),
            cover_url: cover_url(covers_base, self.cover_id),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadingLogResponse {
    pub reading_log_entries: Option<Vec<ReadingLogEntry>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadingLogEntry {
    pub work: Option<LoggedWork>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggedWork {
    pub key: Option<String>,
    pub title: Option<String>,
    pub cover_id: Option<i64>,
}

impl ReadingLogEntry {
    pub fn into_pick(self, covers_base: &str) -> TrendingPick {
        let work = self.work.unwrap_or_default();
        TrendingPick {
            work_id: work_id_from_key(work.key.as_deref()),
            title: non_blank(work.title).unwrap_or_else(|| UNTITLED.to_string()),
            cover_url: cover_url(covers_base, work.cover_id),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Typed { value: Option<String> },
    Other(serde::de::IgnoredAny),
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkResponse {
    pub title: Option<String>,
    pub description: Option<Description>,
    pub subjects: Option<Vec<serde_json::Value>>,
}

impl WorkResponse {
    /// All subjects are kept; views decide how many to show.
    pub fn into_detail(self) -> WorkDetail {
        let description = match self.description {
            Some(Description::Text(text)) => Some(text),
            Some(Description::Typed { value }) => value,
            Some(Description::Other(_)) | None => None,
        };

        WorkDetail {
            title: non_blank(self.title).unwrap_or_else(|| "Book".to_string()),
            description: non_blank(description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            subjects: self
                .subjects
                .unwrap_or_default()
                .into_iter()
                .filter_map(|subject| match subject {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        }
    }
}
