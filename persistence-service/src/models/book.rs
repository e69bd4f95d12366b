use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A row of the `saved_books` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBook {
    pub work_id: String,
    pub title: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for an upsert. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSavedBook {
    pub work_id: String,
    pub title: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
}

/// Raw save payload. Fields stay loosely typed so numbers and booleans can be coerced.
#[derive(Debug, Default, Deserialize)]
pub struct SaveBookRequest {
    #[serde(default)]
    pub work_id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub cover_url: Option<Value>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

impl SaveBookRequest {
    pub fn validate(&self) -> Result<NewSavedBook, MissingFields> {
        let work_id = coerce_field(self.work_id.as_ref());
        let title = coerce_field(self.title.as_ref());

        let mut missing = Vec::new();
        if work_id.is_none() {
            missing.push("work_id");
        }
        if title.is_none() {
            missing.push("title");
        }

        match (work_id, title) {
            (Some(work_id), Some(title)) => Ok(NewSavedBook {
                work_id,
                title,
                author: coerce_field(self.author.as_ref()),
                cover_url: coerce_field(self.cover_url.as_ref()),
            }),
            _ => Err(MissingFields(missing)),
        }
    }
}

/// Turns a scalar JSON value into a trimmed string. Empty, null, false and zero are absent.
fn coerce_field(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> SaveBookRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_valid_request_trims_fields() {
        let book = request(json!({
            "work_id": "  OL1W ",
            "title": " Dune ",
            "author": " Frank Herbert ",
        }))
        .validate()
        .unwrap();

        assert_eq!(book.work_id, "OL1W");
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(book.cover_url, None);
    }

    #[test]
    fn test_missing_work_id_is_named() {
        let err = request(json!({ "title": "No Id" })).validate().unwrap_err();
        assert_eq!(err.0, vec!["work_id"]);
        assert_eq!(err.to_string(), "Missing required fields: work_id");
    }

    #[test]
    fn test_missing_fields_is_an_error_source() {
        let err = request(json!({})).validate().unwrap_err();
        let source: &dyn std::error::Error = &err;
        assert_eq!(source.to_string(), "Missing required fields: work_id, title");
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let err = request(json!({ "work_id": "   ", "title": "\t" }))
            .validate()
            .unwrap_err();
        assert_eq!(err.0, vec!["work_id", "title"]);
    }

    #[test]
    fn test_numbers_are_coerced() {
        let book = request(json!({ "work_id": 42, "title": "Numbers" }))
            .validate()
            .unwrap();
        assert_eq!(book.work_id, "42");
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let book = request(json!({
            "work_id": "OL2W",
            "title": "Emma",
            "author": "",
            "cover_url": null,
        }))
        .validate()
        .unwrap();
        assert_eq!(book.author, None);
        assert_eq!(book.cover_url, None);
    }
}
