use crate::services::catalog::CatalogApi;
use futures_util::future::join_all;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub const MAX_SAMPLED_WORKS: usize = 8;
pub const MAX_SUBJECTS_PER_WORK: usize = 8;
pub const MAX_CHART_BARS: usize = 8;

/// Subject label counts in first-seen order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubjectFrequency {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl SubjectFrequency {
    pub fn record(&mut self, subject: &str) {
        match self.index.get(subject) {
            Some(&position) => self.counts[position].1 += 1,
            None => {
                self.index.insert(subject.to_string(), self.counts.len());
                self.counts.push((subject.to_string(), 1));
            }
        }
    }

    /// Highest counts first; equal counts keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted = self.counts.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectChart {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl SubjectChart {
    pub fn from_frequency(frequency: &SubjectFrequency) -> Self {
        let (labels, values) = frequency.top(MAX_CHART_BARS).into_iter().unzip();
        Self { labels, values }
    }

    /// Chart.js bar chart configuration.
    pub fn config(&self) -> Value {
        json!({
            "type": "bar",
            "data": {
                "labels": self.labels,
                "datasets": [{ "label": "Count", "data": self.values }]
            },
            "options": {
                "responsive": true,
                "plugins": { "legend": { "display": false } },
                "scales": { "y": { "beginAtZero": true, "ticks": { "precision": 0 } } }
            }
        })
    }
}

pub struct ChartBuilder {
    catalog: Arc<dyn CatalogApi + Send + Sync>,
    enabled: bool,
}

impl ChartBuilder {
    pub fn new(catalog: Arc<dyn CatalogApi + Send + Sync>, enabled: bool) -> Self {
        Self { catalog, enabled }
    }

    /// Samples up to eight works and counts their subjects. Returns `None`, without
    /// touching the catalog, when charting is off or nothing was rendered.
    pub async fn build(&self, work_ids: &[String]) -> Option<SubjectChart> {
        if !self.enabled || work_ids.is_empty() {
            return None;
        }

        let sample = &work_ids[..work_ids.len().min(MAX_SAMPLED_WORKS)];
        debug!("Sampling subjects from {} works", sample.len());

        let details = join_all(sample.iter().map(|id| self.catalog.work_details(id))).await;

        let mut frequency = SubjectFrequency::default();
        for (id, detail) in sample.iter().zip(details) {
            match detail {
                Ok(detail) => detail
                    .subjects
                    .iter()
                    .take(MAX_SUBJECTS_PER_WORK)
                    .for_each(|subject| frequency.record(subject)),
                Err(e) => warn!("Skipping subjects for {}: {}", id, e),
            }
        }

        Some(SubjectChart::from_frequency(&frequency))
    }
}
