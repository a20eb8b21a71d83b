//! Append-only ledger of searches made in this session.

use crate::model::SearchResponse;
use crate::util;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub timestamp: DateTime<Local>,
    pub results_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize search history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Entries stay in call order; nothing is deduplicated or capped.
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, query: impl Into<String>, results_count: usize, timestamp: DateTime<Local>) {
        self.entries.push(HistoryEntry {
            query: query.into(),
            timestamp,
            results_count,
            response_time: None,
        });
    }

    /// Record a completed search, including its response time.
    pub fn record_response(&mut self, response: &SearchResponse, timestamp: DateTime<Local>) {
        self.entries.push(HistoryEntry {
            query: response.query().to_string(),
            timestamp,
            results_count: response.results().len(),
            response_time: response.response_time(),
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of result counts across all entries.
    pub fn total_results(&self) -> usize {
        self.entries.iter().map(|e| e.results_count).sum()
    }

    /// Write the whole ledger as a pretty JSON array. An empty ledger writes `[]`.
    ///
    /// Without `path` the file is `<output_dir>/search_history_<timestamp>.json`.
    pub fn export(&self, path: Option<&Path>, output_dir: &Path) -> Result<PathBuf, HistoryError> {
        let body = serde_json::to_string_pretty(&self.entries)?;
        let path = util::resolve_output_path(path, output_dir, "search_history", "json");
        util::write_file(&path, &body).map_err(|source| HistoryError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), entries = self.entries.len(), "exported search history");
        Ok(path)
    }

    /// Drop every entry. Irreversible.
    pub fn clear(&mut self) {
        tracing::debug!(entries = self.entries.len(), "clearing search history");
        self.entries.clear();
    }
}
