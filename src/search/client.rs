//! Session-level search client.
//!
//! Wraps a [`SearchProvider`], normalizes what it returns, keeps the search
//! history and drives the formatter for exports. Everything runs one query
//! at a time.

use super::providers::TavilySearchProvider;
use super::{SearchError, SearchOptions, SearchProvider};
use crate::config::Config;
use crate::format::{FormatError, Formatter};
use crate::history::{HistoryError, SearchHistory};
use crate::model::SearchResponse;
use crate::quality::QualityReport;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which files to write after a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub save_json: bool,
    pub save_html: bool,
    /// HTML report title; defaults to one derived from the query
    pub html_title: Option<String>,
}

/// Outcome of one file write.
#[derive(Debug)]
pub struct ExportOutcome {
    pub kind: ExportKind,
    pub result: Result<PathBuf, FormatError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Json,
    Html,
}

/// A completed search with its loaded formatter and any exports.
#[derive(Debug)]
pub struct SearchRun {
    pub formatter: Formatter,
    pub exports: Vec<ExportOutcome>,
}

impl SearchRun {
    pub fn response(&self) -> Option<&SearchResponse> {
        self.formatter.response()
    }

    pub fn quality(&self) -> QualityReport {
        self.formatter.analyze_quality().unwrap_or_default()
    }
}

/// Per-query outcomes of a batch, in submission order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub runs: Vec<SearchRun>,
    pub failures: Vec<(String, SearchError)>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.runs.len()
    }

    pub fn total_results(&self) -> usize {
        self.runs.iter().map(|run| run.quality().total).sum()
    }

    /// Mean of the per-query average scores; 0 when nothing succeeded.
    pub fn mean_average_score(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.runs.iter().map(|run| run.quality().average_score).sum::<f64>() / self.runs.len() as f64
    }
}

pub struct SearchClient {
    provider: Arc<dyn SearchProvider>,
    history: SearchHistory,
    output_dir: PathBuf,
}

impl SearchClient {
    pub fn new(provider: Arc<dyn SearchProvider>, config: &Config) -> Self {
        Self {
            provider,
            history: SearchHistory::new(),
            output_dir: config.output_dir(),
        }
    }

    /// Client backed by the Tavily API.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let provider = TavilySearchProvider::from_config(config)?;
        tracing::info!(base_url = %config.api_base, "tavily search client initialized");
        Ok(Self::new(Arc::new(provider), config))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run one search and record it in the history.
    ///
    /// Provider failures come back unchanged and leave the history untouched.
    pub async fn search(&mut self, query: &str, options: &SearchOptions) -> Result<SearchResponse, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        tracing::info!(query = %query, "searching");
        let raw = self.provider.search(query, options).await.map_err(|e| {
            tracing::warn!(query = %query, error = %e, "search failed");
            e
        })?;

        let response = SearchResponse::from_value(raw)?.or_query(query);
        self.history.record_response(&response, Local::now());

        tracing::info!(
            query = %query,
            result_count = response.results().len(),
            "search completed"
        );
        Ok(response)
    }

    /// Search, load the result into a fresh formatter and write the requested
    /// exports. A failed write is recorded in the run, never returned as an
    /// error.
    pub async fn search_and_format(
        &mut self,
        query: &str,
        options: &SearchOptions,
        export: &ExportOptions,
    ) -> Result<SearchRun, SearchError> {
        let response = self.search(query, options).await?;

        let mut formatter = Formatter::with_output_dir(&self.output_dir);
        formatter.load_response(response);

        let mut exports = Vec::new();
        if export.save_json {
            exports.push(ExportOutcome {
                kind: ExportKind::Json,
                result: formatter.write_json(None, true),
            });
        }
        if export.save_html {
            exports.push(ExportOutcome {
                kind: ExportKind::Html,
                result: formatter.write_html(None, export.html_title.as_deref()),
            });
        }

        for outcome in &exports {
            if let Err(e) = &outcome.result {
                tracing::warn!(kind = ?outcome.kind, error = %e, "export failed");
            }
        }

        Ok(SearchRun { formatter, exports })
    }

    /// Search each query in turn. One query's round trip, exports included,
    /// finishes before the next starts; a failure is recorded and skipped.
    ///
    /// `on_outcome` sees every query as it completes: its 1-based position,
    /// the query text and the outcome.
    pub async fn batch_search<F>(
        &mut self,
        queries: &[String],
        options: &SearchOptions,
        export: &ExportOptions,
        mut on_outcome: F,
    ) -> BatchSummary
    where
        F: FnMut(usize, &str, &Result<SearchRun, SearchError>),
    {
        let mut summary = BatchSummary::default();

        for (idx, query) in queries.iter().enumerate() {
            let outcome = self.search_and_format(query, options, export).await;
            on_outcome(idx + 1, query, &outcome);

            match outcome {
                Ok(run) => summary.runs.push(run),
                Err(e) => summary.failures.push((query.clone(), e)),
            }
        }

        tracing::info!(
            processed = summary.processed(),
            failed = summary.failures.len(),
            "batch search finished"
        );
        summary
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut SearchHistory {
        &mut self.history
    }

    pub fn export_history(&self, path: Option<&Path>) -> Result<PathBuf, HistoryError> {
        self.history.export(path, &self.output_dir)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
