//! Presentation of a single search response.
//!
//! A [`Formatter`] holds at most one loaded [`SearchResponse`] and renders it
//! three ways: console text ([`console`]), the normalized export shape
//! ([`normalized`], which backs the JSON file) and a standalone HTML report
//! ([`html`]). Loading never mutates the response afterwards; loading again
//! replaces it.
//!
//! ```no_run
//! # use tavily_tools::format::Formatter;
//! # fn demo(raw: serde_json::Value) -> Result<(), tavily_tools::format::FormatError> {
//! let mut formatter = Formatter::with_output_dir("./results");
//! print!("{}", formatter.load(raw)?.render_full(150));
//! formatter.write_json(None, true)?;
//! # Ok(())
//! # }
//! ```

pub mod console;
pub mod html;
pub mod normalized;

pub use normalized::{NormalizedReport, NormalizedResult, SearchInfo};

use crate::config::Config;
use crate::model::{InvalidResponse, SearchResponse};
use crate::quality::{self, QualityReport};
use crate::util;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default excerpt length for console output.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 150;
/// Excerpt length used in the normalized export (JSON and HTML).
pub const NORMALIZED_CONTENT_LENGTH: usize = 500;
/// Printed instead of output when nothing has been loaded.
pub const NO_DATA_NOTICE: &str = "❌ No search data loaded";

/// Formatter errors
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("no search response loaded")]
    NoResponse,

    #[error(transparent)]
    InvalidResponse(#[from] InvalidResponse),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize search results: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Formatter {
    response: Option<SearchResponse>,
    output_dir: PathBuf,
}

impl Formatter {
    /// Formatter writing into the configured results directory.
    pub fn new(config: &Config) -> Self {
        Self::with_output_dir(config.output_dir())
    }

    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            response: None,
            output_dir: output_dir.into(),
        }
    }

    /// Normalize and load a raw API response, replacing any previous one.
    ///
    /// Fails when the value has no `results` array. An empty array loads fine.
    /// A failed load still drops the previous response.
    pub fn load(&mut self, raw: Value) -> Result<&mut Self, FormatError> {
        match SearchResponse::from_value(raw) {
            Ok(response) => Ok(self.load_response(response)),
            Err(e) => {
                self.response = None;
                Err(e.into())
            }
        }
    }

    /// Load an already normalized response, replacing any previous one.
    pub fn load_response(&mut self, response: SearchResponse) -> &mut Self {
        tracing::debug!(
            query = %response.query(),
            result_count = response.results().len(),
            "formatter loaded response"
        );
        self.response = Some(response);
        self
    }

    pub fn response(&self) -> Option<&SearchResponse> {
        self.response.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.response.is_some()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Quality report for the loaded response, `None` when nothing is loaded.
    pub fn analyze_quality(&self) -> Option<QualityReport> {
        self.response.as_ref().map(quality::analyze_response)
    }

    fn loaded(&self) -> Result<&SearchResponse, FormatError> {
        self.response.as_ref().ok_or(FormatError::NoResponse)
    }

    /// Write the loaded response as pretty JSON.
    ///
    /// `normalized` selects the [`NormalizedReport`] shape; otherwise the raw
    /// API response is written untouched. Non-ASCII text is kept literal.
    pub fn write_json(&self, path: Option<&Path>, normalized: bool) -> Result<PathBuf, FormatError> {
        let response = self.loaded()?;
        let body = if normalized {
            serde_json::to_string_pretty(&NormalizedReport::from_response(response))?
        } else {
            serde_json::to_string_pretty(&response.to_raw_value()?)?
        };

        let path = util::resolve_output_path(path, &self.output_dir, "search_results", "json");
        self.write(&path, &body)?;
        tracing::info!(path = %path.display(), normalized, "wrote json export");
        Ok(path)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), FormatError> {
        util::write_file(path, contents).map_err(|source| FormatError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultRecord;
    use serde_json::json;

    #[test]
    fn test_new_uses_configured_output_dir() {
        let config = Config {
            results_save_path: "/srv/reports".to_string(),
            ..Config::default()
        };
        let formatter = Formatter::new(&config);
        assert_eq!(formatter.output_dir(), Path::new("/srv/reports"));
        assert!(!formatter.is_loaded());
    }

    #[test]
    fn test_load_requires_results_field() {
        let mut formatter = Formatter::with_output_dir("/tmp");
        let err = formatter.load(json!({"query": "q"})).unwrap_err();
        assert!(matches!(err, FormatError::InvalidResponse(_)));
        assert!(!formatter.is_loaded());
    }

    #[test]
    fn test_failed_load_clears_previous_response() {
        let mut formatter = Formatter::with_output_dir("/tmp");
        formatter.load(json!({"query": "first", "results": []})).unwrap();
        assert!(formatter.is_loaded());

        let err = formatter.load(json!({"query": "second"})).unwrap_err();
        assert!(matches!(err, FormatError::InvalidResponse(_)));
        assert!(!formatter.is_loaded());
        assert!(matches!(formatter.write_json(None, true), Err(FormatError::NoResponse)));
    }

    #[test]
    fn test_load_replaces_previous_response() {
        let mut formatter = Formatter::with_output_dir("/tmp");
        formatter
            .load(json!({"query": "first", "results": [{"title": "a"}, {"title": "b"}]}))
            .unwrap();
        formatter.load_response(SearchResponse::new("second", Vec::new()));

        let response = formatter.response().unwrap();
        assert_eq!(response.query(), "second");
        assert!(response.results().is_empty());
    }

    #[test]
    fn test_analyze_quality() {
        let mut formatter = Formatter::with_output_dir("/tmp");
        assert_eq!(formatter.analyze_quality(), None);

        formatter.load_response(SearchResponse::new(
            "q",
            vec![ResultRecord::new("a", "u", 0.9, "")],
        ));
        let report = formatter.analyze_quality().unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.high, 1);
    }

    #[test]
    fn test_write_json_without_response() {
        let formatter = Formatter::with_output_dir("/tmp");
        assert!(matches!(
            formatter.write_json(None, true),
            Err(FormatError::NoResponse)
        ));
    }
}
