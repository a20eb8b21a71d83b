pub mod client;
pub mod providers;

pub use client::{BatchSummary, ExportKind, ExportOptions, ExportOutcome, SearchClient, SearchRun};

use crate::config::Config;
use crate::model::InvalidResponse;
use serde::Serialize;

/// Search provider abstraction - the external API sits behind this seam
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a search query, returning the provider's raw JSON response
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<serde_json::Value, SearchError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchTopic {
    #[default]
    General,
    News,
}

/// Search options for filtering and controlling results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of results to return (default: 10)
    pub max_results: usize,
    pub search_depth: SearchDepth,
    pub topic: SearchTopic,
    /// Ask the API for a synthesized answer
    pub include_answer: bool,
    pub include_images: bool,
    /// Only include results from these domains (empty = no filter)
    pub include_domains: Vec<String>,
    /// Exclude results from these domains
    pub exclude_domains: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            search_depth: SearchDepth::Basic,
            topic: SearchTopic::General,
            include_answer: true,
            include_images: false,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        }
    }
}

impl SearchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_results: config.max_search_results,
            ..Self::default()
        }
    }
}

/// Upstream search failures. Passed through to the caller unchanged; nothing
/// here retries.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search query cannot be empty")]
    EmptyQuery,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Usage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error(transparent)]
    InvalidResponse(#[from] InvalidResponse),
}
