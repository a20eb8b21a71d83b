use crate::util::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;

/// Value shipped in `.env.template`; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_tavily_api_key_here";
pub const DEFAULT_API_BASE: &str = "https://api.tavily.com";

/// Keys shorter than this get a warning, not an error.
const MIN_EXPECTED_KEY_LEN: usize = 20;

/// Main configuration structure
///
/// Built once at startup and passed by reference; nothing else reads the
/// process environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tavily API key (`TAVILY_API_KEY`)
    pub api_key: String,

    /// API base URL (`TAVILY_API_BASE`)
    pub api_base: String,

    /// Query used when the interactive prompt is left empty (`DEFAULT_SEARCH_QUERY`)
    pub default_search_query: String,

    /// Directory for JSON/HTML exports (`RESULTS_SAVE_PATH`)
    pub results_save_path: String,

    /// Results requested per search (`MAX_SEARCH_RESULTS`)
    pub max_search_results: usize,

    /// Request timeout in seconds (`SEARCH_TIMEOUT`)
    pub search_timeout: u64,

    /// Whether `--save-html` is honoured (`ENABLE_HTML_REPORTS`)
    pub enable_html_reports: bool,

    /// Log level for this crate (`LOG_LEVEL`)
    pub log_level: String,

    /// Optional log file (`LOG_PATH`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            default_search_query: "deepseek".to_string(),
            results_save_path: "./results/".to_string(),
            max_search_results: 10,
            search_timeout: 30,
            enable_html_reports: true,
            log_level: "info".to_string(),
            log_path: None,
        }
    }
}

/// Configuration problems that stop the program before any search runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("TAVILY_API_KEY is not set; add it to the environment or a .env file")]
    MissingApiKey,

    #[error("TAVILY_API_KEY still holds the template placeholder; set a real key")]
    PlaceholderApiKey,

    #[error("MAX_SEARCH_RESULTS must be at least 1")]
    InvalidMaxResults,

    #[error("SEARCH_TIMEOUT must be at least 1 second")]
    InvalidTimeout,
}

impl Config {
    /// Defaults overlaid with values from `lookup` (normally the process
    /// environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env(lookup);
        config
    }

    /// Overlay recognised environment variables. Unparsable numbers keep the
    /// current value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        if let Some(v) = get("TAVILY_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = get("TAVILY_API_BASE").filter(|v| !v.is_empty()) {
            self.api_base = v;
        }
        if let Some(v) = get("DEFAULT_SEARCH_QUERY").filter(|v| !v.is_empty()) {
            self.default_search_query = v;
        }
        if let Some(v) = get("RESULTS_SAVE_PATH").filter(|v| !v.is_empty()) {
            self.results_save_path = v;
        }
        if let Some(v) = get("MAX_SEARCH_RESULTS") {
            match v.parse() {
                Ok(n) => self.max_search_results = n,
                Err(_) => tracing::warn!(value = %v, "ignoring unparsable MAX_SEARCH_RESULTS"),
            }
        }
        if let Some(v) = get("SEARCH_TIMEOUT") {
            match v.parse() {
                Ok(n) => self.search_timeout = n,
                Err(_) => tracing::warn!(value = %v, "ignoring unparsable SEARCH_TIMEOUT"),
            }
        }
        if let Some(v) = get("ENABLE_HTML_REPORTS") {
            self.enable_html_reports = matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on");
        }
        if let Some(v) = get("LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.log_level = v.to_lowercase();
        }
        if let Some(v) = get("LOG_PATH") {
            self.log_path = (!v.is_empty()).then_some(v);
        }
    }

    /// Startup validation. A missing or placeholder key is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.api_key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::PlaceholderApiKey);
        }
        if self.max_search_results == 0 {
            return Err(ConfigError::InvalidMaxResults);
        }
        if self.search_timeout == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Non-fatal oddities worth telling the user about.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.api_key.is_empty() && self.api_key.chars().count() < MIN_EXPECTED_KEY_LEN {
            warnings.push("TAVILY_API_KEY looks too short; check the value".to_string());
        }
        warnings
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(expand_tilde(&self.results_save_path))
    }

    /// `********...abcd`
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        let tail: String = if chars.len() > 4 {
            chars[chars.len() - 4..].iter().collect()
        } else {
            "****".to_string()
        };
        format!("{}...{}", "*".repeat(8), tail)
    }

    /// Human-readable listing for `--config`.
    pub fn render_display(&self, show_sensitive: bool) -> String {
        let key = if self.api_key.is_empty() {
            "(not set)".to_string()
        } else if show_sensitive {
            self.api_key.clone()
        } else {
            self.masked_api_key()
        };
        let output_dir = self.output_dir();
        let output_dir = std::path::absolute(&output_dir).unwrap_or(output_dir);

        let mut out = String::from("📋 Current configuration:\n");
        let _ = writeln!(out, "   🔑 API key: {key}");
        let _ = writeln!(out, "   🌐 API base: {}", self.api_base);
        let _ = writeln!(out, "   🔍 Default query: {}", self.default_search_query);
        let _ = writeln!(out, "   📁 Output directory: {}", output_dir.display());
        let _ = writeln!(out, "   📊 Max results: {}", self.max_search_results);
        let _ = writeln!(out, "   ⏱️  Timeout: {}s", self.search_timeout);
        let _ = writeln!(
            out,
            "   📄 HTML reports: {}",
            if self.enable_html_reports { "enabled" } else { "disabled" }
        );
        let _ = writeln!(out, "   📝 Log level: {}", self.log_level);
        if let Some(path) = &self.log_path {
            let _ = writeln!(out, "   🗒️  Log file: {path}");
        }
        out
    }

    /// Configuration without the key itself, for verbose display.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "api_base": self.api_base,
            "default_search_query": self.default_search_query,
            "results_save_path": self.results_save_path,
            "max_search_results": self.max_search_results,
            "search_timeout": self.search_timeout,
            "enable_html_reports": self.enable_html_reports,
            "log_level": self.log_level,
            "log_path": self.log_path,
            "api_key_configured": !self.api_key.is_empty(),
        })
    }
}
