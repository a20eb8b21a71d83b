use crate::config::settings::DEFAULT_API_BASE;
use crate::config::Config;
use crate::logging::redact_secrets;
use crate::search::{SearchDepth, SearchError, SearchOptions, SearchProvider, SearchTopic};
use serde::Serialize;
use std::time::Duration;

/// Tavily Search API provider
///
/// Documentation: https://docs.tavily.com/documentation/api-reference/endpoint/search
pub struct TavilySearchProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Request body for `POST /search`
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: SearchDepth,
    topic: SearchTopic,
    include_answer: bool,
    include_images: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    include_domains: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    exclude_domains: &'a [String],
}

impl<'a> TavilyRequest<'a> {
    fn new(query: &'a str, options: &'a SearchOptions) -> Self {
        Self {
            query,
            max_results: options.max_results,
            search_depth: options.search_depth,
            topic: options.topic,
            include_answer: options.include_answer,
            include_images: options.include_images,
            include_domains: &options.include_domains,
            exclude_domains: &options.exclude_domains,
        }
    }
}

impl TavilySearchProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Ok(Self::new(&config.api_key, Duration::from_secs(config.search_timeout))?
            .with_base_url(&config.api_base))
    }

    /// Point the provider at another host (self-hosted proxy, mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait::async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<serde_json::Value, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::InvalidApiKey);
        }

        tracing::debug!(
            query = %query,
            max_results = options.max_results,
            depth = ?options.search_depth,
            "performing tavily search"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&TavilyRequest::new(query, options))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = redact_secrets(&response.text().await.unwrap_or_default());

            tracing::warn!(
                status = %status,
                error = %error_text,
                "tavily search api error"
            );

            return match status.as_u16() {
                401 | 403 => Err(SearchError::InvalidApiKey),
                429 => Err(SearchError::RateLimitExceeded),
                // Tavily's plan-limit and pay-as-you-go-limit statuses
                432 | 433 => Err(SearchError::QuotaExceeded(error_text)),
                _ => Err(SearchError::ApiError(format!("HTTP {}: {}", status, error_text))),
            };
        }

        let json: serde_json::Value = response.json().await?;

        tracing::debug!(
            query = %query,
            result_count = json["results"].as_array().map_or(0, Vec::len),
            "tavily search completed"
        );

        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_defaults() {
        let options = SearchOptions::default();
        let body = serde_json::to_value(TavilyRequest::new("rust", &options)).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "rust",
                "max_results": 10,
                "search_depth": "basic",
                "topic": "general",
                "include_answer": true,
                "include_images": false
            })
        );
    }

    #[test]
    fn test_request_body_with_domain_filters() {
        let options = SearchOptions {
            max_results: 3,
            search_depth: SearchDepth::Advanced,
            topic: SearchTopic::News,
            include_domains: vec!["github.com".to_string()],
            exclude_domains: vec!["spam.org".to_string()],
            ..SearchOptions::default()
        };
        let body = serde_json::to_value(TavilyRequest::new("rust", &options)).unwrap();
        assert_eq!(body["search_depth"], "advanced");
        assert_eq!(body["topic"], "news");
        assert_eq!(body["include_domains"], json!(["github.com"]));
        assert_eq!(body["exclude_domains"], json!(["spam.org"]));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider = TavilySearchProvider::new("key", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(provider.endpoint(), "http://localhost:8080/search");
    }

    #[tokio::test]
    async fn test_empty_key_fails_before_request() {
        let provider = TavilySearchProvider::new("", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = provider.search("rust", &SearchOptions::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidApiKey));
    }
}
