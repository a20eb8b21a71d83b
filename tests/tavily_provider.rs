//! Tavily HTTP contract tests against a local mock server

mod common;

use common::{sample_response, TestFixture};
use serde_json::json;
use std::time::Duration;
use tavily_tools::config::Config;
use tavily_tools::search::providers::TavilySearchProvider;
use tavily_tools::search::{ExportOptions, SearchClient, SearchError, SearchOptions, SearchProvider};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "tvly-test-0123456789abcdef";

fn provider(server: &MockServer) -> TavilySearchProvider {
    TavilySearchProvider::new(TEST_KEY, Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri())
}

fn config(server: &MockServer, fixture: &TestFixture) -> Config {
    Config {
        api_key: TEST_KEY.to_string(),
        api_base: server.uri(),
        results_save_path: fixture.path().display().to_string(),
        search_timeout: 5,
        ..Config::default()
    }
}

async fn mount_status(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_successful_search_sends_key_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", format!("Bearer {TEST_KEY}").as_str()))
        .and(body_partial_json(json!({
            "query": "deepseek",
            "max_results": 5,
            "include_answer": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(1)
        .mount(&server)
        .await;

    let options = SearchOptions {
        max_results: 5,
        ..SearchOptions::default()
    };
    let raw = provider(&server).search("deepseek", &options).await.unwrap();
    assert_eq!(raw["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_key() {
    let server = MockServer::start().await;
    mount_status(&server, 401, r#"{"detail":{"error":"Unauthorized"}}"#).await;

    let err = provider(&server).search("rust", &SearchOptions::default()).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidApiKey), "got {err:?}");
}

#[tokio::test]
async fn test_too_many_requests_maps_to_rate_limit() {
    let server = MockServer::start().await;
    mount_status(&server, 429, "slow down").await;

    let err = provider(&server).search("rust", &SearchOptions::default()).await.unwrap_err();
    assert!(matches!(err, SearchError::RateLimitExceeded), "got {err:?}");
}

#[tokio::test]
async fn test_plan_limit_maps_to_quota_exceeded() {
    let server = MockServer::start().await;
    mount_status(&server, 432, "plan limit reached").await;

    let err = provider(&server).search("rust", &SearchOptions::default()).await.unwrap_err();
    match err {
        SearchError::QuotaExceeded(body) => assert!(body.contains("plan limit reached")),
        other => panic!("expected QuotaExceeded, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_status_and_redacted_body() {
    let server = MockServer::start().await;
    mount_status(&server, 500, &format!("boom for key {TEST_KEY}")).await;

    let err = provider(&server).search("rust", &SearchOptions::default()).await.unwrap_err();
    match err {
        SearchError::ApiError(message) => {
            assert!(message.starts_with("HTTP 500"), "got {message}");
            assert!(!message.contains(TEST_KEY));
            assert!(message.contains("tvly-***REDACTED***"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_records_history_only_on_success() {
    let fixture = TestFixture::new();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"query": "deepseek"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"query": "broken"})))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let mut client = SearchClient::from_config(&config(&server, &fixture)).unwrap();
    let options = SearchOptions::default();

    let response = client.search("deepseek", &options).await.unwrap();
    assert_eq!(response.query(), "deepseek");
    assert_eq!(response.results().len(), 2);

    assert!(client.search("broken", &options).await.is_err());

    let entries = client.history().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].query, "deepseek");
    assert_eq!(entries[0].results_count, 2);
}

#[tokio::test]
async fn test_body_without_results_is_invalid_response() {
    let fixture = TestFixture::new();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query": "rust"})))
        .mount(&server)
        .await;

    let mut client = SearchClient::from_config(&config(&server, &fixture)).unwrap();
    let err = client.search("rust", &SearchOptions::default()).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidResponse(_)), "got {err:?}");
    assert!(client.history().is_empty());
}

#[tokio::test]
async fn test_search_and_format_exports_to_output_dir() {
    let fixture = TestFixture::new();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .mount(&server)
        .await;

    let mut client = SearchClient::from_config(&config(&server, &fixture)).unwrap();
    let export = ExportOptions {
        save_json: true,
        save_html: true,
        html_title: None,
    };
    let run = client
        .search_and_format("deepseek", &SearchOptions::default(), &export)
        .await
        .unwrap();

    assert_eq!(run.exports.len(), 2);
    assert!(run.exports.iter().all(|outcome| outcome.result.is_ok()));
    assert_eq!(fixture.file_names().len(), 2);

    let report = run.quality();
    assert_eq!((report.total, report.high, report.medium, report.low), (2, 1, 1, 0));
}
