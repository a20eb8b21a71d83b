//! End-to-end quality analysis through the formatter

mod common;

use common::sample_response;
use serde_json::json;
use tavily_tools::format::{Formatter, DEFAULT_MAX_CONTENT_LENGTH};
use tavily_tools::quality::QualityReport;

#[test]
fn test_deepseek_example() {
    let mut formatter = Formatter::with_output_dir("/tmp");
    let report = formatter
        .load(json!({
            "query": "deepseek",
            "response_time": 1.77,
            "results": [
                {"title": "A", "url": "u1", "score": 0.8875, "content": "..."},
                {"title": "B", "url": "u2", "score": 0.5, "content": "..."}
            ]
        }))
        .unwrap()
        .analyze_quality()
        .unwrap();

    assert_eq!(report.total, 2);
    assert!((report.average_score - 0.69375).abs() < 1e-9);
    assert_eq!((report.high, report.medium, report.low), (1, 1, 0));
    assert_eq!(report.response_time, Some(1.77));
}

#[test]
fn test_empty_results_load_and_analyze_to_zero() {
    let mut formatter = Formatter::with_output_dir("/tmp");
    formatter.load(json!({"query": "nothing", "results": []})).unwrap();

    let report = formatter.analyze_quality().unwrap();
    assert_eq!(report, QualityReport::default());
    assert!(formatter.render_summary().contains("📊 Results: 0"));
}

#[test]
fn test_malformed_entries_get_defaults() {
    let mut formatter = Formatter::with_output_dir("/tmp");
    formatter
        .load(json!({
            "query": "partial",
            "results": [{"content": "only content"}, {"title": "scored", "score": "0.75"}]
        }))
        .unwrap();

    let text = formatter.render_results(DEFAULT_MAX_CONTENT_LENGTH);
    assert!(text.contains("Untitled"));
    assert!(text.contains("N/A"));
    assert!(text.contains("Score: 0.0000"));

    let report = formatter.analyze_quality().unwrap();
    assert_eq!((report.high, report.medium, report.low), (1, 0, 1));
}

#[test]
fn test_full_render_includes_quality_block() {
    let mut formatter = Formatter::with_output_dir("/tmp");
    let text = formatter.load(sample_response()).unwrap().render_full(40);

    assert!(text.contains("🔍 Query: deepseek"));
    assert!(text.contains("💡 AI answer:"));
    assert!(text.contains("❓ Follow-up questions:"));
    assert!(text.contains("📈 Quality analysis:"));
    assert!(text.contains("Total results: 2"));
    assert!(text.contains("Average score: 0.69"));
}
