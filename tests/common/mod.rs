//! Shared fixtures for the integration tests
#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary output directory for exports
pub struct TestFixture {
    /// Removed when the fixture drops
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Read a file written under the fixture, by name or by full path
    pub fn read_file(&self, name: impl AsRef<std::path::Path>) -> String {
        let filepath = self.path().join(name);
        std::fs::read_to_string(&filepath).expect("Failed to read test file")
    }

    pub fn read_json(&self, name: impl AsRef<std::path::Path>) -> Value {
        serde_json::from_str(&self.read_file(name)).expect("Failed to parse JSON file")
    }

    /// Names of the files directly under the fixture, sorted
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .expect("Failed to list temp dir")
            .map(|entry| entry.expect("bad dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// A two-result response in the shape the Tavily API returns
pub fn sample_response() -> Value {
    json!({
        "query": "deepseek",
        "response_time": 1.77,
        "answer": "DeepSeek is a Chinese AI company.",
        "follow_up_questions": ["What models has DeepSeek released?"],
        "images": [],
        "results": [
            {
                "title": "DeepSeek - Wikipedia",
                "url": "https://en.wikipedia.org/wiki/DeepSeek",
                "score": 0.8875,
                "content": "DeepSeek is a Chinese artificial intelligence company that develops large language models."
            },
            {
                "title": "深度求索",
                "url": "https://www.deepseek.com/",
                "score": 0.5,
                "content": "深度求索（DeepSeek），成立于2023年，专注于研究世界领先的通用人工智能底层模型与技术。"
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creation() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
        assert!(fixture.file_names().is_empty());
    }

    #[test]
    fn test_sample_response_shape() {
        assert_eq!(sample_response()["results"].as_array().unwrap().len(), 2);
    }
}
