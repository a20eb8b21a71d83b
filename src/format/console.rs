//! Human-readable console rendering.
//!
//! Every render method returns text instead of printing, and degrades to
//! [`NO_DATA_NOTICE`] when nothing is loaded.

use super::{Formatter, NO_DATA_NOTICE};
use crate::quality;
use crate::util::{display_seconds, excerpt};
use std::fmt::Write;

const BANNER_WIDTH: usize = 60;
const RULE_WIDTH: usize = 50;
const UNTITLED: &str = "Untitled";
const NO_URL: &str = "N/A";

impl Formatter {
    /// Fixed-width banner with query, response time and result count.
    pub fn render_summary(&self) -> String {
        let Some(response) = self.response() else {
            return notice();
        };

        let banner = "=".repeat(BANNER_WIDTH);
        let mut out = String::new();
        let _ = writeln!(out, "{banner}");
        let _ = writeln!(out, "🔍 Query: {}", response.query());
        let _ = writeln!(out, "⏱️  Response time: {}", display_seconds(response.response_time()));
        let _ = writeln!(out, "📊 Results: {}", response.results().len());
        let _ = writeln!(out, "{banner}");
        out
    }

    /// One block per result, in API order, with content cut to
    /// `max_content_length` characters.
    pub fn render_results(&self, max_content_length: usize) -> String {
        let Some(response) = self.response() else {
            return notice();
        };

        let rule = "-".repeat(RULE_WIDTH);
        let mut out = String::new();
        for (idx, result) in response.results().iter().enumerate() {
            let title = if result.title.is_empty() { UNTITLED } else { result.title.as_str() };
            let url = if result.url.is_empty() { NO_URL } else { result.url.as_str() };

            let _ = writeln!(out, "\n📄 [{}] {}", idx + 1, title);
            let _ = writeln!(out, "   🔗 {url}");
            let _ = writeln!(out, "   ⭐ Score: {:.4}", result.score);
            if !result.content.is_empty() {
                let _ = writeln!(out, "   📝 {}", excerpt(&result.content, max_content_length));
            }
            let _ = writeln!(out, "{rule}");
        }
        out
    }

    /// The AI answer block, empty when the response has none.
    pub fn render_answer(&self) -> String {
        match self.response().and_then(|r| r.answer()) {
            Some(answer) => format!("\n💡 AI answer:\n{answer}\n{}\n", "-".repeat(RULE_WIDTH)),
            None => String::new(),
        }
    }

    /// Numbered follow-up questions, empty when there are none.
    pub fn render_follow_ups(&self) -> String {
        let Some(response) = self.response() else {
            return String::new();
        };
        if response.follow_up_questions().is_empty() {
            return String::new();
        }

        let mut out = String::from("\n❓ Follow-up questions:\n");
        for (idx, question) in response.follow_up_questions().iter().enumerate() {
            let _ = writeln!(out, "   {}. {}", idx + 1, question);
        }
        out
    }

    pub fn render_quality(&self) -> String {
        match self.response() {
            Some(response) => quality::analyze_response(response).to_string(),
            None => notice(),
        }
    }

    /// Summary, answer, results, follow-ups and the quality report.
    pub fn render_full(&self, max_content_length: usize) -> String {
        if !self.is_loaded() {
            return notice();
        }

        let mut out = self.render_summary();
        out.push_str(&self.render_answer());
        out.push_str(&self.render_results(max_content_length));
        out.push_str(&self.render_follow_ups());
        out.push('\n');
        out.push_str(&self.render_quality());
        out
    }
}

fn notice() -> String {
    format!("{NO_DATA_NOTICE}\n")
}
