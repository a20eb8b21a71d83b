//! Relevance-score quality heuristic.

use crate::model::{ResultRecord, SearchResponse};
use crate::util::display_seconds;
use serde::Serialize;
use std::fmt;

/// Scores strictly above this are high quality.
pub const HIGH_QUALITY_THRESHOLD: f64 = 0.7;
/// Scores strictly below this are low quality.
pub const LOW_QUALITY_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBucket {
    High,
    Medium,
    Low,
}

impl QualityBucket {
    /// Classify a score. Both thresholds are inclusive on the medium side.
    /// NaN fails every comparison and lands in `Low`.
    pub fn of(score: f64) -> Self {
        if score > HIGH_QUALITY_THRESHOLD {
            QualityBucket::High
        } else if score >= LOW_QUALITY_THRESHOLD && score <= HIGH_QUALITY_THRESHOLD {
            QualityBucket::Medium
        } else {
            QualityBucket::Low
        }
    }
}

/// Summary statistics over a result list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
    pub total: usize,
    pub average_score: f64,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

/// Analyze a result list. Pure; an empty list yields the all-zero report.
pub fn analyze(results: &[ResultRecord]) -> QualityReport {
    let mut report = QualityReport {
        total: results.len(),
        ..QualityReport::default()
    };

    let mut sum = 0.0;
    for result in results {
        sum += result.score;
        match QualityBucket::of(result.score) {
            QualityBucket::High => report.high += 1,
            QualityBucket::Medium => report.medium += 1,
            QualityBucket::Low => report.low += 1,
        }
    }

    if report.total > 0 {
        report.average_score = sum / report.total as f64;
    }

    report
}

/// [`analyze`] plus the response time of the search.
pub fn analyze_response(response: &SearchResponse) -> QualityReport {
    QualityReport {
        response_time: response.response_time(),
        ..analyze(response.results())
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📈 Quality analysis:")?;
        writeln!(f, "   Total results: {}", self.total)?;
        writeln!(f, "   Average score: {:.4}", self.average_score)?;
        writeln!(f, "   High quality (>0.7): {}", self.high)?;
        writeln!(f, "   Medium quality (0.4-0.7): {}", self.medium)?;
        writeln!(f, "   Low quality (<0.4): {}", self.low)?;
        writeln!(f, "   Response time: {}", display_seconds(self.response_time))
    }
}
