//! The canonical export shape. JSON files and HTML reports are both built
//! from a [`NormalizedReport`].

use super::{FormatError, Formatter, NORMALIZED_CONTENT_LENGTH};
use crate::model::SearchResponse;
use crate::util::excerpt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReport {
    pub search_info: SearchInfo,
    /// AI answer, serialized as `null` when absent
    pub answer: Option<String>,
    pub results: Vec<NormalizedResult>,
    pub follow_up_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInfo {
    pub query: String,
    pub response_time: Option<f64>,
    pub result_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// 1-based position in the API's result order
    pub index: usize,
    pub title: String,
    pub url: String,
    pub score: f64,
    /// Content cut to [`NORMALIZED_CONTENT_LENGTH`] characters
    pub content: String,
}

impl NormalizedReport {
    pub fn from_response(response: &SearchResponse) -> Self {
        let results = response
            .results()
            .iter()
            .enumerate()
            .map(|(idx, result)| NormalizedResult {
                index: idx + 1,
                title: result.title.clone(),
                url: result.url.clone(),
                score: result.score,
                content: excerpt(&result.content, NORMALIZED_CONTENT_LENGTH),
            })
            .collect();

        Self {
            search_info: SearchInfo {
                query: response.query().to_string(),
                response_time: response.response_time(),
                result_count: response.results().len(),
            },
            answer: response.answer().map(str::to_string),
            results,
            follow_up_questions: response.follow_up_questions().to_vec(),
        }
    }
}

impl Formatter {
    /// The loaded response in export shape. Errors when nothing is loaded.
    pub fn to_normalized(&self) -> Result<NormalizedReport, FormatError> {
        self.response()
            .map(NormalizedReport::from_response)
            .ok_or(FormatError::NoResponse)
    }
}
