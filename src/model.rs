//! Search response shapes.
//!
//! The Tavily API returns loosely shaped JSON. Everything is normalized here,
//! once, so the formatter and the quality analyzer never have to check for
//! missing fields again.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The raw response could not be turned into a [`SearchResponse`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid search response: {0}")]
pub struct InvalidResponse(pub String);

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Page title, empty when the API omitted it
    pub title: String,
    /// Link target. Not validated.
    pub url: String,
    /// Relevance score, nominally in `[0, 1]` but passed through unclamped
    pub score: f64,
    /// Summary or body text
    pub content: String,
}

impl ResultRecord {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        score: f64,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            score,
            content: content.into(),
        }
    }

    /// Build a record from one entry of the API's `results` array.
    ///
    /// Missing or malformed fields fall back to empty text and a zero score.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            tracing::warn!(entry = %value, "search result entry is not an object, using defaults");
        }

        Self {
            title: text_field(value, "title"),
            url: text_field(value, "url"),
            score: number_field(value, "score").unwrap_or(0.0),
            content: text_field(value, "content"),
        }
    }
}

/// One complete search response.
///
/// Read-only once built. The raw JSON it came from is retained for the
/// passthrough export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    query: String,
    response_time: Option<f64>,
    results: Vec<ResultRecord>,
    answer: Option<String>,
    follow_up_questions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
    #[serde(skip)]
    raw: Option<Value>,
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, results: Vec<ResultRecord>) -> Self {
        Self {
            query: query.into(),
            response_time: None,
            results,
            answer: None,
            follow_up_questions: Vec::new(),
            images: Vec::new(),
            raw: None,
        }
    }

    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.response_time = Some(seconds);
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        let answer = answer.into();
        self.answer = (!answer.trim().is_empty()).then_some(answer);
        self
    }

    pub fn with_follow_up_questions(mut self, questions: Vec<String>) -> Self {
        self.follow_up_questions = questions;
        self
    }

    /// Normalize a raw API response.
    ///
    /// The only hard requirement is a `results` array; an empty array is fine.
    pub fn from_value(raw: Value) -> Result<Self, InvalidResponse> {
        let Some(object) = raw.as_object() else {
            return Err(InvalidResponse("expected a JSON object".into()));
        };

        let results = match object.get("results") {
            Some(Value::Array(entries)) => entries.iter().map(ResultRecord::from_value).collect(),
            Some(other) => {
                return Err(InvalidResponse(format!(
                    "`results` must be an array, got {}",
                    json_type_name(other)
                )))
            }
            None => return Err(InvalidResponse("missing `results` field".into())),
        };

        let answer = match object.get("answer") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        };

        let follow_up_questions = object
            .get("follow_up_questions")
            .and_then(Value::as_array)
            .map(|questions| {
                questions
                    .iter()
                    .filter_map(|q| q.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        // Images come back either as bare URLs or as `{url, description}` objects.
        let images = object
            .get("images")
            .and_then(Value::as_array)
            .map(|images| {
                images
                    .iter()
                    .filter_map(|image| match image {
                        Value::String(url) => Some(url.clone()),
                        Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            query: text_field(&raw, "query"),
            response_time: number_field(&raw, "response_time"),
            results,
            answer,
            follow_up_questions,
            images,
            raw: Some(raw),
        })
    }

    /// Use `fallback` as the query when the API did not echo one back.
    pub fn or_query(mut self, fallback: &str) -> Self {
        if self.query.is_empty() {
            self.query = fallback.to_string();
        }
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn response_time(&self) -> Option<f64> {
        self.response_time
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn follow_up_questions(&self) -> &[String] {
        &self.follow_up_questions
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// The response exactly as the API returned it, or the typed shape when
    /// the response was built in code.
    pub fn to_raw_value(&self) -> serde_json::Result<Value> {
        match &self.raw {
            Some(raw) => Ok(raw.clone()),
            None => serde_json::to_value(self),
        }
    }
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn number_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
