// file: src/models/search_result.rs
// description: json output shapes for search, stats and error responses
// reference: Used for ranked full-text search results

use crate::utils::Validator;
use serde::{Deserialize, Serialize};

const BODY_PREVIEW_CHARS: usize = 500;
const COMMENTS_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Relevance score assigned by the index (higher is better)
    pub score: f32,

    #[serde(rename = "URL")]
    pub url: Option<String>,

    #[serde(rename = "Title")]
    pub title: Option<String>,

    #[serde(rename = "Body")]
    pub body: Option<String>,

    #[serde(rename = "Comments")]
    pub comments: Option<String>,
}

impl SearchHit {
    /// Format as a human readable block, truncating body and comments
    pub fn format_summary(&self) -> String {
        let preview = |value: &Option<String>, max: usize| {
            value
                .as_deref()
                .map(|text| Validator::truncate_text(text, max))
                .unwrap_or_default()
        };

        format!(
            "Score: {}\nURL: {}\nTitle: {}\nBody: {}\nComments: {}",
            self.score,
            self.url.as_deref().unwrap_or_default(),
            self.title.as_deref().unwrap_or_default(),
            preview(&self.body, BODY_PREVIEW_CHARS),
            preview(&self.comments, COMMENTS_PREVIEW_CHARS),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "totalHits")]
    pub total_hits: u64,
    pub results: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn format_text(&self) -> String {
        let divider = "-".repeat(40);
        let mut output = format!("Total hits: {}\n", self.total_hits);

        for hit in &self.results {
            output.push_str(&format!("\n{}\n{}\n{}\n", divider, hit.format_summary(), divider));
        }

        output
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    #[serde(rename = "numDocs")]
    pub num_docs: u64,
    #[serde(rename = "numSegments")]
    pub num_segments: usize,
    #[serde(rename = "indexDir")]
    pub index_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hit(score: f32, body: &str) -> SearchHit {
        SearchHit {
            score,
            url: Some("https://reddit.com/r/rust/1".to_string()),
            title: Some("Ownership".to_string()),
            body: Some(body.to_string()),
            comments: None,
        }
    }

    #[test]
    fn test_response_field_names() {
        let response = SearchResponse {
            total_hits: 7,
            results: vec![hit(1.5, "borrow checker")],
        };

        let json = response.to_json(false).unwrap();
        assert_eq!(
            json,
            r#"{"totalHits":7,"results":[{"score":1.5,"URL":"https://reddit.com/r/rust/1","Title":"Ownership","Body":"borrow checker","Comments":null}]}"#
        );
    }

    #[test]
    fn test_format_summary_truncates() {
        let long_body = "a".repeat(BODY_PREVIEW_CHARS + 20);
        let summary = hit(0.5, &long_body).format_summary();

        assert!(summary.contains("Title: Ownership"));
        assert!(summary.contains(&format!("{}...", "a".repeat(BODY_PREVIEW_CHARS))));
        assert!(summary.ends_with("Comments: "));
    }

    #[test]
    fn test_error_response_escapes() {
        let error = ErrorResponse::new("bad \"quote\"");
        let parsed: serde_json::Value = serde_json::from_str(&error.to_json().unwrap()).unwrap();
        assert_eq!(parsed["error"], "bad \"quote\"");
        assert_eq!(error.to_json().unwrap(), r#"{"error":"bad \"quote\""}"#);
    }
}
