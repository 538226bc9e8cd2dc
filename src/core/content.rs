//! Tolerant parsing of generative content-provider responses
//!
//! Generative backends wrap JSON in markdown fences and occasionally return a
//! single-element array where an object is expected. This module strips the
//! noise, then validates through the `Challenge` constructor so a malformed
//! payload is the same `ContentError` as a failed fetch.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::types::{Challenge, ContentError};

lazy_static! {
    /// ```json ... ``` fence, optional language tag
    static ref RE_CODE_FENCE: Regex =
        Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").unwrap();
}

/// Wire format of a challenge response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChallengeResponse {
    song_title: String,
    clues: Vec<String>,
    image_prompt: String,
}

/// Parse a raw provider response body into a validated [`Challenge`].
pub fn parse_challenge_json(raw: &str) -> Result<Challenge, ContentError> {
    let mut body = raw.trim();
    if let Some(caps) = RE_CODE_FENCE.captures(body) {
        if let Some(inner) = caps.get(2) {
            body = inner.as_str().trim();
        }
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ContentError::Request(format!("unparseable response: {}", e)))?;

    // Some backends answer with a one-element array
    let value = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::Malformed("empty response array".to_string()))?,
        other => other,
    };

    let response: ChallengeResponse = serde_json::from_value(value)
        .map_err(|e| ContentError::Malformed(format!("missing field: {}", e)))?;

    Challenge::new(response.song_title, response.clues, response.image_prompt)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "songTitle": "The Hills",
        "clues": ["A confession whispered when the city's asleep.", "Flames engulf a car."],
        "imagePrompt": "A burning luxury car on a desolate road"
    }"#;

    #[test]
    fn test_plain_json() {
        let c = parse_challenge_json(PAYLOAD).unwrap();
        assert_eq!(c.title(), "The Hills");
        assert_eq!(c.clue_count(), 2);
    }

    #[test]
    fn test_fenced_json() {
        let fenced = format!("```json\n{}\n```", PAYLOAD);
        let c = parse_challenge_json(&fenced).unwrap();
        assert_eq!(c.title(), "The Hills");
    }

    #[test]
    fn test_fence_without_language_tag() {
        let fenced = format!("```\n{}\n```", PAYLOAD);
        assert!(parse_challenge_json(&fenced).is_ok());
    }

    #[test]
    fn test_single_element_array() {
        let arr = format!("[{}]", PAYLOAD);
        let c = parse_challenge_json(&arr).unwrap();
        assert_eq!(c.title(), "The Hills");
    }

    #[test]
    fn test_empty_array_is_malformed() {
        let err = parse_challenge_json("[]").unwrap_err();
        assert!(matches!(err, ContentError::Malformed(_)));
    }

    #[test]
    fn test_garbage_is_request_error() {
        let err = parse_challenge_json("not json at all").unwrap_err();
        assert!(matches!(err, ContentError::Request(_)));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = parse_challenge_json(r#"{"songTitle": "X"}"#).unwrap_err();
        assert!(matches!(err, ContentError::Malformed(_)));
    }

    #[test]
    fn test_empty_clues_rejected_by_validation() {
        let raw = r#"{"songTitle": "X", "clues": [], "imagePrompt": "p"}"#;
        let err = parse_challenge_json(raw).unwrap_err();
        assert!(matches!(err, ContentError::Malformed(_)));
    }
}
