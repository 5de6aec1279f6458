//! Response recovery and validation, per `spec.md` §6's "Advisor transport":
//! strip triple-backtick fences and a leading language tag, treat the
//! literal text `null` as a successful null response (Crisis stage only),
//! parse JSON, and verify required top-level fields.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AdvisorError;

/// Strip a wrapping ` ``` ` or ` ```json ` fence, if present, and trim
/// surrounding whitespace. Text with no fence passes through untouched.
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed.to_owned();
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop a leading language tag line (`json`, `JSON`, ...) if the fence
    // opened with one rather than a newline straight into content.
    match inner.split_once('\n') {
        Some((tag, rest)) if tag.trim().chars().all(|c| c.is_ascii_alphabetic()) => rest.trim().to_owned(),
        _ => inner.trim().to_owned(),
    }
}

/// Remove commas immediately preceding a closing `}` or `]`, the most
/// common malformed-JSON artifact from LLM replies.
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut iter = input.chars();
    while let Some(c) = iter.next() {
        if c == ',' {
            let next_significant = iter.clone().find(|ch| !ch.is_whitespace());
            if matches!(next_significant, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Recover a [`Value`] from raw advisor text via a cascade of increasingly
/// permissive strategies: direct parse, fence-stripped parse, trailing-comma
/// stripped parse, and both combined.
pub fn recover_json(raw: &str) -> Result<Value, AdvisorError> {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_code_fence(trimmed);
    if let Ok(value) = serde_json::from_str(&unfenced) {
        return Ok(value);
    }

    let destuttered = strip_trailing_commas(trimmed);
    if let Ok(value) = serde_json::from_str(&destuttered) {
        return Ok(value);
    }

    let combined = strip_trailing_commas(&unfenced);
    serde_json::from_str(&combined).map_err(|e| AdvisorError::InvalidJson(e.to_string()))
}

/// Confirm every name in `required` is present as a top-level key of a JSON
/// object.
pub fn require_fields(value: &Value, required: &[&'static str]) -> Result<(), AdvisorError> {
    let Value::Object(map) = value else {
        return Err(AdvisorError::InvalidJson("top-level value is not an object".to_owned()));
    };
    for field in required {
        if !map.contains_key(*field) {
            return Err(AdvisorError::MissingField(field));
        }
    }
    Ok(())
}

/// Recover, field-check, and deserialize a non-Crisis stage's reply.
pub fn parse_stage_output<T: DeserializeOwned>(raw: &str, required: &[&'static str]) -> Result<T, AdvisorError> {
    let value = recover_json(raw)?;
    require_fields(&value, required)?;
    serde_json::from_value(value).map_err(|e| AdvisorError::InvalidJson(e.to_string()))
}

/// Whether cleaned advisor text is the literal `null` response -- the one
/// stage (Crisis) where that is a legitimate successful "no event" result
/// rather than a parse failure.
pub fn is_literal_null(raw: &str) -> bool {
    let cleaned = strip_code_fence(raw);
    cleaned.trim().eq_ignore_ascii_case("null")
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn direct_json_parses() {
        let value = recover_json(r#"{"a":1}"#).unwrap_or(Value::Null);
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn strips_fenced_json_with_language_tag() {
        let raw = "```json\n{\"a\":1}\n```";
        let value = recover_json(raw).unwrap_or(Value::Null);
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn strips_plain_fence_without_language_tag() {
        let raw = "```\n{\"a\":1}\n```";
        let value = recover_json(raw).unwrap_or(Value::Null);
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn strips_trailing_commas() {
        let raw = r#"{"a":1,"b":[1,2,],}"#;
        let value = recover_json(raw).unwrap_or(Value::Null);
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn combined_fence_and_trailing_comma_recovery() {
        let raw = "```json\n{\"a\":1,}\n```";
        let value = recover_json(raw).unwrap_or(Value::Null);
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn missing_required_field_is_reported() {
        let value = serde_json::json!({"a": 1});
        let err = require_fields(&value, &["a", "b"]);
        assert!(matches!(err, Err(AdvisorError::MissingField("b"))));
    }

    #[test]
    fn literal_null_is_recognized_after_unfencing() {
        assert!(is_literal_null("null"));
        assert!(is_literal_null("```json\nnull\n```"));
        assert!(!is_literal_null("{\"event_type\":\"riot\"}"));
    }

    #[test]
    fn invalid_json_after_all_strategies_errors() {
        let result = recover_json("not json at all {{{");
        assert!(result.is_err());
    }
}
