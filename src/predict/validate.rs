//! Parses extracted model output into the guaranteed result shape.

use serde_json::Value;
use thiserror::Error;

use super::types::PredictionResult;

/// Validation failures, surfaced to the client as HTTP 500.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The candidate text is not valid JSON at all.
    #[error("Invalid JSON returned by model: {0}")]
    InvalidJson(String),

    /// The JSON parsed but does not describe a prediction result.
    #[error("{0}")]
    InvalidShape(String),
}

/// Parses `candidate` into a [`PredictionResult`].
///
/// Validation is lenient: missing `predictions`, `grammar_context`, or
/// `reasoning` fields are backfilled with defaults rather than rejected.
/// A field that is present with the wrong type is still an
/// [`InvalidShape`](ValidateError::InvalidShape) error, as is any value
/// that is not a JSON object.
pub fn validate(candidate: &str) -> Result<PredictionResult, ValidateError> {
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ValidateError::InvalidJson(e.to_string()))?;

    if !value.is_object() {
        return Err(ValidateError::InvalidShape(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| {
        ValidateError::InvalidShape(format!("prediction payload has invalid shape: {e}"))
    })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_payload_is_preserved() {
        let json = r#"{"predictions":[{"word":"cat","confidence":0.9,"attention":[0.5,0.5],"reasoning":"x"}]}"#;
        let result = validate(json).unwrap();
        assert_eq!(result.predictions.len(), 1);
        assert_eq!(result.predictions[0].word, "cat");
        assert_eq!(result.predictions[0].confidence, 0.9);
        assert_eq!(result.predictions[0].attention, vec![0.5, 0.5]);
        assert_eq!(result.predictions[0].reasoning, "x");
    }

    #[test]
    fn missing_top_level_fields_are_backfilled() {
        let result = validate(r#"{"predictions": []}"#).unwrap();
        assert!(result.predictions.is_empty());
        assert_eq!(result.grammar_context, "N/A");
        assert_eq!(result.reasoning.common_patterns, "N/A");
    }

    #[test]
    fn missing_predictions_backfilled_as_empty() {
        let result = validate(r#"{"grammar_context": "present tense"}"#).unwrap();
        assert!(result.predictions.is_empty());
        assert_eq!(result.grammar_context, "present tense");
    }

    #[test]
    fn malformed_json_is_invalid_json() {
        let err = validate(r#"{"predictions": [}"#).unwrap_err();
        match err {
            ValidateError::InvalidJson(msg) => assert!(!msg.is_empty()),
            other => panic!("expected InvalidJson, got {other:?}"),
        }
        let rendered = validate(r#"{"predictions": [}"#).unwrap_err().to_string();
        assert!(rendered.starts_with("Invalid JSON returned by model: "));
    }

    #[test]
    fn non_object_json_is_invalid_shape() {
        let err = validate(r#"[1, 2, 3]"#).unwrap_err();
        match err {
            ValidateError::InvalidShape(msg) => {
                assert_eq!(msg, "expected a JSON object, got an array");
            }
            other => panic!("expected InvalidShape, got {other:?}"),
        }

        assert!(matches!(
            validate("42"),
            Err(ValidateError::InvalidShape(_))
        ));
        assert!(matches!(
            validate("null"),
            Err(ValidateError::InvalidShape(_))
        ));
    }

    #[test]
    fn wrong_typed_predictions_is_invalid_shape() {
        let err = validate(r#"{"predictions": "not a list"}"#).unwrap_err();
        assert!(matches!(err, ValidateError::InvalidShape(_)));
    }
}
