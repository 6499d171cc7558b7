//! Prediction result shapes served to the client.
//!
//! Deserialization is deliberately lenient: every field carries a serde
//! default so partially conforming model output is backfilled instead of
//! rejected. `"N/A"` is the sentinel for missing text fields.

use serde::{Deserialize, Serialize};

fn na() -> String {
    "N/A".to_owned()
}

/// The structured output shape this service guarantees to its client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub predictions: Vec<PredictionItem>,
    #[serde(default = "na")]
    pub grammar_context: String,
    #[serde(default)]
    pub reasoning: ReasoningBlock,
}

/// One predicted next word with its confidence and attention weights.
///
/// `confidence` is expected in `[0, 1]` and `attention` to sum to 1, but
/// neither is enforced; the model's values pass through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionItem {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub attention: Vec<f64>,
    #[serde(default = "na")]
    pub reasoning: String,
}

/// The model's linguistic analysis accompanying the predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningBlock {
    #[serde(default = "na")]
    pub syntactic_analysis: String,
    #[serde(default = "na")]
    pub semantic_context: String,
    #[serde(default = "na")]
    pub common_patterns: String,
}

impl Default for ReasoningBlock {
    fn default() -> Self {
        Self {
            syntactic_analysis: na(),
            semantic_context: na(),
            common_patterns: na(),
        }
    }
}

impl PredictionResult {
    /// The canned result served when the model's output contains no JSON.
    pub fn fallback() -> Self {
        Self {
            predictions: vec![PredictionItem {
                word: "the".to_owned(),
                confidence: 0.7,
                attention: vec![0.2, 0.2, 0.2, 0.2, 0.2],
                reasoning: "Common continuation word".to_owned(),
            }],
            grammar_context: "Analysis unavailable".to_owned(),
            reasoning: ReasoningBlock {
                syntactic_analysis: "Could not parse model response".to_owned(),
                semantic_context: "Please try again".to_owned(),
                common_patterns: na(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_backfilled() {
        let result: PredictionResult = serde_json::from_str("{}").unwrap();
        assert!(result.predictions.is_empty());
        assert_eq!(result.grammar_context, "N/A");
        assert_eq!(result.reasoning.syntactic_analysis, "N/A");
        assert_eq!(result.reasoning.semantic_context, "N/A");
        assert_eq!(result.reasoning.common_patterns, "N/A");
    }

    #[test]
    fn item_fields_are_backfilled() {
        let json = r#"{"predictions": [{"word": "cat"}]}"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();
        let item = &result.predictions[0];
        assert_eq!(item.word, "cat");
        assert_eq!(item.confidence, 0.0);
        assert!(item.attention.is_empty());
        assert_eq!(item.reasoning, "N/A");
    }

    #[test]
    fn full_payload_round_trips() {
        let json = r#"{"predictions":[{"word":"cat","confidence":0.9,"attention":[0.5,0.5],"reasoning":"x"}],"grammar_context":"g","reasoning":{"syntactic_analysis":"s","semantic_context":"m","common_patterns":"c"}}"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.predictions[0].word, "cat");
        assert_eq!(result.predictions[0].confidence, 0.9);
        assert_eq!(result.predictions[0].attention, vec![0.5, 0.5]);

        let reserialized = serde_json::to_string(&result).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&reserialized).unwrap();
        let original: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn fallback_shape() {
        let fallback = PredictionResult::fallback();
        assert_eq!(fallback.predictions.len(), 1);
        assert_eq!(fallback.predictions[0].word, "the");
        assert_eq!(fallback.predictions[0].confidence, 0.7);
        assert_eq!(fallback.predictions[0].attention.len(), 5);
        assert_eq!(fallback.grammar_context, "Analysis unavailable");
        assert_eq!(
            fallback.reasoning.syntactic_analysis,
            "Could not parse model response"
        );
    }
}
