//! Prompt construction for prediction requests.

use crate::llm::ChatMessage;

/// System instruction demanding bare JSON output.
pub const SYSTEM_PROMPT: &str = "You are a JSON-only response bot. Return ONLY valid JSON with no markdown, no explanations, no extra text. Start your response with { and end with }.";

// The literal answer shape shown to the model in every request.
const EXAMPLE_SHAPE: &str = r#"{
    "predictions": [
        {
            "word": "predicted_word_1",
            "confidence": 0.85,
            "attention": [0.1, 0.2, 0.3, 0.2, 0.2],
            "reasoning": "Why this word fits"
        },
        {
            "word": "predicted_word_2",
            "confidence": 0.72,
            "attention": [0.15, 0.25, 0.25, 0.2, 0.15],
            "reasoning": "Why this word fits"
        },
        {
            "word": "predicted_word_3",
            "confidence": 0.65,
            "attention": [0.2, 0.2, 0.2, 0.2, 0.2],
            "reasoning": "Why this word fits"
        }
    ],
    "grammar_context": "Brief grammar analysis of the input phrase",
    "reasoning": {
        "syntactic_analysis": "Sentence structure analysis",
        "semantic_context": "Meaning and context analysis",
        "common_patterns": "Common language patterns identified"
    }
}"#;

/// The user turn: the phrase plus the exact JSON structure to return.
pub fn user_prompt(phrase: &str) -> String {
    format!(
        "Given the phrase \"{phrase}\", predict the next likely words.\n\nReturn ONLY this exact JSON structure with no additional text:\n\n{EXAMPLE_SHAPE}"
    )
}

/// The fixed system+user message pair sent for `phrase`.
pub fn build_messages(phrase: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt(phrase)),
    ]
}
