//! The prediction pipeline: prompt, completion, extract, validate.
//!
//! [`Predictor`] owns the orchestration. [`extract_json`] and [`validate`]
//! turn unstructured model text into the guaranteed [`PredictionResult`]
//! shape served to clients.

pub mod extract;
pub mod prompt;
pub mod service;
pub mod types;
pub mod validate;

pub use extract::extract_json;
pub use service::{PredictError, Predictor};
pub use types::{PredictionItem, PredictionResult, ReasoningBlock};
pub use validate::{ValidateError, validate};
