//! OpenAI-compatible chat completion client.
//!
//! [`ChatClient`] talks to any provider exposing a `POST /chat/completions`
//! endpoint (Groq, OpenAI, OpenRouter, self-hosted gateways). The
//! [`CompletionClient`] trait is the seam the prediction service depends on;
//! [`FakeClient`] implements it with scripted responses for tests.

pub mod client;
pub mod types;

pub use client::{ChatClient, CompletionClient, Error, FakeClient};
pub use types::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, Usage};
