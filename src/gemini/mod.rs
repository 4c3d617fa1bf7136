//! Contract with the hosted Gemini model: fixed prompt, strict response
//! schema, and the client that enforces both.

pub mod client;
pub mod prompt;
pub mod schema;

pub use client::{Analyzer, GeminiClient};
