use std::sync::OnceLock;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::{AdInput, DiagnosticResult};

use super::prompt::build_analysis_prompt;
use super::schema::{response_schema, validation_schema};

/// Seam between the orchestration flow / endpoint and the real model call,
/// so both can be exercised with a stub analyzer in tests.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Run one analysis. Exactly one external call per invocation — no
    /// caching, no retries; retries are the caller's responsibility.
    async fn analyze(&self, input: &AdInput) -> Result<DiagnosticResult, AppError>;
}

/// HTTP client for the Gemini generateContent endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Request body: one text part, plus one inlineData part only when a
    /// video is attached, and the strict response schema.
    pub(crate) fn build_request_body(input: &AdInput) -> Value {
        let mut parts = vec![json!({ "text": build_analysis_prompt(input) })];

        if let Some(video) = &input.video_data {
            parts.push(json!({
                "inlineData": {
                    "data": video.data,
                    "mimeType": video.mime_type
                }
            }));
        }

        json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

#[async_trait]
impl Analyzer for GeminiClient {
    async fn analyze(&self, input: &AdInput) -> Result<DiagnosticResult, AppError> {
        let body = Self::build_request_body(input);

        tracing::debug!(
            model = %self.model,
            has_video = input.video_data.is_some(),
            "sending analysis request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "<no body>".into());
            return Err(AppError::Upstream {
                status,
                body: truncate(&body, 2000),
            });
        }

        let envelope: Value = response.json().await?;
        let text = extract_candidate_text(&envelope)?;
        parse_diagnostic(text)
    }
}

/// Pull the first candidate's first text part out of the generateContent
/// envelope.
pub(crate) fn extract_candidate_text(envelope: &Value) -> Result<&str, AppError> {
    envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::ContractViolation("response carries no candidate text part".into())
        })
}

/// Parse and validate the model's JSON text as a `DiagnosticResult`.
///
/// The model is an untrusted producer: the text must parse, conform to the
/// validation schema (including the 1..=10 score range), and deserialize.
/// Any failure is a `ContractViolation`, never a partial result.
pub fn parse_diagnostic(text: &str) -> Result<DiagnosticResult, AppError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        AppError::ContractViolation(format!("response is not valid JSON: {e}"))
    })?;

    if let Err(violation) = response_validator().validate(&value) {
        return Err(AppError::ContractViolation(format!(
            "response violates diagnostic schema: {violation}"
        )));
    }

    serde_json::from_value(value).map_err(|e| {
        AppError::ContractViolation(format!("response does not match diagnostic shape: {e}"))
    })
}

/// Compiled validation schema, built once.
fn response_validator() -> &'static jsonschema::Validator {
    static VALIDATOR: OnceLock<jsonschema::Validator> = OnceLock::new();
    VALIDATOR.get_or_init(|| {
        jsonschema::validator_for(&validation_schema())
            .expect("diagnostic validation schema must compile")
    })
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_offset, _)) => format!("{}...", &s[..byte_offset]),
        None => s.to_string(),
    }
}
