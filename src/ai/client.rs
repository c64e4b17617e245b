//! Gemini text-generation client.
//!
//! One `generateContent` call per question, with a bounded generation
//! budget. Every failure mode maps to a tagged [`AiError`] so the
//! boundary layer decides how to render each kind; nothing in this
//! module panics on a bad response.

use crate::config::ModelConfig;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Failure taxonomy for the AI delegation path.
#[derive(Debug, Error)]
pub enum AiError {
    /// No client was configured (missing API key).
    #[error("text-generation service is not configured")]
    NotConfigured,

    /// The service could not be reached.
    #[error("cannot reach text-generation service: {0}")]
    ServiceUnavailable(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The service answered with a non-success status.
    #[error("service error {status}: {detail}")]
    Api { status: u16, detail: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode service response: {0}")]
    InvalidResponse(String),

    /// The response carried no candidates at all.
    #[error("service returned no candidates")]
    NoCandidates,

    /// The first candidate carried no extractable text.
    #[error("candidate contained no usable text (finish reason: {finish_reason})")]
    ContentFiltered { finish_reason: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GenAiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout_seconds: u64,
}

impl GenAiClient {
    /// Build a client from model settings and an API key.
    pub fn new(config: &ModelConfig, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        info!("Text-generation client ready (model: {})", config.name);

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.name.clone(),
            api_key,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Ask one question with a prepared context block and return the
    /// first candidate's text.
    pub async fn analyze(&self, query: &str, context: &str) -> Result<String, AiError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(context, query)),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        debug!("Sending generateContent request to {}", self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    AiError::ServiceUnavailable(format!("cannot connect to {}", self.api_base))
                } else {
                    AiError::ServiceUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                detail: truncate(&detail, 200),
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        extract_text(body)
    }
}

/// Assemble the single prompt sent to the service.
fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Context:\n{}\n\nQuestion: {}\n\nProvide a detailed analysis.",
        context, query
    )
}

/// Pull the first candidate's text out of a response.
fn extract_text(response: GenerateContentResponse) -> Result<String, AiError> {
    let candidate = match response.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => return Err(AiError::NoCandidates),
    };

    let finish_reason = candidate
        .finish_reason
        .unwrap_or_else(|| "unknown".to_string());
    debug!("Candidate finish reason: {}", finish_reason);

    let joined = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<String>>()
        .join("\n");

    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Err(AiError::ContentFiltered { finish_reason })
    } else {
        Ok(trimmed.to_string())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
