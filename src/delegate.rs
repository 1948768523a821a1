//! Analysis source backed by an external HTTP service.
//!
//! [`DelegatedSource`] forwards the batch to an analysis endpoint as a single
//! multipart `POST` with one `files` part per document and reads back a JSON
//! body:
//!
//! | Response | Outcome |
//! |----------|---------|
//! | 2xx `{"contradictions": [...]}` | findings |
//! | 2xx `{"error": "..."}` | failure with the service's message |
//! | non-2xx `{"error": "..."}` | failure with the service's message |
//! | anything else | failure describing the malformed body |
//!
//! Language-model backends often wrap their JSON in Markdown code fences;
//! those are stripped before parsing. Requests are never retried.
//!
//! Use [`create_source`] to pick the configured source.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use doc_checker_core::models::{Contradiction, Document};
use doc_checker_core::source::{AnalysisSource, MockSource};

use crate::config::AnalysisConfig;

/// Failures reported by, or about, the analysis service.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The service answered successfully but described an error.
    #[error("{0}")]
    Reported(String),

    #[error("malformed analysis response: {0}")]
    Malformed(String),

    #[error("analysis service did not respond within {0} seconds")]
    Timeout(u64),
}

pub struct DelegatedSource {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl DelegatedSource {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            timeout_secs,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(documents: &[Document]) -> Result<Form> {
        let mut form = Form::new();
        for doc in documents {
            let part = Part::bytes(doc.content.clone())
                .file_name(doc.name.clone())
                .mime_str(doc.kind.mime_type())?;
            form = form.part("files", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl AnalysisSource for DelegatedSource {
    fn name(&self) -> &str {
        "delegated"
    }

    async fn analyze(&self, documents: &[Document]) -> Result<Vec<Contradiction>> {
        tracing::debug!(
            endpoint = %self.endpoint,
            documents = documents.len(),
            "sending batch to analysis service"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::form(documents)?)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::Error::new(BackendError::Timeout(self.timeout_secs))
                } else {
                    anyhow::Error::new(e).context(format!(
                        "Could not reach the analysis service at {}",
                        self.endpoint
                    ))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::Error::new(BackendError::Timeout(self.timeout_secs))
            } else {
                anyhow::Error::new(e).context("Failed to read the analysis response")
            }
        })?;

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Analysis failed on the server.".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(parse_response(&body)?)
    }
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
pub fn strip_code_fences(body: &str) -> &str {
    let trimmed = body.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(body)).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

/// Parse a successful response body into findings.
pub fn parse_response(body: &str) -> Result<Vec<Contradiction>, BackendError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(body))
        .map_err(|e| BackendError::Malformed(e.to_string()))?;

    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Err(BackendError::Reported(message.to_string()));
    }

    let list = value
        .get("contradictions")
        .ok_or_else(|| BackendError::Malformed("missing contradictions array".to_string()))?;
    serde_json::from_value(list.clone()).map_err(|e| BackendError::Malformed(e.to_string()))
}

/// Create the [`AnalysisSource`] named by `analysis.source`.
///
/// | Config Value | Source |
/// |-------------|--------|
/// | `"mock"` | [`MockSource`], fixed when `mock_findings` is set |
/// | `"delegated"` | [`DelegatedSource`] at `analysis.endpoint` |
pub fn create_source(config: &AnalysisConfig) -> Result<Arc<dyn AnalysisSource>> {
    match config.source.as_str() {
        "mock" => Ok(match config.mock_findings {
            Some(n) => Arc::new(MockSource::fixed(n)),
            None => Arc::new(MockSource::random()),
        }),
        "delegated" => Ok(Arc::new(DelegatedSource::new(
            config.endpoint.clone(),
            config.timeout_secs,
        )?)),
        other => anyhow::bail!("Unknown analysis source: {}", other),
    }
}
