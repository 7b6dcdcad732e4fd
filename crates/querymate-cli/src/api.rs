//! QueryMate API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API Client for a QueryMate server
pub struct QueryMateClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Types
// ============================================

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct PromptResponse {
    prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct UsageSummary {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct AskResponse {
    pub status: String,
    pub answer: Option<String>,
    pub notice: Option<String>,
    pub model: String,
    pub usage: Option<UsageSummary>,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub llm_configured: bool,
    pub model: String,
}

/// What the server made of a question
#[derive(Debug)]
pub enum AskReply {
    /// 200 - answer or no-answer notice
    Answered(AskResponse),
    /// 400 - the question was rejected
    Rejected(String),
    /// 502 - the model call failed; message is the vendor's
    Failed(String),
    /// 503 - the server has no API key
    Unavailable(String),
}

impl QueryMateClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Server health
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to connect to QueryMate at {}", self.base_url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Ask a question
    pub async fn ask(&self, question: &str) -> Result<AskReply> {
        let url = format!("{}/api/ask", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await
            .with_context(|| format!("Failed to connect to QueryMate at {}", self.base_url))?;

        let status = resp.status();
        if status.is_success() {
            let body: AskResponse = resp.json().await.context("Failed to parse response")?;
            return Ok(AskReply::Answered(body));
        }

        let body = resp.text().await.unwrap_or_default();
        classify_error(status, body)
    }

    /// Prompt the server would send for a question, using its configured template
    pub async fn prompt(&self, question: &str) -> Result<String> {
        let url = format!("{}/api/prompt", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&PromptRequest { question })
            .send()
            .await
            .with_context(|| format!("Failed to connect to QueryMate at {}", self.base_url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let body: PromptResponse = resp.json().await.context("Failed to parse response")?;
        Ok(body.prompt)
    }
}

impl AskReply {
    /// Whether the command should exit with a failure status
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Unavailable(_))
    }
}

fn classify_error(status: StatusCode, body: String) -> Result<AskReply> {
    match status {
        StatusCode::BAD_REQUEST => Ok(AskReply::Rejected(body)),
        StatusCode::BAD_GATEWAY => Ok(AskReply::Failed(body)),
        StatusCode::SERVICE_UNAVAILABLE => Ok(AskReply::Unavailable(body)),
        other => bail!("API error ({}): {}", other, body),
    }
}
