//! Gemini LLM Provider
//!
//! Implements [`LlmProvider`] on top of the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use querymate::{
    ChatMessage, CompletionOptions, CompletionResponse, DomainError, LlmProvider, MessageRole,
    TokenUsage,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`GeminiProvider`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the Gemini model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the client at another endpoint (proxies, local stubs)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gemini API error types
#[derive(Debug, Clone, Error)]
pub enum GeminiError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Gemini API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited by Gemini API: {0}")]
    RateLimited(String),
}

impl From<GeminiError> for DomainError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::ClientBuild(msg) => DomainError::Configuration(msg),
            other => DomainError::ExternalService(other.to_string()),
        }
    }
}

/// LLM provider backed by Google's Gemini models
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("querymate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeminiError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, GeminiError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.config.base_url,
            model = self.config.model
        );

        let request = GenerateContentRequest::from_messages(messages, options);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| GeminiError::RequestFailed(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| GeminiError::ParseError(err.to_string()))?;

        Ok(CompletionResponse {
            content: extract_text(&payload).unwrap_or_default(),
            model: payload
                .get("modelVersion")
                .and_then(|v| v.as_str())
                .unwrap_or(self.config.model.as_str())
                .to_string(),
            usage: extract_usage(&payload),
            finish_reason: extract_finish_reason(&payload),
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        Ok(self.generate(messages, options).await?)
    }

    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

// ============================================
// Request Types
// ============================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

impl GenerateContentRequest {
    fn from_messages(messages: &[ChatMessage], options: &CompletionOptions) -> Self {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            let part = Part {
                text: message.content.clone(),
            };
            match message.role {
                MessageRole::System => system_parts.push(part),
                MessageRole::User => contents.push(Content {
                    role: Some("user"),
                    parts: vec![part],
                }),
                MessageRole::Assistant => contents.push(Content {
                    role: Some("model"),
                    parts: vec![part],
                }),
            }
        }

        let system_instruction = (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        });

        let generation_config = (!options.is_empty()).then(|| GenerationConfig {
            max_output_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            stop_sequences: options.stop_sequences.clone(),
        });

        Self {
            contents,
            system_instruction,
            generation_config,
        }
    }
}

// ============================================
// Helper Functions
// ============================================

fn extract_text(root: &Value) -> Option<String> {
    let candidates = root.get("candidates")?.as_array()?;

    let mut collected = Vec::new();
    for candidate in candidates {
        if let Some(parts) = candidate
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.as_array())
        {
            for part in parts {
                if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        collected.push(trimmed.to_string());
                    }
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n\n"))
    }
}

fn extract_usage(root: &Value) -> TokenUsage {
    let Some(usage) = root.get("usageMetadata") else {
        return TokenUsage::default();
    };

    let count = |key: &str| {
        usage
            .get(key)
            .and_then(|v| v.as_u64())
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(0)
    };

    TokenUsage {
        prompt_tokens: count("promptTokenCount"),
        completion_tokens: count("candidatesTokenCount"),
        total_tokens: count("totalTokenCount"),
    }
}

fn extract_finish_reason(root: &Value) -> Option<String> {
    root.get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|list| list.first())
        .and_then(|candidate| candidate.get("finishReason"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or_else(|| {
            root.get("promptFeedback")
                .and_then(|feedback| feedback.get("blockReason"))
                .and_then(|v| v.as_str())
                .map(|reason| format!("BLOCKED_{}", reason))
        })
}

fn map_http_error(status: StatusCode, body: String) -> GeminiError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return GeminiError::RateLimited(message);
    }

    GeminiError::ApiError {
        status: status.as_u16(),
        message,
    }
}
