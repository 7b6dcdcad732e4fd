//! LLM Provider Port
//!
//! Abstract interface for LLM (Large Language Model) invocations.
//! The assistant only needs one hosted model, but the seam keeps the
//! vendor swappable and lets tests run without the network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Options for LLM completion.
///
/// Every field left as `None` falls back to the provider's own default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Top-p sampling
    pub top_p: Option<f32>,
    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
}

impl CompletionOptions {
    pub fn is_empty(&self) -> bool {
        self.max_tokens.is_none()
            && self.temperature.is_none()
            && self.top_p.is_none()
            && self.stop_sequences.is_none()
    }
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text content (empty when the model produced nothing)
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: TokenUsage,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// LLM Provider interface
///
/// # Example
///
/// ```rust,ignore
/// use querymate::ports::LlmProvider;
///
/// struct GeminiProvider { /* ... */ }
///
/// #[async_trait]
/// impl LlmProvider for GeminiProvider {
///     async fn complete(&self, messages: &[ChatMessage], options: &CompletionOptions)
///         -> Result<CompletionResponse, DomainError> {
///         // Call generateContent
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError>;

    /// Generate a completion from a single user prompt
    async fn complete_simple(&self, prompt: &str) -> Result<CompletionResponse, DomainError> {
        let messages = vec![ChatMessage::user(prompt)];
        self.complete(&messages, &CompletionOptions::default()).await
    }

    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl LlmProvider for Echo {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            options: &CompletionOptions,
        ) -> Result<CompletionResponse, DomainError> {
            assert!(options.is_empty());
            Ok(CompletionResponse {
                content: messages
                    .iter()
                    .map(|m| format!("{:?}:{}", m.role, m.content))
                    .collect(),
                model: self.model_id().to_string(),
                usage: TokenUsage::default(),
                finish_reason: None,
            })
        }

        fn provider_name(&self) -> &str {
            "echo"
        }

        fn model_id(&self) -> &str {
            "echo-1"
        }
    }

    #[tokio::test]
    async fn test_complete_simple_sends_single_user_message() {
        let response = Echo.complete_simple("hello").await.unwrap();
        assert_eq!(response.content, "User:hello");
        assert_eq!(response.model, "echo-1");
    }

    #[test]
    fn test_default_options_defer_to_provider() {
        assert!(CompletionOptions::default().is_empty());
        let options = CompletionOptions {
            temperature: Some(0.2),
            ..Default::default()
        };
        assert!(!options.is_empty());
    }
}
