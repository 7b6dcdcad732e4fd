//! Ask - Request/response DTOs for the JSON API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use querymate::{Answer, TokenUsage};

use crate::application::AskOutcome;
use crate::render::markdown_to_html;

/// Ask request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    /// Free-form SQL or Excel question
    #[schema(example = "SQL query to find active users")]
    pub question: String,
}

/// Whether the model produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AskStatus {
    Answered,
    NoAnswer,
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageSummary {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<TokenUsage> for UsageSummary {
    fn from(usage: TokenUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

/// Ask response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub status: AskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Answer markdown as returned by the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Answer rendered to HTML
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_html: Option<String>,
    /// Human readable notice when there is no answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

pub const NO_ANSWER_NOTICE: &str =
    "AI Assistant: I couldn't generate a response for that. Please try rephrasing.";

impl AskResponse {
    pub fn from_outcome(outcome: AskOutcome, model: &str) -> Self {
        match outcome {
            AskOutcome::Answered(answer) => Self::answered(answer),
            AskOutcome::NoAnswer { finish_reason } => Self {
                status: AskStatus::NoAnswer,
                id: None,
                answer: None,
                answer_html: None,
                notice: Some(NO_ANSWER_NOTICE.to_string()),
                model: model.to_string(),
                usage: None,
                finish_reason,
                created_at: None,
            },
        }
    }

    fn answered(answer: Answer) -> Self {
        Self {
            status: AskStatus::Answered,
            id: Some(answer.id),
            answer_html: Some(markdown_to_html(&answer.markdown)),
            answer: Some(answer.markdown),
            notice: None,
            model: answer.model,
            usage: Some(answer.usage.into()),
            finish_reason: answer.finish_reason,
            created_at: Some(answer.created_at),
        }
    }
}

/// Prompt preview request
#[derive(Debug, Deserialize, ToSchema)]
pub struct PromptRequest {
    pub question: String,
}

/// Prompt preview response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromptResponse {
    /// Full text that would be sent to the model
    pub prompt: String,
}
