//! Answer - Markdown returned by the model for one question

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::TokenUsage;

/// Answer - A single completed request cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub question: String,
    /// Markdown as returned by the provider
    pub markdown: String,
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(
        question: String,
        markdown: String,
        model: String,
        usage: TokenUsage,
        finish_reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            question,
            markdown,
            model,
            usage,
            finish_reason,
            created_at: Utc::now(),
        }
    }
}
