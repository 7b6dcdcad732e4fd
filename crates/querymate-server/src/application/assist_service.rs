//! Assist Application Service (Use Case)
//!
//! One question in, one provider call, one outcome out.

use std::sync::Arc;

use querymate::{Answer, DomainError, LlmProvider, PromptTemplate, Question};

/// Result of a successful round trip
#[derive(Debug, Clone)]
pub enum AskOutcome {
    /// The model returned markdown
    Answered(Answer),
    /// The call succeeded but produced no text (blocked or empty candidate)
    NoAnswer { finish_reason: Option<String> },
}

/// Application service for answering SQL & Excel questions
#[derive(Clone)]
pub struct AssistService {
    provider: Arc<dyn LlmProvider>,
    template: PromptTemplate,
}

impl AssistService {
    pub fn new(provider: Arc<dyn LlmProvider>, template: PromptTemplate) -> Self {
        Self { provider, template }
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    /// Wrap the question in the template and ask the provider once
    pub async fn ask(&self, raw: &str) -> Result<AskOutcome, DomainError> {
        let question = Question::parse(raw)?;
        let prompt = self.template.render(&question);

        tracing::info!(
            provider = self.provider.provider_name(),
            model = self.provider.model_id(),
            question_chars = question.as_str().chars().count(),
            "Asking assistant"
        );

        let response = self
            .provider
            .complete_simple(&prompt)
            .await
            .inspect_err(|e| tracing::warn!("Assistant call failed: {}", e))?;

        if response.content.trim().is_empty() {
            tracing::warn!(
                finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                "Assistant returned no text"
            );
            return Ok(AskOutcome::NoAnswer {
                finish_reason: response.finish_reason,
            });
        }

        tracing::info!(
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Assistant answered"
        );

        Ok(AskOutcome::Answered(Answer::new(
            question.into_inner(),
            response.content,
            response.model,
            response.usage,
            response.finish_reason,
        )))
    }
}
