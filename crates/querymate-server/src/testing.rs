//! Test doubles shared by the server's unit tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use querymate::{
    ChatMessage, CompletionOptions, CompletionResponse, DomainError, LlmProvider, TokenUsage,
};

use crate::application::AssistService;
use crate::config::AppConfig;
use crate::AppState;

/// Provider that replays a fixed reply and records every prompt it receives
pub struct ScriptedProvider {
    reply: Result<String, (fn(String) -> DomainError, String)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err((DomainError::ExternalService, message.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails with a validation error, as a provider that refuses its input would
    pub fn rejecting(message: &str) -> Self {
        Self {
            reply: Err((DomainError::Validation, message.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        self.prompts
            .lock()
            .unwrap()
            .extend(messages.iter().map(|m| m.content.clone()));

        match &self.reply {
            Ok(text) => Ok(CompletionResponse {
                content: text.clone(),
                model: "scripted-1".to_string(),
                usage: TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                },
                finish_reason: Some("STOP".to_string()),
            }),
            Err((kind, message)) => Err(kind(message.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-1"
    }
}

pub fn state_with(provider: Arc<ScriptedProvider>) -> AppState {
    let config = AppConfig::default();
    let assistant = AssistService::new(provider, config.prompt_template.clone());
    AppState {
        config: Arc::new(config),
        assistant: Some(Arc::new(assistant)),
    }
}

pub fn unconfigured_state() -> AppState {
    AppState {
        config: Arc::new(AppConfig::default()),
        assistant: None,
    }
}
