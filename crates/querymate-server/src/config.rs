//! Server configuration
//!
//! Resolved once at startup from Shuttle secrets, falling back to the
//! process environment (optionally loaded from `.env`).

use std::time::Duration;

use querymate::{DomainError, PromptTemplate};

use crate::adapters::gemini::{GeminiConfig, DEFAULT_MODEL, DEFAULT_TIMEOUT};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";
pub const TEMPLATE_VAR: &str = "PROMPT_TEMPLATE";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_timeout: Duration,
    pub prompt_template: PromptTemplate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_timeout: DEFAULT_TIMEOUT,
            prompt_template: PromptTemplate::sql_excel(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from a key lookup (secrets, env, or a test map).
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.gemini_api_key = get(API_KEY_VAR).map(|k| k.trim().to_string());

        if let Some(model) = get(MODEL_VAR) {
            config.gemini_model = model.trim().to_string();
        }

        if let Some(raw) = get(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or_else(|| {
                    DomainError::Configuration(format!(
                        "{} must be a positive whole number of seconds, got '{}'",
                        TIMEOUT_VAR, raw
                    ))
                })?;
            config.gemini_timeout = Duration::from_secs(secs);
        }

        if let Some(template) = get(TEMPLATE_VAR) {
            config.prompt_template = PromptTemplate::new(template)
                .map_err(|e| DomainError::Configuration(format!("{}: {}", TEMPLATE_VAR, e)))?;
        }

        Ok(config)
    }

    /// Gemini connection settings, if an API key is configured
    pub fn gemini(&self) -> Option<GeminiConfig> {
        self.gemini_api_key.as_ref().map(|key| {
            GeminiConfig::new(key.clone())
                .with_model(self.gemini_model.clone())
                .with_timeout(self.gemini_timeout)
        })
    }
}
