//! Domain Errors
//!
//! Error types for domain operations. Display strings are shown to users
//! as-is, so vendor messages are carried through verbatim.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Please enter your question in the text area above!")]
    EmptyQuestion,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    ExternalService(String),
}

impl DomainError {
    /// Whether the error was caused by the caller's input rather than the system
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::EmptyQuestion | Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_service_message_is_verbatim() {
        let err = DomainError::ExternalService("API key not valid. Please pass a valid API key.".into());
        assert_eq!(err.to_string(), "API key not valid. Please pass a valid API key.");
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_user_errors() {
        assert!(DomainError::EmptyQuestion.is_user_error());
        assert!(DomainError::Validation("too long".into()).is_user_error());
        assert!(!DomainError::Configuration("missing key".into()).is_user_error());
    }
}
