//! Question - The user's free-form request

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Question - A non-empty natural-language request about SQL or Excel.
///
/// The text is stored exactly as typed. Only a completely empty submission
/// counts as "nothing entered"; whitespace is passed through like any other text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(String);

impl Question {
    /// Validate raw input from the form or API
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DomainError::EmptyQuestion);
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Question {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(Question::parse(""), Err(DomainError::EmptyQuestion)));
    }

    #[test]
    fn test_whitespace_only_input_is_kept() {
        let q = Question::parse("  \n\t ").unwrap();
        assert_eq!(q.as_str(), "  \n\t ");
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let q = Question::parse("  Excel formula for conditional formatting\n").unwrap();
        assert_eq!(q.as_str(), "  Excel formula for conditional formatting\n");
    }

    #[test]
    fn test_long_input_is_accepted() {
        let raw = "x".repeat(200_000);
        let q = Question::parse(raw.clone()).unwrap();
        assert_eq!(q.into_inner(), raw);
    }
}
