//! QueryMate Domain Library
//!
//! Core domain types and interfaces for the QueryMate SQL & Excel assistant.
//!
//! # Architecture
//!
//! This crate follows the same hexagonal split as the server built on it:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Question, PromptTemplate, Answer
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: External service interfaces (LLM providers)
//!
//! # Usage
//!
//! ```rust
//! use querymate::{PromptTemplate, Question};
//!
//! let question = Question::parse("SQL to count orders per customer").unwrap();
//! let prompt = PromptTemplate::sql_excel().render(&question);
//! assert!(prompt.contains("SQL to count orders per customer"));
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{Answer, DomainError, PromptTemplate, Question, QUESTION_PLACEHOLDER};
pub use ports::{
    ChatMessage, CompletionOptions, CompletionResponse, LlmProvider, MessageRole, TokenUsage,
};
