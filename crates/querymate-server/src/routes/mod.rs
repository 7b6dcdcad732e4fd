//! QueryMate Routes
//!
//! - / - The question form (GET shows it, POST submits it)
//! - /api/ask - JSON question answering
//! - /api/prompt - Prompt preview
//! - /swagger-ui - OpenAPI documentation

pub mod ask;
pub mod page;
pub mod swagger;
