//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    AskRequest, AskResponse, AskStatus, PromptRequest, PromptResponse, UsageSummary,
};
use crate::HealthCheck;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health_check,
        // Ask endpoints
        super::ask::ask,
        super::ask::preview_prompt,
    ),
    info(
        title = "QueryMate API",
        version = "0.1.0",
        description = "SQL & Excel AI Assistant\n\nWraps a question in fixed instructions, asks Gemini once and returns the markdown answer.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Ask", description = "Ask - SQL & Excel question answering"),
    ),
    components(
        schemas(
            HealthCheck,
            // Ask
            AskRequest,
            AskResponse,
            AskStatus,
            UsageSummary,
            // Prompt
            PromptRequest,
            PromptResponse,
        )
    ),
)]
pub struct ApiDoc;
