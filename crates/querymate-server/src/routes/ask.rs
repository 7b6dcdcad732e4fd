//! Ask Routes - JSON API over the assistant

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use querymate::DomainError;

use crate::application::AssistService;
use crate::models::{AskRequest, AskResponse, PromptRequest, PromptResponse};
use crate::AppState;

pub const NOT_CONFIGURED: &str = "GEMINI_API_KEY environment variable not set.";

fn error_status(err: &DomainError) -> StatusCode {
    if err.is_user_error() {
        return StatusCode::BAD_REQUEST;
    }
    match err {
        DomainError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn assistant(state: &AppState) -> Result<&AssistService, (StatusCode, String)> {
    state
        .assistant
        .as_deref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, NOT_CONFIGURED.to_string()))
}

/// Ask the assistant a question
#[utoipa::path(
    post,
    path = "/api/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer or no-answer notice", body = AskResponse),
        (status = 400, description = "Empty or invalid question"),
        (status = 502, description = "Gemini call failed, message passed through"),
        (status = 503, description = "Gemini API key not configured")
    ),
    tag = "Ask"
)]
pub async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let assistant = assistant(&state)?;

    let outcome = assistant
        .ask(&payload.question)
        .await
        .map_err(|e| (error_status(&e), e.to_string()))?;

    Ok(Json(AskResponse::from_outcome(outcome, assistant.model_id())))
}

/// Render the prompt that would be sent for a question
#[utoipa::path(
    post,
    path = "/api/prompt",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Rendered prompt", body = PromptResponse),
        (status = 400, description = "Empty or invalid question")
    ),
    tag = "Ask"
)]
pub async fn preview_prompt(
    State(state): State<AppState>,
    Json(payload): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, (StatusCode, String)> {
    let question = querymate::Question::parse(payload.question)
        .map_err(|e| (error_status(&e), e.to_string()))?;

    Ok(Json(PromptResponse {
        prompt: state.config.prompt_template.render(&question),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ask", post(ask))
        .route("/api/prompt", post(preview_prompt))
}
