use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use querymate::DomainError;

mod adapters;
mod application;
mod config;
mod models;
mod render;
mod routes;
#[cfg(test)]
mod testing;

use adapters::GeminiProvider;
use application::AssistService;
use config::AppConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when no Gemini API key is configured
    pub assistant: Option<Arc<AssistService>>,
}

impl AppState {
    /// Wire the Gemini provider from configuration
    pub fn from_config(config: AppConfig) -> Result<Self, DomainError> {
        let assistant = match config.gemini() {
            Some(gemini) => {
                let provider = GeminiProvider::new(gemini)?;
                tracing::info!("🔮 Gemini provider initialized ({})", config.gemini_model);
                Some(Arc::new(AssistService::new(
                    Arc::new(provider),
                    config.prompt_template.clone(),
                )))
            }
            None => {
                tracing::warn!(
                    "⚠️  No {} set - the form will only show setup instructions",
                    config::API_KEY_VAR
                );
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            assistant,
        })
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    status: String,
    message: String,
    version: String,
    llm_configured: bool,
    model: String,
}

/// Service health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is running", body = HealthCheck)
    ),
    tag = "Health"
)]
async fn health_check(State(state): State<AppState>) -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "QueryMate is running - ask away".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        llm_configured: state.assistant.is_some(),
        model: state.config.gemini_model.clone(),
    })
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::page::router())
        .merge(routes::ask::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🤖 QueryMate initializing...");

    // Local runs may keep the key in .env instead of Secrets.toml
    dotenvy::dotenv().ok();

    let config = AppConfig::from_lookup(|key| {
        secrets.get(key).or_else(|| std::env::var(key).ok())
    })
    .map_err(anyhow::Error::new)?;

    let state = AppState::from_config(config).map_err(anyhow::Error::new)?;
    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ QueryMate ready");

    Ok(router.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{state_with, unconfigured_state, ScriptedProvider};
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    async fn get_health(state: AppState) -> HealthCheck {
        let response = build_router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let health = get_health(unconfigured_state()).await;
        assert_eq!(health.status, "ok");
        assert!(!health.llm_configured);

        let health = get_health(state_with(Arc::new(ScriptedProvider::answering("x")))).await;
        assert!(health.llm_configured);
        assert_eq!(health.model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_state_from_config() {
        let state = AppState::from_config(AppConfig::default()).unwrap();
        assert!(state.assistant.is_none());

        let config = AppConfig::from_lookup(|key| {
            (key == config::API_KEY_VAR).then(|| "test-key".to_string())
        })
        .unwrap();
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.assistant.unwrap().model_id(), "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_router_serves_form_and_openapi() {
        let app = build_router(unconfigured_state());
        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
