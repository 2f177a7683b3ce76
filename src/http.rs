//! HTTP transport for footprint-oracle
//!
//! Axum router exposing the quiz submission endpoint plus plain health and
//! info routes. Handlers are stateless; the text generator is injected through
//! [`AppState`].

use std::{any::Any, sync::Arc};

use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    answers::RawAnswers,
    clients::TextGenerator,
    config::Config,
    error::{Result, RoutedError, internal_body},
    narrative::{self, NarrativeSource},
    scoring::{self, Breakdown},
};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no credential is configured; narratives then use the fallback.
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    pub fn new(config: Config, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            config: Arc::new(config),
            generator,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub request_id: Uuid,
    pub carbon_kg: f64,
    pub behavior_summary: String,
    pub story: String,
    pub tips: Vec<String>,
    pub narrative_source: NarrativeSource,
    pub breakdown: Breakdown,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(state): State<AppState>) -> impl IntoResponse {
    let generation = &state.config.generation;
    Json(json!({
        "generator": {
            "configured": state.generator.is_some(),
            "model": state.generator.as_ref().map(|g| g.model().to_string()),
            "max_tokens": generation.max_tokens,
            "temperature": generation.temperature,
            "timeout_ms": generation.timeout_ms
        },
        "server": {
            "bind": state.config.server.http_bind.to_string(),
            "retry_path": state.config.server.retry_path
        }
    }))
}

/// Score a quiz submission and attach a narrative.
pub async fn calculate_handler(
    State(state): State<AppState>,
    Form(raw): Form<RawAnswers>,
) -> std::result::Result<Json<CalculateResponse>, RoutedError> {
    let request_id = Uuid::new_v4();
    let retry_path = state.config.server.retry_path.as_str();

    let answers = raw.into_answer_set().map_err(|e| {
        tracing::info!(%request_id, "Rejected submission: {}", e);
        e.with_retry_path(retry_path)
    })?;

    let assessment = scoring::assess(&answers);
    tracing::info!(
        %request_id,
        carbon_kg = assessment.carbon_kg,
        "Scored submission"
    );

    let narrative = narrative::request_narrative(
        state.generator.clone(),
        &assessment.behavior_summary,
        &state.config.generation,
    )
    .await;

    Ok(Json(CalculateResponse {
        request_id,
        carbon_kg: assessment.carbon_kg,
        behavior_summary: assessment.behavior_summary,
        story: narrative.story,
        tips: narrative.tips,
        narrative_source: narrative.source,
        breakdown: assessment.breakdown,
    }))
}

fn panic_response(retry_path: &str, err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        internal_body(&details, retry_path).to_string(),
    )
        .into_response()
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let retry_path = state.config.server.retry_path.clone();

    Router::new()
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/calculate", post(calculate_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(
                    move |err: Box<dyn Any + Send + 'static>| panic_response(&retry_path, err),
                ))
                .layer(CorsLayer::new().allow_origin(AnyOrigin).allow_methods(AnyOrigin)),
        )
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(state: AppState) -> Result<()> {
    let bind = state.config.server.http_bind;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!("Starting HTTP server on {}", bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn handler_panic_renders_server_error_body() {
        let resp = panic_response("/quiz", Box::new("breakdown overflowed".to_string()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], 500);
        assert_eq!(body["error"]["retry_path"], "/quiz");
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("breakdown overflowed")
        );
    }
}
