// Generator HTTP interface - download, preview and text-to-schema endpoints

use std::collections::BTreeMap;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::{
    app_state::AppState,
    archive::{archive, ARCHIVE_FILE_NAME},
    codegen::{preview, render, RenderMode},
    error::{AppError, AppResult},
    schema::GenerationRequest,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

/// Unreadable bodies (bad JSON, wrong content type) fail like any other schema violation
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::SchemaValidationError(rejection.body_text()))
}

/// Validate a request body, logging advisory lint findings
fn parse_request(body: Result<Json<Value>, JsonRejection>) -> AppResult<GenerationRequest> {
    let request = GenerationRequest::from_value(json_body(body)?)?;
    for warning in request.lint() {
        warn!("Schema lint: {}", warning);
    }
    Ok(request)
}

/// Log the specific failure and replace it with a fixed message
fn collapse(context: &'static str, message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        error!("Error during {}: {}", context, err);
        AppError::Internal(message.to_string())
    }
}

// HTTP Handlers

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "CRUD API Generator Backend is running!" }))
}

pub async fn generate_project_handler(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = parse_request(body)?;
    info!("Generating project for {} entities", request.entities.len());

    let zip_bytes = render(&request, RenderMode::Full)
        .and_then(|files| archive(&files))
        .map_err(collapse("generation", "Failed to generate project."))?;

    let disposition = format!("attachment; filename={}", ARCHIVE_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        zip_bytes,
    )
        .into_response())
}

pub async fn generate_preview_handler(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BTreeMap<String, String>>, AppError> {
    let request = parse_request(body)?;
    info!("Generating preview for {} entities", request.entities.len());

    let files = render(&request, RenderMode::Preview)
        .map_err(collapse("preview generation", "Failed to generate code preview."))?;

    Ok(Json(preview(&files)))
}

/// Surfaces the underlying failure message to the caller
pub async fn parse_text_handler(
    State(state): State<AppState>,
    body: Result<Json<ParseTextRequest>, JsonRejection>,
) -> Result<Json<GenerationRequest>, AppError> {
    let req = json_body(body)?;
    let request = state.inference.infer(&req.text).await.map_err(|err| {
        error!(upstream_status = ?err.upstream_status(), "Text-to-schema failed: {}", err);
        err
    })?;
    info!("Inferred schema with {} entities", request.entities.len());
    Ok(Json(request))
}

// Create generator router, mounted under /api/v1
pub fn create_generator_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate_project_handler))
        .route("/generate-preview", post(generate_preview_handler))
        .route("/parse-text-to-schema", post(parse_text_handler))
        .with_state(state)
}

/// Full application router
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/v1", create_generator_router(state))
}
