use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    SchemaValidationError(String),
    TemplateRenderError(String),
    TransportError { status: Option<u16>, body: String },
    DecodeError(String),
    ConfigurationError(String),
    ArchiveError(String),
    Internal(String),
}

impl AppError {
    /// Upstream HTTP status carried by a transport failure, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::TransportError { status, .. } => *status,
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::SchemaValidationError(msg) => write!(f, "Schema validation error: {}", msg),
            AppError::TemplateRenderError(msg) => write!(f, "Template render error: {}", msg),
            AppError::TransportError { status: Some(status), body } => {
                write!(f, "LLM API request failed with status {}: {}", status, body)
            }
            AppError::TransportError { status: None, body } => {
                write!(f, "LLM API request failed: {}", body)
            }
            AppError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ArchiveError(msg) => write!(f, "Archive error: {}", msg),
            AppError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::SchemaValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::TemplateRenderError(msg) => {
                tracing::error!("Template render error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::ArchiveError(msg) => {
                tracing::error!("Archive error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::TransportError { .. }
            | AppError::DecodeError(_)
            | AppError::ConfigurationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<fmt::Error> for AppError {
    fn from(err: fmt::Error) -> Self {
        AppError::TemplateRenderError(err.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::ArchiveError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ArchiveError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
