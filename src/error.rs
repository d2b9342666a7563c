//! Domain error types for the QA scenario server.
//!
//! Every error leaves the server as `{"success": false, "error": {"code", "message"}}`.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, error};
use serde::Serialize;
use utoipa::ToSchema;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found, or not visible to the caller
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed or invalid request data
    #[error("{0}")]
    Validation(String),

    /// Email outside the registration domain
    #[error("Email must belong to @{0}")]
    InvalidEmailDomain(String),

    /// Missing or invalid session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller can see the resource but lacks the role for this action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Uniqueness conflict (duplicate user, membership, ...)
    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    /// Scenario generation failed (provider call or response parsing)
    #[error("Scenario generation failed: {0}")]
    Generation(String),

    /// Server is missing configuration required for this operation
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Conflict {
            code,
            message: message.into(),
        }
    }

    /// Machine-readable error code carried in the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "INTERNAL_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidEmailDomain(_) => "INVALID_EMAIL_DOMAIN",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict { code, .. } => code,
            AppError::Generation(_) => "GENERATION_ERROR",
            AppError::Configuration(_) => "CONFIG_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Generation(_) | AppError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidEmailDomain(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                "An internal server error occurred".to_string()
            }
            AppError::Generation(err_str) => {
                tracing::error!("Scenario generation error: {}", err_str);
                self.to_string()
            }
            AppError::Configuration(err_str) => {
                tracing::error!("Configuration error: {}", err_str);
                self.to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.code(), message))
    }
}

/// Error response envelope matching OpenAPI schema.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

/// Error details inside the envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error.code, self.error.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("Invalid UUID: {}", err))
    }
}

// Extractor error handlers so framework-level rejections use the same envelope.

pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid request body: {}", err)).into()
}

pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid query string: {}", err)).into()
}

/// Path segments are ids; one that does not parse cannot name an existing resource.
pub fn path_error_handler(_err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound("Resource".to_string()).into()
}
