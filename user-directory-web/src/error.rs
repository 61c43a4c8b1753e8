//! HTTP error mapping

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use user_directory_core::error::CoreError;
use user_directory_core::schema::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Anything the client cannot fix; `message` is what the client sees
    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        source: CoreError,
    },
}

impl ApiError {
    /// Map a store error, using `message` as the body of a 500 response.
    pub fn from_core(err: CoreError, message: &'static str) -> Self {
        if err.is_expected() {
            tracing::warn!("{message}: {err}");
        } else {
            tracing::error!("{message}: {err}");
        }

        match err {
            CoreError::UserNotFound(_) => Self::NotFound,
            CoreError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            source @ (CoreError::StorageFatal(_)
            | CoreError::StorageError(_)
            | CoreError::SerializationError(_)) => Self::Internal { message, source },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::DuplicateEmail(_) => StatusCode::CONFLICT,
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::NotFound => json!({ "error": "User not found" }),
            Self::DuplicateEmail(_) => json!({
                "error": "Email already exists",
                "message": "A user with this email address already exists",
            }),
            Self::Validation(errors) => json!({
                "error": "Validation failed",
                "details": errors,
            }),
            Self::InvalidBody(_) => json!({ "error": "Invalid request body" }),
            Self::Internal { message, .. } => json!({ "error": message }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
