use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::{MediaError, StoreError, TokenError};

/// Errors surfaced to API callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Insufficient credits. You need at least {required} credit to unlock a profile.")]
    InsufficientCredits { required: i32 },

    #[error("Profile already unlocked.")]
    AlreadyUnlocked,

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable code carried in the `error` field
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::InsufficientCredits { .. } => "insufficient_credits",
            ApiError::AlreadyUnlocked => "already_unlocked",
            ApiError::Auth(_) => "authentication_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Conflict(what) => ApiError::Validation(what),
            limit @ StoreError::PhotoLimit(_) => ApiError::Validation(limit.to_string()),
            other => {
                tracing::error!("Store failure: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encode(e) => {
                tracing::error!("Token encoding failed: {}", e);
                ApiError::Internal("Failed to issue token".to_string())
            }
            other => ApiError::Auth(other.to_string()),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::UnsupportedType(_) => ApiError::Validation(err.to_string()),
            MediaError::Io(e) => {
                tracing::error!("Media storage failure: {}", e);
                ApiError::Internal("Failed to store image".to_string())
            }
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InsufficientCredits { .. }
            | ApiError::AlreadyUnlocked => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// JSON error response for payload and query errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::AlreadyUnlocked.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InsufficientCredits { required: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Auth("x".into()).status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_store_conflict_becomes_validation() {
        let err: ApiError = StoreError::Conflict("A user with that username already exists.".into()).into();
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.to_string(), "A user with that username already exists.");
    }

    #[test]
    fn test_photo_limit_becomes_validation() {
        let err: ApiError = StoreError::PhotoLimit(3).into();
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.to_string(), "You can upload a maximum of 3 images.");
    }

    #[test]
    fn test_insufficient_credits_message() {
        let err = ApiError::InsufficientCredits { required: 1 };
        assert_eq!(err.code(), "insufficient_credits");
        assert!(err.to_string().starts_with("Insufficient credits"));
    }
}
