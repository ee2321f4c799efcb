use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jobfair_core::validation::ResumeFileError;
use jobfair_core::ErrorBody;
use thiserror::Error;
use tracing::debug;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            debug!("Request body over the limit: {}", e.body_text());
            AppError::PayloadTooLarge(ResumeFileError::TooLarge.to_string())
        } else {
            AppError::Validation(e.body_text())
        }
    }
}

impl From<ResumeFileError> for AppError {
    fn from(e: ResumeFileError) -> Self {
        match e {
            ResumeFileError::TooLarge => AppError::PayloadTooLarge(e.to_string()),
            ResumeFileError::UnsupportedType => AppError::Validation(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor".to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            success: false,
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::PayloadTooLarge("x".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ResumeFileError::TooLarge.into(), StatusCode::PAYLOAD_TOO_LARGE),
            (
                ResumeFileError::UnsupportedType.into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Internal(anyhow::anyhow!("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
