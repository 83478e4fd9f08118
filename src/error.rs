use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy for the payment core.
///
/// Callers distinguish retryable from terminal failures by variant, never by
/// matching on message strings. Messages never carry key material or the
/// operands of a signature comparison.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid required field. User-fixable.
    #[error("Validation error: {0}")]
    Validation(anyhow::Error),

    /// Signature or token mismatch. Deliberately opaque about which side
    /// of the comparison failed.
    #[error("Payment could not be authenticated")]
    Authenticity,

    /// A required secret or credential is absent. Surfaced as unavailable,
    /// not as a client error.
    #[error("Service misconfigured: {0}")]
    Configuration(anyhow::Error),

    /// Backing store is not ready. Retryable.
    #[error("Payment store unavailable")]
    StoreUnavailable,

    /// The gateway call failed. The message stays generic; details go to
    /// the log, not the caller.
    #[error("Payment gateway error")]
    Upstream(anyhow::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => AppError::StoreUnavailable,
            _ => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error_message, details, retry_after) = match self {
            AppError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error".to_string(),
                Some(err.to_string()),
                None,
            ),
            AppError::Authenticity => (
                StatusCode::BAD_REQUEST,
                "Payment could not be authenticated".to_string(),
                None,
                None,
            ),
            AppError::Configuration(err) => {
                tracing::error!(error = %err, "configuration error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service unavailable".to_string(),
                    None,
                    None,
                )
            }
            AppError::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Payment store unavailable".to_string(),
                None,
                Some(1),
            ),
            AppError::Upstream(err) => {
                tracing::error!(error = %err, "gateway error");
                (
                    StatusCode::BAD_GATEWAY,
                    "Payment gateway error".to_string(),
                    None,
                    None,
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                    None,
                )
            }
        };

        let mut res = (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
            }),
        )
            .into_response();

        if let Some(retry) = retry_after {
            res.headers_mut()
                .insert(axum::http::header::RETRY_AFTER, retry.into());
        }

        res
    }
}
