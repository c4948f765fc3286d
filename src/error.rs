use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Request-level failures surfaced to API clients.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },
    #[error("{0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn upstream(service: &'static str, e: impl std::fmt::Display) -> Self {
        Self::Upstream {
            service,
            message: e.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // sqlx messages can leak schema details
            Self::Database(e) => {
                error!(error = %e, "database failure");
                "Internal server error".to_string()
            }
            other => {
                if status.is_server_error() {
                    error!(error = %other, %status, "request failed");
                }
                other.to_string()
            }
        };
        (status, body).into_response()
    }
}
