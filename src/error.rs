use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure surface of the service. Every handler returns this and the
/// axum boundary turns it into a JSON error body; nothing panics.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input rejected before anything was computed or persisted.
    #[error("{0}")]
    Validation(String),

    /// The vision upstream failed or returned an unusable payload.
    /// No record is ever written on this path.
    #[error("{0}")]
    Estimation(String),

    /// The persistence layer failed. Appends and deletes are single
    /// statements, so prior data is never left half-written.
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn estimation(msg: impl Into<String>) -> Self {
        Self::Estimation(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Estimation(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
