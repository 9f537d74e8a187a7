use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{domain::InputError, tasks::processor::EmailProcessor};

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<EmailProcessor>,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("processing failed: {0}")]
    Internal(String),
}

impl ProcessError {
    fn status(&self) -> StatusCode {
        match self {
            ProcessError::Input(_) => StatusCode::BAD_REQUEST,
            ProcessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ProcessError::Input(err) => {
                tracing::info!(target: "http", error = %err, "request rejected");
            }
            ProcessError::Internal(detail) => {
                tracing::error!(target: "http", %detail, "request failed");
            }
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_kinds_to_status_codes() {
        assert_eq!(
            ProcessError::from(InputError::Empty).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        let internal = ProcessError::Internal("task panicked".into());
        assert_eq!(internal.to_string(), "processing failed: task panicked");
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
