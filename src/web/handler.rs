use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartRejection},
        DefaultBodyLimit, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::timeout::TimeoutLayer;

use crate::{
    domain::{HistorySnapshot, InputError},
    tasks::processor::ProcessOutcome,
    web::{
        types::{AppState, ProcessError},
        upload::extract_text,
    },
};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/process", post(process_email))
        .route("/history", get(history))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .with_state(state)
}

async fn process_email(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessOutcome>, ProcessError> {
    let multipart =
        multipart.map_err(|rejection| InputError::MalformedUpload(rejection.body_text()))?;
    let text = read_submission(multipart).await?;

    let processor = state.processor.clone();
    let outcome = tokio::spawn(async move { processor.process(&text).await })
        .await
        .map_err(|err| ProcessError::Internal(err.to_string()))??;
    Ok(Json(outcome))
}

async fn history(State(state): State<AppState>) -> Json<HistorySnapshot> {
    Json(state.processor.history())
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.processor.backend(),
    }))
}

/// Typed text wins over an uploaded file; an empty result is left for the
/// pipeline to reject.
async fn read_submission(mut multipart: Multipart) -> Result<String, InputError> {
    let mut email_text = String::new();
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| InputError::MalformedUpload(err.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("email_text") => {
                email_text = field
                    .text()
                    .await
                    .map_err(|err| InputError::MalformedUpload(err.body_text()))?;
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| InputError::MalformedUpload(err.body_text()))?;
                if !filename.is_empty() {
                    upload = Some((filename, bytes));
                }
            }
            _ => {}
        }
    }

    if !email_text.trim().is_empty() {
        return Ok(email_text);
    }
    match upload {
        Some((filename, bytes)) => {
            tracing::debug!(target: "http", %filename, size = bytes.len(), "reading upload");
            extract_text(&filename, bytes).await
        }
        None => Ok(String::new()),
    }
}
