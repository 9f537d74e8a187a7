use axum::body::Bytes;

use crate::domain::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

impl DocumentKind {
    pub fn detect(filename: &str) -> Result<Self, InputError> {
        let lowered = filename.trim().to_lowercase();
        if lowered.ends_with(".txt") {
            Ok(DocumentKind::PlainText)
        } else if lowered.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else {
            Err(InputError::UnsupportedFormat(filename.to_string()))
        }
    }
}

/// Pulls text out of an uploaded `.txt` or `.pdf` document.
pub async fn extract_text(filename: &str, bytes: Bytes) -> Result<String, InputError> {
    match DocumentKind::detect(filename)? {
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        DocumentKind::Pdf => {
            // pdf-extract is CPU bound and may panic on hostile input.
            let extracted =
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|err| InputError::Unreadable(err.to_string()))?;
            extracted.map_err(|err| InputError::Unreadable(err.to_string()))
        }
    }
}
