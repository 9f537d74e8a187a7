use thiserror::Error;

use crate::classifier::normalizer::Normalizer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Provide the email text or upload a .txt/.pdf file.")]
    Empty,
    #[error("unsupported file format `{0}`; upload a .txt or .pdf file")]
    UnsupportedFormat(String),
    #[error("could not read the uploaded document: {0}")]
    Unreadable(String),
    #[error("malformed upload: {0}")]
    MalformedUpload(String),
}

/// One email on its way through the classifiers. Never stored.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub original_text: String,
    pub normalized_text: String,
}

impl ClassificationRequest {
    pub fn new(raw: &str, normalizer: &Normalizer) -> Result<Self, InputError> {
        let original_text = raw.trim();
        if original_text.is_empty() {
            return Err(InputError::Empty);
        }
        Ok(Self {
            original_text: original_text.to_string(),
            normalized_text: normalizer.normalize(original_text),
        })
    }
}
