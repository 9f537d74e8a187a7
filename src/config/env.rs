use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::domain::Backend;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub classification: ClassificationConfig,
    pub openai: OpenAiConfig,
    pub sentiment: SentimentConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ClassificationConfig {
    pub backend: Backend,
    /// Raw `CLASSIFICATION_METHOD` value, kept to report unrecognized settings.
    pub requested: String,
    /// `false` skips stopword removal during normalization.
    pub stopwords: bool,
}

impl ClassificationConfig {
    pub fn is_recognized(&self) -> bool {
        Backend::parse(&self.requested).is_some()
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub endpoint: Url,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
