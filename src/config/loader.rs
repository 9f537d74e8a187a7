use std::{env, time::Duration};

use url::Url;

use super::env::{
    AppConfig, ClassificationConfig, ConfigError, DirectoryConfig, LoggingConfig, OpenAiConfig,
    SentimentConfig, ServerConfig,
};
use crate::{ai::inference::DEFAULT_OPENAI_BASE_URL, domain::Backend};

const DEFAULT_SENTIMENT_ENDPOINT: &str = "http://127.0.0.1:8080/predict";
const DEFAULT_SENTIMENT_MODEL: &str = "nlptown/bert-base-multilingual-uncased-sentiment";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let server = ServerConfig {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", var("PORT"), 5000)?,
        };

        let requested = var("CLASSIFICATION_METHOD").unwrap_or_else(|| "heuristic".to_string());
        let classification = ClassificationConfig {
            backend: Backend::from_setting(&requested),
            requested,
            stopwords: parse_or("NORMALIZER_STOPWORDS", var("NORMALIZER_STOPWORDS"), true)?,
        };

        let openai = OpenAiConfig {
            api_key: var("OPENAI_API_KEY"),
            model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            base_url: parse_url(
                "OPENAI_BASE_URL",
                var("OPENAI_BASE_URL").as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL),
            )?,
            timeout: Duration::from_millis(parse_or(
                "REMOTE_TIMEOUT_MS",
                var("REMOTE_TIMEOUT_MS"),
                30_000,
            )?),
        };

        let sentiment = SentimentConfig {
            endpoint: parse_url(
                "SENTIMENT_ENDPOINT",
                var("SENTIMENT_ENDPOINT")
                    .as_deref()
                    .unwrap_or(DEFAULT_SENTIMENT_ENDPOINT),
            )?,
            model: var("SENTIMENT_MODEL").unwrap_or_else(|| DEFAULT_SENTIMENT_MODEL.to_string()),
            api_token: var("HF_API_TOKEN"),
            timeout: Duration::from_millis(parse_or(
                "SENTIMENT_TIMEOUT_MS",
                var("SENTIMENT_TIMEOUT_MS"),
                10_000,
            )?),
        };

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            server,
            classification,
            openai,
            sentiment,
            directories,
            logging,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
