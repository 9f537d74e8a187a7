use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::SentimentConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// A multi-class sentiment model returning one probability per label.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn predict(&self, text: &str) -> Result<Vec<LabelScore>>;
}

/// Talks to an inference server speaking the Hugging Face `{"inputs": ...}` protocol.
#[derive(Clone)]
pub struct SentimentClient {
    http: Client,
    config: SentimentConfig,
}

impl SentimentClient {
    pub fn new(http: Client, config: SentimentConfig) -> Self {
        Self { http, config }
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Batched(Vec<Vec<LabelScore>>),
    Single(Vec<LabelScore>),
}

impl PredictResponse {
    fn into_labels(self) -> Vec<LabelScore> {
        match self {
            PredictResponse::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            PredictResponse::Single(labels) => labels,
        }
    }
}

#[async_trait]
impl SentimentModel for SentimentClient {
    async fn predict(&self, text: &str) -> Result<Vec<LabelScore>> {
        let mut request = self
            .http
            .post(self.config.endpoint.clone())
            .timeout(self.config.timeout)
            .json(&PredictRequest { inputs: text });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("sentiment endpoint {} unreachable", self.config.endpoint))?
            .error_for_status()?;

        let parsed: PredictResponse = response
            .json()
            .await
            .context("sentiment endpoint returned an unexpected payload")?;
        Ok(parsed.into_labels())
    }
}
