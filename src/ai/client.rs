use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::OpenAiConfig;

use super::inference::{build_request, parse_response};

/// OpenAI-compatible chat-completions client.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(http: Client, config: OpenAiConfig) -> Self {
        Self { http, config }
    }

    pub fn has_credentials(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Sends the email and returns the raw message content.
    pub async fn complete(&self, email: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .context("OPENAI_API_KEY must be configured for the remote tier")?;

        let request = build_request(self.config.model.clone(), email);
        let response = self
            .http
            .post(self.chat_completions_url())
            .bearer_auth(api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        parse_response(response).await
    }
}
