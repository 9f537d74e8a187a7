use async_trait::async_trait;

use crate::{
    ai::{inference::parse_verdict, OpenAiClient},
    domain::{Backend, ClassificationRequest, ClassificationResult},
};

use super::{Classifier, TierOutcome};

/// Remote LLM tier: one structured-output call, no retries.
pub struct RemoteClassifier {
    client: OpenAiClient,
}

impl RemoteClassifier {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    fn tier(&self) -> Backend {
        Backend::RemoteLlm
    }

    async fn classify(&self, request: &ClassificationRequest) -> TierOutcome {
        if !self.client.has_credentials() {
            return TierOutcome::Deferred("OPENAI_API_KEY is not configured".to_string());
        }

        let content = match self.client.complete(&request.original_text).await {
            Ok(content) => content,
            Err(err) => return TierOutcome::Deferred(format!("remote request failed: {err:#}")),
        };

        match parse_verdict(&content) {
            Ok(verdict) => {
                tracing::debug!(
                    target: "remote",
                    model = self.client.model(),
                    category = %verdict.category,
                    "remote verdict parsed"
                );
                TierOutcome::Classified(ClassificationResult {
                    category: verdict.category,
                    reason: verdict.reason,
                    suggested_reply: verdict.suggested_reply,
                    classified_by: Backend::RemoteLlm,
                })
            }
            Err(err) => {
                let preview: String = content.chars().take(150).collect();
                TierOutcome::Deferred(format!("{err:#}; received: {preview}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Client;
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{classifier::normalizer::Normalizer, config::OpenAiConfig, domain::Category};

    fn classifier(server: &MockServer, key: Option<&str>, timeout: Duration) -> RemoteClassifier {
        let config = OpenAiConfig {
            api_key: key.map(str::to_string),
            model: "gpt-4o-mini".into(),
            base_url: Url::parse(&format!("{}/v1", server.uri())).unwrap(),
            timeout,
        };
        RemoteClassifier::new(OpenAiClient::new(Client::new(), config))
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    fn request() -> ClassificationRequest {
        ClassificationRequest::new(
            "Assunto: Mudança de requisito\n\nA nova regra deve ser implementada até hoje.",
            &Normalizer::default(),
        )
        .unwrap()
    }

    async fn mount(server: &MockServer, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn returns_model_verdict() {
        let server = MockServer::start().await;
        mount(
            &server,
            r#"{"category": "Actionable", "reason": "Requirement change with a same-day deadline", "suggested_reply": "Entendido, implemento a nova regra ainda hoje."}"#,
        )
        .await;

        let outcome = classifier(&server, Some("sk-test"), Duration::from_secs(2))
            .classify(&request())
            .await;
        let TierOutcome::Classified(result) = outcome else {
            panic!("expected a classification");
        };
        assert_eq!(result.category, Category::Actionable);
        assert_eq!(result.classified_by, Backend::RemoteLlm);
        assert!(result.suggested_reply.contains("nova regra"));
    }

    #[tokio::test]
    async fn accepts_fenced_output_and_coerces_unknown_category() {
        let server = MockServer::start().await;
        mount(
            &server,
            "```json\n{\"category\": \"ACTIONABLE\", \"reason\": \"r\", \"suggested_reply\": \"s\"}\n```",
        )
        .await;

        let outcome = classifier(&server, Some("sk-test"), Duration::from_secs(2))
            .classify(&request())
            .await;
        let TierOutcome::Classified(result) = outcome else {
            panic!("expected a classification");
        };
        assert_eq!(result.category, Category::NonActionable);
    }

    #[tokio::test]
    async fn defers_on_prose_output() {
        let server = MockServer::start().await;
        mount(&server, "I think this email is actionable.").await;

        let outcome = classifier(&server, Some("sk-test"), Duration::from_secs(2))
            .classify(&request())
            .await;
        assert!(matches!(outcome, TierOutcome::Deferred(reason) if reason.contains("not a JSON object")));
    }

    #[tokio::test]
    async fn defers_without_calling_when_key_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = classifier(&server, None, Duration::from_secs(2))
            .classify(&request())
            .await;
        assert!(matches!(outcome, TierOutcome::Deferred(_)));
    }

    #[tokio::test]
    async fn defers_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let outcome = classifier(&server, Some("sk-test"), Duration::from_secs(2))
            .classify(&request())
            .await;
        assert!(matches!(outcome, TierOutcome::Deferred(reason) if reason.contains("429")));
    }

    #[tokio::test]
    async fn defers_on_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(r#"{"category": "Actionable"}"#))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let outcome = classifier(&server, Some("sk-test"), Duration::from_millis(100))
            .classify(&request())
            .await;
        assert!(matches!(outcome, TierOutcome::Deferred(_)));
    }
}
