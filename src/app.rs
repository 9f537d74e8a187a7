use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::net::TcpListener;

use crate::{
    ai::{OpenAiClient, SentimentClient},
    classifier::{
        stopwords::Stopwords, LocalModelClassifier, Normalizer, Orchestrator, RemoteClassifier,
    },
    config::AppConfig,
    domain::Backend,
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    tasks::{history::HistoryStore, processor::EmailProcessor},
    web::{self, AppState},
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct EmailTriageApp {
    _paths: ResolvedPaths,
    config: Arc<AppConfig>,
    processor: Arc<EmailProcessor>,
    shutdown: Shutdown,
}

impl EmailTriageApp {
    pub async fn initialize(
        config: AppConfig,
        paths: ResolvedPaths,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("email-triage/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let remote = RemoteClassifier::new(OpenAiClient::new(
            http_client.clone(),
            config.openai.clone(),
        ));
        let local = LocalModelClassifier::new(Arc::new(SentimentClient::new(
            http_client,
            config.sentiment.clone(),
        )));
        let orchestrator = Orchestrator::new(Arc::new(remote), Arc::new(local));

        let backend = config.classification.backend;
        if !config.classification.is_recognized() {
            tracing::warn!(
                target: "config",
                requested = %config.classification.requested,
                fallback = %backend,
                "unrecognized CLASSIFICATION_METHOD"
            );
        }
        if config.openai.api_key.is_none() && backend == Backend::RemoteLlm {
            tracing::warn!(
                target: "config",
                "OPENAI_API_KEY is not set; the remote tier will defer every request"
            );
        }
        let stopwords = if config.classification.stopwords {
            Stopwords::builtin()
        } else {
            Stopwords::empty()
        };
        tracing::info!(
            target: "config",
            %backend,
            stopwords = stopwords.len(),
            openai_model = %config.openai.model,
            sentiment_model = %config.sentiment.model,
            sentiment_endpoint = %config.sentiment.endpoint,
            "classifier configured"
        );

        let processor = Arc::new(EmailProcessor::new(
            Normalizer::new(stopwords),
            orchestrator,
            Arc::new(HistoryStore::new()),
            backend,
        ));

        Ok(Self {
            _paths: paths,
            config,
            processor,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let EmailTriageApp {
            _paths: _,
            config,
            processor,
            shutdown,
        } = self;

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!(target: "http", %addr, "email triage service listening");

        let router = web::router(AppState { processor });
        let server = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.subscribe().notified());
        let mut server = Box::pin(async move { server.await });

        tokio::select! {
            res = &mut server => {
                res.context("http server stopped unexpectedly")?;
                tracing::info!("http server stopped");
                return Ok(());
            }
            _ = shutdown.subscribe().notified() => {
                tracing::info!("shutdown signal received (CTRL+C / SIGTERM)");
            }
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(?err, "http server failed while draining");
            }
            Err(_) => {
                tracing::warn!(
                    target: "http",
                    "in-flight requests did not finish within {:?}; forcing exit",
                    SHUTDOWN_GRACE
                );
            }
        }

        tracing::info!("email triage service stopped");
        Ok(())
    }
}
