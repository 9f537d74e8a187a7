use std::sync::Arc;

use crate::domain::{Backend, ClassificationRequest, ClassificationResult};

use super::{Classifier, HeuristicClassifier, TierOutcome};

/// Walks the tiers from the configured entry point down to the heuristic.
pub struct Orchestrator {
    remote: Arc<dyn Classifier>,
    local: Arc<dyn Classifier>,
    heuristic: HeuristicClassifier,
}

impl Orchestrator {
    pub fn new(remote: Arc<dyn Classifier>, local: Arc<dyn Classifier>) -> Self {
        Self {
            remote,
            local,
            heuristic: HeuristicClassifier,
        }
    }

    fn tier(&self, backend: Backend) -> &dyn Classifier {
        match backend {
            Backend::RemoteLlm => self.remote.as_ref(),
            Backend::LocalModel => self.local.as_ref(),
            Backend::Heuristic => &self.heuristic,
        }
    }

    pub async fn classify(
        &self,
        request: &ClassificationRequest,
        configured: Backend,
    ) -> ClassificationResult {
        let mut backend = configured;
        loop {
            let classifier = self.tier(backend);
            match classifier.classify(request).await {
                TierOutcome::Classified(result) => return result,
                TierOutcome::Deferred(reason) => {
                    let Some(next) = backend.next() else {
                        tracing::error!(
                            target: "classifier",
                            tier = %classifier.tier(),
                            %reason,
                            "terminal tier deferred"
                        );
                        return self.heuristic.verdict(request);
                    };
                    tracing::warn!(
                        target: "classifier",
                        tier = %classifier.tier(),
                        %next,
                        %reason,
                        "tier deferred"
                    );
                    backend = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        ai::sentiment::{LabelScore, SentimentModel},
        classifier::{local_model::LocalModelClassifier, normalizer::Normalizer},
        domain::Category,
    };

    struct Deferring {
        tier: Backend,
        calls: AtomicUsize,
    }

    impl Deferring {
        fn new(tier: Backend) -> Arc<Self> {
            Arc::new(Self {
                tier,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Classifier for Deferring {
        fn tier(&self) -> Backend {
            self.tier
        }

        async fn classify(&self, _request: &ClassificationRequest) -> TierOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            TierOutcome::Deferred("unavailable".into())
        }
    }

    struct NeutralSentiment;

    #[async_trait]
    impl SentimentModel for NeutralSentiment {
        async fn predict(&self, _text: &str) -> anyhow::Result<Vec<LabelScore>> {
            Ok(vec![LabelScore {
                label: "3 stars".into(),
                score: 0.9,
            }])
        }
    }

    const EMAILS: &[&str] = &[
        "Promoção especial! Desconto de 50%!",
        "Bom dia, equipe! Gostaria de marcar uma reunião para revisar o cronograma do projeto na próxima semana.",
        "Oi, tudo bem? Como vai você?",
        "Prezado Carlos,\nGostaria de um feedback sobre a proposta enviada na semana passada.\nFico no aguardo.\nAtenciosamente, Marina",
    ];

    fn request(text: &str) -> ClassificationRequest {
        ClassificationRequest::new(text, &Normalizer::default()).unwrap()
    }

    #[tokio::test]
    async fn remote_failure_matches_local_tier() {
        let local = Arc::new(LocalModelClassifier::new(Arc::new(NeutralSentiment)));
        let remote = Deferring::new(Backend::RemoteLlm);
        let orchestrator = Orchestrator::new(remote.clone(), local.clone());

        for text in EMAILS {
            let request = request(text);
            let cascaded = orchestrator.classify(&request, Backend::RemoteLlm).await;
            let TierOutcome::Classified(direct) = local.classify(&request).await else {
                panic!("local tier deferred");
            };
            assert_eq!(cascaded, direct, "{text}");
            assert_eq!(cascaded.classified_by, Backend::LocalModel);
        }
        assert_eq!(remote.calls.load(Ordering::SeqCst), EMAILS.len());
    }

    #[tokio::test]
    async fn double_failure_matches_heuristic() {
        let orchestrator = Orchestrator::new(
            Deferring::new(Backend::RemoteLlm),
            Deferring::new(Backend::LocalModel),
        );

        for text in EMAILS {
            let request = request(text);
            let cascaded = orchestrator.classify(&request, Backend::RemoteLlm).await;
            let TierOutcome::Classified(direct) = HeuristicClassifier.classify(&request).await
            else {
                panic!("heuristic deferred");
            };
            assert_eq!(cascaded, direct, "{text}");
        }
    }

    #[tokio::test]
    async fn entry_point_skips_more_expensive_tiers() {
        let remote = Deferring::new(Backend::RemoteLlm);
        let local = Deferring::new(Backend::LocalModel);
        let orchestrator = Orchestrator::new(remote.clone(), local.clone());

        let result = orchestrator
            .classify(&request(EMAILS[0]), Backend::Heuristic)
            .await;
        assert_eq!(result.category, Category::NonActionable);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
        assert_eq!(local.calls.load(Ordering::SeqCst), 0);

        orchestrator
            .classify(&request(EMAILS[0]), Backend::LocalModel)
            .await;
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
        assert_eq!(local.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn every_backend_resolves_to_its_own_tier() {
        let orchestrator = Orchestrator::new(
            Deferring::new(Backend::RemoteLlm),
            Deferring::new(Backend::LocalModel),
        );
        for backend in [Backend::RemoteLlm, Backend::LocalModel, Backend::Heuristic] {
            assert_eq!(orchestrator.tier(backend).tier(), backend);
        }
    }

    #[tokio::test]
    async fn heuristic_entry_point_runs_the_heuristic_tier() {
        let orchestrator = Orchestrator::new(
            Deferring::new(Backend::RemoteLlm),
            Deferring::new(Backend::LocalModel),
        );
        let request = request(EMAILS[1]);
        let result = orchestrator.classify(&request, Backend::Heuristic).await;
        assert_eq!(result.classified_by, Backend::Heuristic);
        assert_eq!(result, HeuristicClassifier.verdict(&request));
    }
}
