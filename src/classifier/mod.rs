//! Classification tiers and the cascade that ties them together.

pub mod heuristic;
pub mod local_model;
pub mod normalizer;
pub mod orchestrator;
pub mod remote;
pub mod responder;
pub mod stopwords;

use async_trait::async_trait;

use crate::domain::{Backend, ClassificationRequest, ClassificationResult};

pub use heuristic::HeuristicClassifier;
pub use local_model::LocalModelClassifier;
pub use normalizer::Normalizer;
pub use orchestrator::Orchestrator;
pub use remote::RemoteClassifier;

/// Result of asking one tier. `Deferred` hands the request to the next cheaper tier.
#[derive(Debug, Clone)]
pub enum TierOutcome {
    Classified(ClassificationResult),
    Deferred(String),
}

#[async_trait]
pub trait Classifier: Send + Sync {
    fn tier(&self) -> Backend;

    /// Must not return an error: every failure in the tier's own domain becomes `Deferred`.
    async fn classify(&self, request: &ClassificationRequest) -> TierOutcome;
}
