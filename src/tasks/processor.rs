use std::{sync::Arc, time::Instant};

use serde::Serialize;

use crate::{
    classifier::{Normalizer, Orchestrator},
    domain::{
        Backend, ClassificationRequest, ClassificationResult, HistoryEntry, HistorySnapshot,
        InputError, Totals,
    },
    tasks::history::HistoryStore,
};

pub const RECENT_HISTORY_LEN: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    #[serde(flatten)]
    pub result: ClassificationResult,
    #[serde(flatten)]
    pub history: HistorySnapshot,
}

/// Validate, normalize, classify, record.
pub struct EmailProcessor {
    normalizer: Normalizer,
    orchestrator: Orchestrator,
    history: Arc<HistoryStore>,
    backend: Backend,
}

impl EmailProcessor {
    pub fn new(
        normalizer: Normalizer,
        orchestrator: Orchestrator,
        history: Arc<HistoryStore>,
        backend: Backend,
    ) -> Self {
        Self {
            normalizer,
            orchestrator,
            history,
            backend,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub async fn process(&self, raw: &str) -> Result<ProcessOutcome, InputError> {
        let request = ClassificationRequest::new(raw, &self.normalizer)?;
        let started = Instant::now();
        let result = self.orchestrator.classify(&request, self.backend).await;

        tracing::info!(
            target: "pipeline",
            configured = %self.backend,
            classified_by = %result.classified_by,
            category = %result.category,
            chars = request.original_text.chars().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "email classified"
        );

        let (entries, totals) = self.history.record(&result, &request.original_text);
        Ok(ProcessOutcome {
            result,
            history: recent(entries, totals),
        })
    }

    pub fn history(&self) -> HistorySnapshot {
        let (entries, totals) = self.history.snapshot();
        recent(entries, totals)
    }
}

fn recent(mut entries: Vec<HistoryEntry>, totals: Totals) -> HistorySnapshot {
    entries.truncate(RECENT_HISTORY_LEN);
    HistorySnapshot {
        totals,
        recent_history: entries,
    }
}
