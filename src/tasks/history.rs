use std::collections::VecDeque;

use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{ClassificationResult, HistoryEntry, Totals};

pub const HISTORY_CAPACITY: usize = 20;
pub const PREVIEW_CHARS: usize = 220;
const ELLIPSIS: &str = "...";

#[derive(Debug, Default)]
struct HistoryState {
    entries: VecDeque<HistoryEntry>,
    totals: Totals,
}

/// Recent classifications (most recent first) and all-time category totals.
#[derive(Debug)]
pub struct HistoryStore {
    capacity: usize,
    state: Mutex<HistoryState>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(HistoryState {
                entries: VecDeque::with_capacity(capacity + 1),
                totals: Totals::default(),
            }),
        }
    }

    /// Stores one result and returns the bounded entry list plus the totals.
    pub fn record(
        &self,
        result: &ClassificationResult,
        preview_source: &str,
    ) -> (Vec<HistoryEntry>, Totals) {
        let entry = HistoryEntry {
            category: result.category,
            reason: result.reason.clone(),
            suggested_reply: result.suggested_reply.clone(),
            preview: preview(preview_source),
            processed_at: Utc::now(),
        };

        let mut state = self.state.lock();
        state.entries.push_front(entry);
        while state.entries.len() > self.capacity {
            state.entries.pop_back();
        }
        state.totals.increment(result.category);

        tracing::debug!(
            target: "history",
            entries = state.entries.len(),
            actionable = state.totals.actionable,
            non_actionable = state.totals.non_actionable,
            "history updated"
        );
        (state.entries.iter().cloned().collect(), state.totals)
    }

    pub fn snapshot(&self) -> (Vec<HistoryEntry>, Totals) {
        let state = self.state.lock();
        (state.entries.iter().cloned().collect(), state.totals)
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        out.push_str(ELLIPSIS);
    }
    out
}
