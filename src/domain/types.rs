use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Actionable,
    NonActionable,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Actionable => "Actionable",
            Category::NonActionable => "NonActionable",
        }
    }

    /// Exact match against the canonical labels; anything else is `None`.
    pub fn from_canonical(value: &str) -> Option<Self> {
        match value {
            "Actionable" => Some(Category::Actionable),
            "NonActionable" => Some(Category::NonActionable),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification tier, ordered from most to least capable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    RemoteLlm,
    LocalModel,
    Heuristic,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::RemoteLlm => "remote-llm",
            Backend::LocalModel => "local-model",
            Backend::Heuristic => "heuristic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "remote" | "remote-llm" | "openai" => Some(Backend::RemoteLlm),
            "local" | "local-model" | "huggingface" => Some(Backend::LocalModel),
            "heuristic" => Some(Backend::Heuristic),
            _ => None,
        }
    }

    /// Falls back to the heuristic tier for unknown settings.
    pub fn from_setting(value: &str) -> Self {
        Self::parse(value).unwrap_or(Backend::Heuristic)
    }

    /// Next cheaper tier in the cascade.
    pub fn next(&self) -> Option<Self> {
        match self {
            Backend::RemoteLlm => Some(Backend::LocalModel),
            Backend::LocalModel => Some(Backend::Heuristic),
            Backend::Heuristic => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub reason: String,
    pub suggested_reply: String,
    pub classified_by: Backend,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub category: Category,
    pub reason: String,
    pub suggested_reply: String,
    pub preview: String,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    #[serde(rename = "Actionable")]
    pub actionable: u64,
    #[serde(rename = "NonActionable")]
    pub non_actionable: u64,
}

impl Totals {
    pub fn increment(&mut self, category: Category) {
        match category {
            Category::Actionable => self.actionable += 1,
            Category::NonActionable => self.non_actionable += 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HistorySnapshot {
    pub totals: Totals,
    pub recent_history: Vec<HistoryEntry>,
}
