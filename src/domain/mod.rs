pub mod request;
pub mod types;

pub use request::{ClassificationRequest, InputError};
pub use types::{Backend, Category, ClassificationResult, HistoryEntry, HistorySnapshot, Totals};
