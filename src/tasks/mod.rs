pub mod history;
pub mod processor;
