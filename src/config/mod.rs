pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, OpenAiConfig, SentimentConfig};
pub use loader::load_config;
