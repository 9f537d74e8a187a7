pub mod client;
pub mod inference;
pub mod sentiment;

pub use client::OpenAiClient;
pub use sentiment::{SentimentClient, SentimentModel};
