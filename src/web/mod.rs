pub mod handler;
pub mod types;
pub mod upload;

pub use handler::router;
pub use types::AppState;
