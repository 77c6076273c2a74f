pub mod analytics;
pub mod app;
pub mod collector;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

// Re-export key types for convenience
pub use analytics::{StopwordSet, TrendReport};
pub use app::init_tracing;
pub use collector::Collector;
pub use config::Config;
pub use error::{TrackerError, TrackerResult};
pub use models::{ArticleRecord, CollectionResult};
