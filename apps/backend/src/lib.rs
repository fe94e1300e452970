#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod protocol;
pub mod scoring;
pub mod services;
pub mod telemetry;


// Re-exports for public API
pub use config::ScoringConfig;
pub use errors::domain::DomainError;
pub use scoring::{ConceptPair, ScoreCache, ScoreOracle, ScoringPipeline, ThemeSource};
pub use services::match_manager::{MatchHandle, MatchId, MatchManager};
pub use telemetry::init_tracing;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
