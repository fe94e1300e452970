pub mod scoring;

pub use scoring::{ConfigError, ScoringConfig};
