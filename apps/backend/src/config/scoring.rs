//! Env-driven scoring configuration.

use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

const ORACLE_TIMEOUT_VAR: &str = "SCORING_ORACLE_TIMEOUT_MS";

/// Knobs for the scoring pipeline.
///
/// By default the oracle call has no timeout and a hung backend blocks the
/// phase; setting `SCORING_ORACLE_TIMEOUT_MS` bounds the call and converts
/// an overrun into the ordinary heuristic-fallback path.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub oracle_timeout: Option<Duration>,
}

impl ScoringConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let oracle_timeout = match env::var(ORACLE_TIMEOUT_VAR) {
            Ok(raw) => {
                let ms: u64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
                    name: ORACLE_TIMEOUT_VAR,
                    value: raw,
                })?;
                Some(Duration::from_millis(ms))
            }
            Err(_) => None,
        };
        Ok(Self { oracle_timeout })
    }
}
