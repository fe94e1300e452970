//! Injected scoring capability. Production wiring performs the real call to
//! the language-model judge; tests substitute deterministic stubs.

use async_trait::async_trait;
use thiserror::Error;

/// An ordered pair of concept texts to score. Role matters: `a` is always
/// the queried concept and `b` the reference it is scored against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConceptPair {
    pub a: String,
    pub b: String,
}

impl ConceptPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("scoring backend unavailable: {0}")]
    Unavailable(String),
    #[error("malformed scoring response: {0}")]
    Malformed(String),
}

/// External relatedness judge: text pair → integer score, 0 = deeply
/// related, 100 = unrelated.
///
/// One call covers a whole batch. Partial results are allowed: `None` marks
/// a pair the backend returned no usable value for. Values outside 0..=100
/// are clamped by the pipeline.
#[async_trait]
pub trait ScoreOracle: Send + Sync {
    async fn score_pairs(&self, pairs: &[ConceptPair]) -> Result<Vec<Option<i32>>, OracleError>;
}
