//! Relatedness scoring: oracle capability, process-wide cache, the total
//! scoring pipeline, and the local fallback heuristic.

pub mod cache;
pub mod heuristic;
pub mod oracle;
pub mod pipeline;
pub mod themes;

pub use cache::ScoreCache;
pub use oracle::{ConceptPair, OracleError, ScoreOracle};
pub use pipeline::ScoringPipeline;
pub use themes::{fallback_themes, ThemeSource};
