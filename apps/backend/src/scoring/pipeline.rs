//! Total scoring pipeline: cache partition, one batched oracle call for all
//! misses, clamping and anti-clustering, heuristic fallback.
//!
//! `score` never fails and never propagates an oracle error; at worst the
//! score quality degrades silently to the local heuristic.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::ScoringConfig;
use crate::scoring::cache::{canonical, PairKey, ScoreCache};
use crate::scoring::heuristic::bigram_dissimilarity;
use crate::scoring::oracle::{ConceptPair, OracleError, ScoreOracle};

pub struct ScoringPipeline {
    cache: Arc<ScoreCache>,
    oracle: Arc<dyn ScoreOracle>,
    /// Optional bound on the oracle call; `None` lets a hung backend block
    /// the phase, which matches the original game's behavior.
    oracle_timeout: Option<Duration>,
}

impl ScoringPipeline {
    pub fn new(cache: Arc<ScoreCache>, oracle: Arc<dyn ScoreOracle>) -> Self {
        Self {
            cache,
            oracle,
            oracle_timeout: None,
        }
    }

    pub fn with_config(
        cache: Arc<ScoreCache>,
        oracle: Arc<dyn ScoreOracle>,
        config: &ScoringConfig,
    ) -> Self {
        Self {
            cache,
            oracle,
            oracle_timeout: config.oracle_timeout,
        }
    }

    /// Score every pair, result parallel to the input.
    ///
    /// Cache hits resolve immediately. All misses go to the oracle in a
    /// single batch call (never one call per pair); oracle-derived values
    /// are clamped, de-clustered, and written back to the cache. Any pair
    /// without an oracle value falls back to the bigram heuristic; fallback
    /// values are not cached, so a later call retries the oracle.
    pub async fn score(&self, pairs: &[ConceptPair]) -> Vec<u8> {
        if pairs.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<Option<u8>> = pairs.iter().map(|p| self.cache.get(p)).collect();

        // Deduplicate misses by cache identity, first occurrence wins.
        let mut miss_index: HashMap<PairKey, usize> = HashMap::new();
        let mut misses: Vec<ConceptPair> = Vec::new();
        for (slot, pair) in pairs.iter().enumerate() {
            if out[slot].is_some() {
                continue;
            }
            let key = PairKey::of(pair);
            miss_index.entry(key).or_insert_with(|| {
                misses.push(pair.clone());
                misses.len() - 1
            });
        }

        let mut resolved: Vec<Option<u8>> = vec![None; misses.len()];
        if !misses.is_empty() {
            match self.call_oracle(&misses).await {
                Ok(values) => {
                    for (i, value) in values.into_iter().take(misses.len()).enumerate() {
                        if let Some(raw) = value {
                            let score = decluster(raw.clamp(0, 100) as u8, &misses[i]);
                            self.cache.insert(&misses[i], score);
                            resolved[i] = Some(score);
                        }
                    }
                }
                Err(err) => {
                    warn!(%err, pairs = misses.len(), "oracle call failed, using heuristic");
                }
            }
        }

        for (slot, pair) in pairs.iter().enumerate() {
            if out[slot].is_some() {
                continue;
            }
            let miss = miss_index[&PairKey::of(pair)];
            out[slot] = Some(resolved[miss].unwrap_or_else(|| {
                debug!(a = %pair.a, b = %pair.b, "heuristic fallback");
                bigram_dissimilarity(&pair.a, &pair.b)
            }));
        }

        out.into_iter().map(|s| s.expect("every slot filled")).collect()
    }

    async fn call_oracle(
        &self,
        misses: &[ConceptPair],
    ) -> Result<Vec<Option<i32>>, OracleError> {
        match self.oracle_timeout {
            Some(limit) => tokio::time::timeout(limit, self.oracle.score_pairs(misses))
                .await
                .unwrap_or_else(|_| {
                    Err(OracleError::Unavailable(format!(
                        "timed out after {limit:?}"
                    )))
                }),
            None => self.oracle.score_pairs(misses).await,
        }
    }
}

/// Nudge exact multiples of 5 off the gridline the judge prompt tends to
/// cluster on. The offset is seeded from the pair's canonical text, so the
/// same pair always lands on the same value.
fn decluster(score: u8, pair: &ConceptPair) -> u8 {
    if score % 5 != 0 {
        return score;
    }
    let seed_text = format!("{}\u{1f}{}", canonical(&pair.a), canonical(&pair.b));
    let mut rng = ChaCha8Rng::seed_from_u64(xxh3_64(seed_text.as_bytes()));
    let delta: u8 = rng.random_range(1..=4);
    if score == 0 {
        score + delta
    } else if score == 100 {
        score - delta
    } else if rng.random_bool(0.5) {
        score + delta
    } else {
        score - delta
    }
}
