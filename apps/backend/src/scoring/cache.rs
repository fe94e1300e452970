//! Process-lifetime relatedness score cache, shared by every match.
//!
//! Entries are only ever appended, never evicted or rewritten in place, so
//! the map is safe to share across concurrent matches: the same key always
//! resolves to the same or an equally-valid value. Cross-match reuse is
//! intentional; identical concept text is assumed to score stably.

use dashmap::DashMap;
use unicode_normalization::UnicodeNormalization;

use crate::scoring::oracle::ConceptPair;

/// Canonical form of a concept text for cache identity: NFKC, lowercased,
/// all whitespace stripped.
pub fn canonical(text: &str) -> String {
    text.nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Directional cache key: role-a vs role-b stay distinct, and every caller
/// builds pairs with the same role convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn of(pair: &ConceptPair) -> Self {
        Self(canonical(&pair.a), canonical(&pair.b))
    }
}

#[derive(Debug, Default)]
pub struct ScoreCache {
    entries: DashMap<PairKey, u8>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pair: &ConceptPair) -> Option<u8> {
        self.entries.get(&PairKey::of(pair)).map(|v| *v)
    }

    pub fn insert(&self, pair: &ConceptPair, score: u8) {
        self.entries.insert(PairKey::of(pair), score);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
