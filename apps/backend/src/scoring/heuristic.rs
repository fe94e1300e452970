//! Deterministic local fallback for pairs the oracle could not score.
//!
//! Character-bigram Jaccard dissimilarity scaled to 0..=100, matching the
//! demo scorer the game shipped with before the language-model judge.

use std::collections::HashSet;

use crate::scoring::cache::canonical;

fn bigrams(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 1 {
        return chars.iter().map(|c| c.to_string()).collect();
    }
    chars
        .windows(2)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

/// Relatedness estimate for one pair: 0 = identical, 100 = disjoint.
/// Two empty texts score the indifferent midpoint.
pub fn bigram_dissimilarity(a: &str, b: &str) -> u8 {
    let set_a = bigrams(&canonical(a));
    let set_b = bigrams(&canonical(b));
    if set_a.is_empty() && set_b.is_empty() {
        return 50;
    }
    let inter = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - inter;
    let sim = inter as f64 / union.max(1) as f64;
    (100.0 * (1.0 - sim)).round() as u8
}
