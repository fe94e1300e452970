//! Life-pick score normalization.
//!
//! Eligibility for the life pick is judged on each player's own relative
//! spread, not on the oracle's absolute 0..100 scale: a player whose five
//! concepts all score uniformly low (or high) would otherwise be trivially
//! eligible (or ineligible) for every choice.

use crate::domain::rules::{NORM_HI, NORM_LO, NORM_MID, PRIVATE_CONCEPTS};
use crate::domain::state::ThemeScores;

/// Raw (pre-normalization) theme scores for one concept, as produced by the
/// scoring pipeline.
pub type RawThemeScores = (u8, u8);

/// Remap a player's five raw theme-score pairs into the [`NORM_LO`],
/// [`NORM_HI`] band, linearly over the min/max of all ten raw values.
///
/// Degenerate input (all ten values identical) collapses to [`NORM_MID`].
pub fn normalize_theme_scores(
    raw: &[RawThemeScores; PRIVATE_CONCEPTS],
) -> [ThemeScores; PRIVATE_CONCEPTS] {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for &(a, b) in raw {
        min = min.min(a).min(b);
        max = max.max(a).max(b);
    }

    let remap = |v: u8| -> u8 {
        if min == max {
            return NORM_MID;
        }
        let span = (NORM_HI - NORM_LO) as f64;
        let t = (v - min) as f64 / (max - min) as f64;
        (NORM_LO as f64 + t * span).round() as u8
    };

    raw.map(|(a, b)| ThemeScores {
        theme_a: remap(a),
        theme_b: remap(b),
    })
}
