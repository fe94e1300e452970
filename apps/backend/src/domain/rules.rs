//! Numeric contract constants. These values are part of the game contract
//! and must not drift.

/// Exactly three seats per match.
pub const SEATS: usize = 3;

/// Each player submits exactly five private concepts.
pub const PRIVATE_CONCEPTS: usize = 5;

/// A life pick selects between one and three concepts.
pub const MAX_LIVES: usize = 3;

/// Destruction interval lower bound (inclusive).
pub const DESTROY_MIN: u8 = 10;
/// Destruction interval upper bound (exclusive).
pub const DESTROY_MAX: u8 = 50;

/// A selected concept is pick-eligible while its two normalized theme
/// scores sum to at most this limit.
pub const ELIGIBLE_SUM_LIMIT: u16 = 150;

/// Normalization band for private theme scores.
pub const NORM_LO: u8 = 15;
pub const NORM_HI: u8 = 85;
/// Collapse point when all ten raw scores are identical.
pub const NORM_MID: u8 = 50;

/// Half-open destruction test: score 10 destroys, score 50 does not.
#[inline]
pub fn destroys(score: u8) -> bool {
    (DESTROY_MIN..DESTROY_MAX).contains(&score)
}

/// Eligibility test for a life pick, on the sum of both normalized
/// theme scores.
#[inline]
pub fn pick_eligible(score_sum: u16) -> bool {
    score_sum <= ELIGIBLE_SUM_LIMIT
}
