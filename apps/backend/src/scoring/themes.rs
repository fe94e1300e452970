//! Theme generation capability. The Theme phase asks for one pair per match
//! and substitutes the fixed fallback on any failure; it never stalls.

use async_trait::async_trait;

use crate::scoring::oracle::OracleError;

/// Fallback theme pair used when the generator call fails.
pub const FALLBACK_THEME_A: &str = "ocean";
pub const FALLBACK_THEME_B: &str = "memory";

pub fn fallback_themes() -> (String, String) {
    (FALLBACK_THEME_A.to_string(), FALLBACK_THEME_B.to_string())
}

/// External theme generator: produces the two match-wide reference concepts.
#[async_trait]
pub trait ThemeSource: Send + Sync {
    async fn generate(&self) -> Result<(String, String), OracleError>;
}
