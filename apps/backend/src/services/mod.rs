//! Service layer: per-match orchestration over the pure domain, plus the
//! actor-per-match manager.

pub mod game_flow;
pub mod match_manager;

#[cfg(test)]
mod tests_flow;

pub use game_flow::{MatchFlow, Outbound};
pub use match_manager::{MatchHandle, MatchId, MatchManager};
