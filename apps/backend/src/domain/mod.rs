//! Domain layer: pure game logic types and helpers.

pub mod engine;
pub mod normalize;
pub mod player_view;
pub mod resolution;
pub mod rules;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod tests_engine;

// Re-exports for ergonomics
pub use rules::{destroys, pick_eligible};
pub use state::{ConnId, GameState, Phase, Seat};
