//! Public snapshot API for observing match state without exposing privates.
//!
//! The snapshot is broadcast to every connection after each mutation; it
//! never contains unsubmitted inputs, unpicked scores, or an undestroyed
//! secret's concept.

use serde::{Deserialize, Serialize};

use crate::domain::state::{GameState, History, Phase, Seat};

/// Public info about a single seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatPublic {
    pub seat: Seat,
    pub name: String,
    pub alive: bool,
    pub life_count: u8,
    /// Remaining public lives, in pick order.
    pub lives_public: Vec<String>,
    /// The secret's concept once destroyed-and-revealed, else `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_revealed: Option<String>,
    /// Whether an undestroyed secret exists (its concept stays hidden).
    pub has_secret: bool,
    pub private_done: bool,
    pub picked: bool,
    pub attack_submitted: bool,
}

/// Top-level public snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub round: u32,
    pub themes: Option<(String, String)>,
    pub seats: Vec<SeatPublic>,
    pub history: History,
}

/// Produce the public snapshot of the current state. Never panics.
pub fn snapshot(state: &GameState) -> GameSnapshot {
    let seats = state
        .players
        .iter()
        .map(|p| {
            let (lives_public, secret_revealed, has_secret) = match &p.life {
                Some(life) => {
                    let revealed = life
                        .secret
                        .as_ref()
                        .filter(|s| s.revealed)
                        .map(|s| s.concept.clone());
                    let has_secret = life
                        .secret
                        .as_ref()
                        .map(|s| !s.destroyed)
                        .unwrap_or(false);
                    (life.normals.clone(), revealed, has_secret)
                }
                None => (Vec::new(), None, false),
            };
            SeatPublic {
                seat: p.seat,
                name: p.name.clone(),
                alive: p.alive,
                life_count: p.life_count,
                lives_public,
                secret_revealed,
                has_secret,
                private_done: p.private_scores.is_some(),
                picked: p.has_picked(),
                attack_submitted: p.attack.is_some(),
            }
        })
        .collect();

    GameSnapshot {
        phase: state.phase,
        round: state.round,
        themes: state.themes.clone(),
        seats,
        history: state.history.clone(),
    }
}
