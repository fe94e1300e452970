//! Per-player private view: what only the owning connection may see.

use serde::{Deserialize, Serialize};

use crate::domain::state::{GameState, Seat, SecretLife, ThemeScores};

/// A player's own life detail, secret included regardless of reveal state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LifeMine {
    pub normals: Vec<String>,
    pub secret: Option<SecretLife>,
}

/// Private view sent only to the owning connection after each mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrivateView {
    pub seat: Seat,
    pub private_inputs: Option<Vec<String>>,
    pub private_scores: Option<Vec<ThemeScores>>,
    pub life_mine: Option<LifeMine>,
}

/// Build the private view for `seat`, if seated.
pub fn private_view(state: &GameState, seat: Seat) -> Option<PrivateView> {
    let p = state.player(seat)?;
    Some(PrivateView {
        seat,
        private_inputs: p.private_inputs.as_ref().map(|v| v.to_vec()),
        private_scores: p.private_scores.as_ref().map(|v| v.to_vec()),
        life_mine: p.life.as_ref().map(|life| LifeMine {
            normals: life.normals.clone(),
            secret: life.secret.clone(),
        }),
    })
}
