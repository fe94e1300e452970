//! Wire-level message enums. The transport layer (out of scope here)
//! serializes these to and from client connections.

use serde::{Deserialize, Serialize};

use crate::domain::player_view::PrivateView;
use crate::domain::snapshot::GameSnapshot;

/// Events consumed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Join { name: String },
    SubmitPrivateFive { concepts: Vec<String> },
    PickLives { selected: Vec<usize>, secret_index: usize },
    SubmitAttack { concept: String },
    ResetGame,
}

/// Events emitted by the engine.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Public snapshot, broadcast to every connection after each mutation.
    State { game: GameSnapshot },
    /// Private view, sent only to the owning connection.
    PrivateView { view: PrivateView },
    /// Non-fatal rejection, sent only to the requesting connection.
    ErrorMsg { message: String },
}
