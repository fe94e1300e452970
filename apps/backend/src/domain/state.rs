use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::rules::{PRIVATE_CONCEPTS, SEATS};

/// Seat number, 1..=3, fixed for the whole match.
pub type Seat = u8;

/// Stable identity of a client connection, assigned by the transport.
pub type ConnId = i64;

/// Overall match progression phases.
///
/// Strictly linear; the only backward edge is the unconditional reset from
/// any phase to `Waiting`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Seats are being claimed.
    Waiting,
    /// All three seats taken; themes are being generated.
    Theme,
    /// Players submit their five private concepts.
    PrivateInput,
    /// Players choose which scored concepts become lives.
    LifePick,
    /// Transient: picks are complete, no player action occurs here.
    LifeReveal,
    /// Battle rounds; loops on itself until at most one player is alive.
    Battle,
    /// Match over.
    Finished,
}

/// Normalized theme-compatibility scores for one private concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeScores {
    pub theme_a: u8,
    pub theme_b: u8,
}

impl ThemeScores {
    /// Sum used by the life-pick eligibility rule.
    #[inline]
    pub fn sum(&self) -> u16 {
        self.theme_a as u16 + self.theme_b as u16
    }
}

/// A hidden life. Stays hidden until destroyed; destruction and reveal
/// happen in the same atomic step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretLife {
    pub concept: String,
    pub destroyed: bool,
    pub revealed: bool,
}

/// A player's picked lives. Set exactly once during LifePick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Life {
    /// Public lives, in pick order. Destroyed normals are removed.
    pub normals: Vec<String>,
    pub secret: Option<SecretLife>,
}

impl Life {
    /// Intact lives: remaining normals plus an undestroyed secret.
    pub fn intact(&self) -> u8 {
        let secret = match &self.secret {
            Some(s) if !s.destroyed => 1,
            _ => 0,
        };
        self.normals.len() as u8 + secret
    }
}

/// One seated player.
#[derive(Debug, Clone)]
pub struct Player {
    pub seat: Seat,
    pub conn: ConnId,
    pub name: String,
    pub alive: bool,
    /// Exactly five concepts once submitted, immutable thereafter.
    pub private_inputs: Option<[String; PRIVATE_CONCEPTS]>,
    /// Normalized scores parallel to `private_inputs`.
    pub private_scores: Option<[ThemeScores; PRIVATE_CONCEPTS]>,
    pub life: Option<Life>,
    /// Cached intact-life count, kept in sync by the engine.
    pub life_count: u8,
    /// Current-round attack, cleared when the turn resolves.
    pub attack: Option<String>,
}

impl Player {
    pub fn new(seat: Seat, conn: ConnId, name: String) -> Self {
        Self {
            seat,
            conn,
            name,
            alive: true,
            private_inputs: None,
            private_scores: None,
            life: None,
            life_count: 0,
            attack: None,
        }
    }

    /// Whether this player has completed the life pick (instant losses count).
    pub fn has_picked(&self) -> bool {
        self.life.is_some()
    }
}

/// One attack submitted in a battle round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackEntry {
    pub seat: Seat,
    pub concept: String,
}

/// A life removed during turn resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyedLife {
    pub owner: Seat,
    pub concept: String,
    /// Attacker whose concept destroyed it (first destroying hit).
    pub by: Seat,
    pub secret: bool,
}

/// A secret uncovered during turn resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedSecret {
    pub owner: Seat,
    pub concept: String,
}

/// One cell of the attack × target score grid, kept for audit/UI only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub attacker: Seat,
    pub owner: Seat,
    pub target: String,
    pub secret: bool,
    pub score: u8,
}

/// Immutable record of one resolved battle round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub round: u32,
    pub attacks: Vec<AttackEntry>,
    pub destroyed: Vec<DestroyedLife>,
    pub revealed: Vec<RevealedSecret>,
    pub grid: Vec<ScoreDetail>,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

/// Append-only public history of the match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    /// Seats that completed private input, in completion order.
    pub private_done: Vec<Seat>,
    /// Seats that completed the life pick, in completion order.
    pub picks_done: Vec<Seat>,
    pub turns: Vec<TurnRecord>,
}

/// Entire match container, sufficient for pure domain operations.
///
/// There is exactly one authoritative `GameState` per match; a reset
/// discards it and allocates a fresh one.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: Phase,
    /// Battle round counter; 0 until the first battle round starts.
    pub round: u32,
    /// Assigned once per match when the Theme phase completes.
    pub themes: Option<(String, String)>,
    /// Seated players in seat order; at most [`SEATS`] entries.
    pub players: Vec<Player>,
    pub history: History,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Waiting,
            round: 0,
            themes: None,
            players: Vec::with_capacity(SEATS),
            history: History::default(),
        }
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }

    pub fn player_mut(&mut self, seat: Seat) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.seat == seat)
    }

    /// Seat held by a connection, if any.
    pub fn seat_of(&self, conn: ConnId) -> Option<Seat> {
        self.players.iter().find(|p| p.conn == conn).map(|p| p.seat)
    }

    pub fn all_seated(&self) -> bool {
        self.players.len() == SEATS
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
