//! Phase state machine operations.
//!
//! Every function here is a pure mutation over [`GameState`]: validation
//! against the current phase and player state, then the state change, then
//! any phase transition the change triggers. External scoring happens in the
//! service layer between `begin_*` and `finish_*` pairs; the triggering
//! input is always recorded before the suspension point.

use tracing::debug;

use crate::domain::rules::{pick_eligible, MAX_LIVES, PRIVATE_CONCEPTS, SEATS};
use crate::domain::state::{ConnId, GameState, Life, Phase, Player, Seat, SecretLife, ThemeScores};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Result of a join attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatOutcome {
    /// A seat was assigned. `start_themes` is set when this join filled the
    /// last seat and the Theme phase must now fetch a theme pair.
    Seated { seat: Seat, start_themes: bool },
    /// The connection already holds a seat; the caller re-broadcasts state.
    AlreadySeated,
}

/// Result of a life pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked { life_count: u8 },
    /// No selected concept survived the eligibility filter. A valid terminal
    /// branch for the player, not an error.
    InstantLoss,
}

/// Claim the lowest free seat for `conn`.
///
/// Joining a finished match implicitly resets it first. Joining while
/// already seated is a silent no-op.
pub fn claim_seat(
    state: &mut GameState,
    conn: ConnId,
    name: &str,
) -> Result<SeatOutcome, DomainError> {
    if state.phase == Phase::Finished {
        *state = GameState::new();
    }
    if state.seat_of(conn).is_some() {
        return Ok(SeatOutcome::AlreadySeated);
    }
    if state.all_seated() {
        return Err(DomainError::conflict(
            ConflictKind::MatchFull,
            "all seats are occupied",
        ));
    }

    let taken: Vec<Seat> = state.players.iter().map(|p| p.seat).collect();
    let seat = (1..=SEATS as Seat)
        .find(|s| !taken.contains(s))
        .expect("free seat exists when not all seated");

    let name = name.trim();
    let name = if name.is_empty() {
        format!("Player{seat}")
    } else {
        name.to_string()
    };
    state.players.push(Player::new(seat, conn, name));
    state.players.sort_by_key(|p| p.seat);

    let start_themes = state.phase == Phase::Waiting && state.all_seated();
    if start_themes {
        state.phase = Phase::Theme;
    }
    Ok(SeatOutcome::Seated { seat, start_themes })
}

/// Install the match themes and advance Theme → PrivateInput.
///
/// The caller supplies either the generated pair or the fixed fallback; the
/// Theme phase never stalls on a failed generator call. A stale call (phase
/// moved on, e.g. a reset raced the generator) is dropped.
pub fn install_themes(state: &mut GameState, themes: (String, String)) {
    if state.phase != Phase::Theme {
        debug!(phase = ?state.phase, "dropping theme pair for superseded game");
        return;
    }
    state.themes = Some(themes);
    state.phase = Phase::PrivateInput;
}

/// Validate a raw private-five submission into exactly five trimmed,
/// non-empty concepts.
pub fn validate_private_five(
    list: &[String],
) -> Result<[String; PRIVATE_CONCEPTS], DomainError> {
    if list.len() != PRIVATE_CONCEPTS {
        return Err(DomainError::validation(
            ValidationKind::ConceptList,
            format!("expected {PRIVATE_CONCEPTS} concepts, got {}", list.len()),
        ));
    }
    let mut out: Vec<String> = Vec::with_capacity(PRIVATE_CONCEPTS);
    for raw in list {
        let t = raw.trim();
        if t.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::ConceptList,
                "empty concept",
            ));
        }
        out.push(t.to_string());
    }
    Ok(out.try_into().expect("length checked"))
}

/// Record a player's five private concepts, before they are scored.
///
/// Inputs are immutable once recorded; a second submission is rejected.
pub fn begin_private_five(
    state: &mut GameState,
    seat: Seat,
    concepts: [String; PRIVATE_CONCEPTS],
) -> Result<(), DomainError> {
    if state.phase != Phase::PrivateInput {
        return Err(DomainError::phase(format!(
            "private input not accepted in {:?}",
            state.phase
        )));
    }
    let player = state
        .player_mut(seat)
        .ok_or_else(|| DomainError::validation(ValidationKind::NotSeated, "no such seat"))?;
    if player.private_inputs.is_some() {
        return Err(DomainError::validation(
            ValidationKind::AlreadySubmitted,
            "private concepts already submitted",
        ));
    }
    player.private_inputs = Some(concepts);
    Ok(())
}

/// Attach normalized scores to a previously recorded private five and
/// evaluate the PrivateInput → LifePick barrier.
///
/// Silently drops a result that arrives for a superseded game (the state
/// was reset while the scoring call was outstanding).
pub fn finish_private_five(
    state: &mut GameState,
    seat: Seat,
    scores: [ThemeScores; PRIVATE_CONCEPTS],
) {
    if state.phase != Phase::PrivateInput {
        debug!(seat, phase = ?state.phase, "dropping private scores for superseded game");
        return;
    }
    let Some(player) = state.player_mut(seat) else {
        return;
    };
    if player.private_inputs.is_none() || player.private_scores.is_some() {
        return;
    }
    player.private_scores = Some(scores);
    state.history.private_done.push(seat);

    let all_scored =
        state.all_seated() && state.players.iter().all(|p| p.private_scores.is_some());
    if all_scored {
        state.phase = Phase::LifePick;
    }
}

/// Apply a life pick for `seat`.
///
/// `selected` indexes the player's five scored concepts; `secret_index`
/// addresses a position within `selected`. Selections whose theme-score sum
/// exceeds the eligibility limit are silently dropped. The secret is then
/// taken from the *filtered* sequence at `secret_index` — the pre-filter
/// index is applied unshifted, so a filtered-out earlier selection shifts
/// which concept ends up secret, and an index off the end of the filtered
/// set yields no secret at all. This mirrors the original game's behavior
/// and is covered by tests rather than corrected.
pub fn pick_lives(
    state: &mut GameState,
    seat: Seat,
    selected: &[usize],
    secret_index: usize,
) -> Result<PickOutcome, DomainError> {
    if state.phase != Phase::LifePick {
        return Err(DomainError::phase(format!(
            "life pick not accepted in {:?}",
            state.phase
        )));
    }
    let player = state
        .player_mut(seat)
        .ok_or_else(|| DomainError::validation(ValidationKind::NotSeated, "no such seat"))?;
    if player.has_picked() {
        return Err(DomainError::validation(
            ValidationKind::AlreadySubmitted,
            "lives already picked",
        ));
    }
    if selected.is_empty() || selected.len() > MAX_LIVES {
        return Err(DomainError::validation(
            ValidationKind::PickRange,
            format!("must select 1..={MAX_LIVES} concepts"),
        ));
    }
    if selected.iter().any(|&i| i >= PRIVATE_CONCEPTS) {
        return Err(DomainError::validation(
            ValidationKind::PickRange,
            "selection index out of range",
        ));
    }
    if (1..selected.len()).any(|i| selected[i..].contains(&selected[i - 1])) {
        return Err(DomainError::validation(
            ValidationKind::PickRange,
            "duplicate selection index",
        ));
    }
    if secret_index >= selected.len() {
        return Err(DomainError::validation(
            ValidationKind::PickRange,
            "secret index out of range",
        ));
    }
    let (inputs, scores) = match (&player.private_inputs, &player.private_scores) {
        (Some(i), Some(s)) => (i.clone(), *s),
        _ => {
            return Err(DomainError::validation(
                ValidationKind::PickRange,
                "no scored concepts to pick from",
            ))
        }
    };

    let eligible: Vec<usize> = selected
        .iter()
        .copied()
        .filter(|&i| pick_eligible(scores[i].sum()))
        .collect();

    let outcome = if eligible.is_empty() {
        player.life = Some(Life::default());
        player.life_count = 0;
        player.alive = false;
        PickOutcome::InstantLoss
    } else {
        let concepts: Vec<String> = eligible.iter().map(|&i| inputs[i].clone()).collect();
        let mut normals = Vec::with_capacity(concepts.len());
        let mut secret = None;
        for (pos, concept) in concepts.into_iter().enumerate() {
            if pos == secret_index {
                secret = Some(SecretLife {
                    concept,
                    destroyed: false,
                    revealed: false,
                });
            } else {
                normals.push(concept);
            }
        }
        let life = Life { normals, secret };
        player.life_count = life.intact();
        player.life = Some(life);
        PickOutcome::Picked {
            life_count: eligible.len() as u8,
        }
    };
    state.history.picks_done.push(seat);

    if state.players.iter().all(|p| p.has_picked()) {
        state.phase = Phase::LifeReveal;
    }
    Ok(outcome)
}

/// Advance the transient LifeReveal phase into battle.
///
/// No player action occurs in LifeReveal; the service broadcasts it once and
/// calls this immediately. If the picks left at most one player alive the
/// match is over before any attack is thrown.
pub fn advance_reveal(state: &mut GameState) {
    if state.phase != Phase::LifeReveal {
        return;
    }
    if state.alive_count() <= 1 {
        state.phase = Phase::Finished;
        return;
    }
    state.phase = Phase::Battle;
    state.round = 1;
}

/// Record an attack for the current battle round.
///
/// Returns `true` when every alive player has now submitted and the turn
/// must resolve.
pub fn record_attack(
    state: &mut GameState,
    seat: Seat,
    concept: &str,
) -> Result<bool, DomainError> {
    if state.phase != Phase::Battle {
        return Err(DomainError::phase(format!(
            "attack not accepted in {:?}",
            state.phase
        )));
    }
    let player = state
        .player_mut(seat)
        .ok_or_else(|| DomainError::validation(ValidationKind::NotSeated, "no such seat"))?;
    if !player.alive {
        return Err(DomainError::validation(
            ValidationKind::NotAlive,
            "eliminated players cannot attack",
        ));
    }
    let concept = concept.trim();
    if concept.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::ConceptList,
            "empty attack concept",
        ));
    }
    if player.attack.is_some() {
        return Err(DomainError::validation(
            ValidationKind::AlreadySubmitted,
            "attack already submitted this round",
        ));
    }
    player.attack = Some(concept.to_string());

    Ok(state
        .players
        .iter()
        .filter(|p| p.alive)
        .all(|p| p.attack.is_some()))
}

/// Unconditional reset to a fresh match, from any phase.
pub fn reset(state: &mut GameState) {
    *state = GameState::new();
}

/// Disconnect edge: losing any seated connection resets the whole match.
///
/// Returns `true` when the connection was seated and the reset happened.
pub fn drop_connection(state: &mut GameState, conn: ConnId) -> bool {
    if state.seat_of(conn).is_none() {
        return false;
    }
    *state = GameState::new();
    true
}
