//! Battle turn resolution.
//!
//! The service layer collects the round's attacks and intact life targets,
//! scores the full attack × target product in one pipeline batch, and hands
//! the grid back to [`apply_turn`], which applies destructions and the win
//! condition as one pure mutation.

use std::collections::HashSet;

use time::OffsetDateTime;

use crate::domain::rules::destroys;
use crate::domain::state::{
    AttackEntry, DestroyedLife, GameState, Phase, RevealedSecret, ScoreDetail, Seat, TurnRecord,
};

/// Position of a life within its owner's pick, fixed at collection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSlot {
    Normal(usize),
    Secret,
}

/// One still-intact life, addressable for destruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeTarget {
    pub owner: Seat,
    pub slot: TargetSlot,
    pub concept: String,
    pub secret: bool,
}

/// The round's attacks, alive players in seat order.
pub fn collect_attacks(state: &GameState) -> Vec<AttackEntry> {
    state
        .players
        .iter()
        .filter(|p| p.alive)
        .filter_map(|p| {
            p.attack.as_ref().map(|concept| AttackEntry {
                seat: p.seat,
                concept: concept.clone(),
            })
        })
        .collect()
}

/// Every still-intact life of every alive player, in seat order.
///
/// A secret stays targetable until destroyed regardless of reveal state;
/// destroyed lives are never targets again.
pub fn collect_targets(state: &GameState) -> Vec<LifeTarget> {
    let mut targets = Vec::new();
    for p in state.players.iter().filter(|p| p.alive) {
        let Some(life) = &p.life else { continue };
        for (i, concept) in life.normals.iter().enumerate() {
            targets.push(LifeTarget {
                owner: p.seat,
                slot: TargetSlot::Normal(i),
                concept: concept.clone(),
                secret: false,
            });
        }
        if let Some(secret) = &life.secret {
            if !secret.destroyed {
                targets.push(LifeTarget {
                    owner: p.seat,
                    slot: TargetSlot::Secret,
                    concept: secret.concept.clone(),
                    secret: true,
                });
            }
        }
    }
    targets
}

/// Apply one resolved battle round.
///
/// `grid` is the attack × target score matrix, row-major by attacker, as
/// returned by the scoring pipeline for the same `attacks`/`targets` order.
/// A target is destroyed by the first attack in iteration order whose score
/// falls in the destruction interval; later hits on the same target are
/// no-ops. Destroying a secret reveals it in the same step.
pub fn apply_turn(
    state: &mut GameState,
    attacks: &[AttackEntry],
    targets: &[LifeTarget],
    grid: &[u8],
) {
    debug_assert_eq!(grid.len(), attacks.len() * targets.len());

    let mut grid_detail = Vec::with_capacity(grid.len());
    let mut destroyed: Vec<DestroyedLife> = Vec::new();
    let mut revealed: Vec<RevealedSecret> = Vec::new();
    let mut hit: HashSet<(Seat, TargetSlot)> = HashSet::new();

    for (ai, attack) in attacks.iter().enumerate() {
        for (ti, target) in targets.iter().enumerate() {
            let score = grid[ai * targets.len() + ti];
            grid_detail.push(ScoreDetail {
                attacker: attack.seat,
                owner: target.owner,
                target: target.concept.clone(),
                secret: target.secret,
                score,
            });
            if destroys(score) && hit.insert((target.owner, target.slot)) {
                destroyed.push(DestroyedLife {
                    owner: target.owner,
                    concept: target.concept.clone(),
                    by: attack.seat,
                    secret: target.secret,
                });
                if target.secret {
                    revealed.push(RevealedSecret {
                        owner: target.owner,
                        concept: target.concept.clone(),
                    });
                }
            }
        }
    }

    for player in state.players.iter_mut() {
        let seat = player.seat;
        if let Some(life) = player.life.as_mut() {
            let mut dead_normals: Vec<usize> = hit
                .iter()
                .filter_map(|&(owner, slot)| match slot {
                    TargetSlot::Normal(i) if owner == seat => Some(i),
                    _ => None,
                })
                .collect();
            dead_normals.sort_unstable();
            for i in dead_normals.into_iter().rev() {
                life.normals.remove(i);
            }
            if hit.contains(&(seat, TargetSlot::Secret)) {
                if let Some(secret) = life.secret.as_mut() {
                    secret.destroyed = true;
                    secret.revealed = true;
                }
            }
            player.life_count = life.intact();
            if player.alive && player.life_count == 0 {
                player.alive = false;
            }
        }
        player.attack = None;
    }

    state.history.turns.push(TurnRecord {
        round: state.round,
        attacks: attacks.to_vec(),
        destroyed,
        revealed,
        grid: grid_detail,
        recorded_at: OffsetDateTime::now_utc(),
    });

    if state.alive_count() <= 1 {
        state.phase = Phase::Finished;
    } else {
        state.round += 1;
    }
}
