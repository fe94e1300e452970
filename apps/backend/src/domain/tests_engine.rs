//! State machine tests: seating, theme install, private input, attacks,
//! reset and disconnect edges.

use crate::domain::engine::{self, SeatOutcome};
use crate::domain::state::{GameState, Phase, ThemeScores};
use crate::domain::test_state_helpers::{
    battle_state, concepts, conn, life_pick_state, private_input_state, uniform_scores,
};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

#[test]
fn seats_are_assigned_lowest_free_first() {
    let mut state = GameState::new();
    for (i, c) in [100, 200, 300].into_iter().enumerate() {
        match engine::claim_seat(&mut state, c, "").unwrap() {
            SeatOutcome::Seated { seat, .. } => assert_eq!(seat as usize, i + 1),
            other => panic!("expected seat, got {other:?}"),
        }
    }
}

#[test]
fn fourth_join_is_rejected_without_state_change() {
    let mut state = private_input_state();
    let err = engine::claim_seat(&mut state, 999, "late").unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::MatchFull, _)));
    assert_eq!(state.players.len(), 3);
}

#[test]
fn rejoin_is_a_silent_noop() {
    let mut state = GameState::new();
    engine::claim_seat(&mut state, 100, "a").unwrap();
    let outcome = engine::claim_seat(&mut state, 100, "a again").unwrap();
    assert_eq!(outcome, SeatOutcome::AlreadySeated);
    assert_eq!(state.players.len(), 1);
    assert_eq!(state.players[0].name, "a");
}

#[test]
fn blank_name_gets_a_seat_default() {
    let mut state = GameState::new();
    engine::claim_seat(&mut state, 100, "   ").unwrap();
    assert_eq!(state.players[0].name, "Player1");
}

#[test]
fn third_seat_triggers_theme_phase() {
    let mut state = GameState::new();
    engine::claim_seat(&mut state, 1, "a").unwrap();
    engine::claim_seat(&mut state, 2, "b").unwrap();
    assert_eq!(state.phase, Phase::Waiting);

    let outcome = engine::claim_seat(&mut state, 3, "c").unwrap();
    assert_eq!(state.phase, Phase::Theme);
    assert!(matches!(
        outcome,
        SeatOutcome::Seated {
            start_themes: true,
            ..
        }
    ));
}

#[test]
fn install_themes_advances_to_private_input() {
    let mut state = GameState::new();
    for c in [1, 2, 3] {
        engine::claim_seat(&mut state, c, "").unwrap();
    }
    engine::install_themes(&mut state, ("sea".into(), "star".into()));
    assert_eq!(state.phase, Phase::PrivateInput);
    assert_eq!(state.themes, Some(("sea".into(), "star".into())));
}

#[test]
fn stale_theme_install_is_dropped() {
    let mut state = GameState::new();
    engine::install_themes(&mut state, ("sea".into(), "star".into()));
    assert_eq!(state.phase, Phase::Waiting);
    assert!(state.themes.is_none());
}

#[test]
fn private_five_must_be_exactly_five_nonempty() {
    let four: Vec<String> = (0..4).map(|i| format!("c{i}")).collect();
    assert!(matches!(
        engine::validate_private_five(&four),
        Err(DomainError::Validation(ValidationKind::ConceptList, _))
    ));

    let mut with_blank: Vec<String> = (0..5).map(|i| format!("c{i}")).collect();
    with_blank[3] = "   ".into();
    assert!(engine::validate_private_five(&with_blank).is_err());

    let padded: Vec<String> = (0..5).map(|i| format!("  c{i} ")).collect();
    let ok = engine::validate_private_five(&padded).unwrap();
    assert_eq!(ok[0], "c0");
}

#[test]
fn private_inputs_are_immutable_once_recorded() {
    let mut state = private_input_state();
    engine::begin_private_five(&mut state, 1, concepts("a")).unwrap();
    let err = engine::begin_private_five(&mut state, 1, concepts("b")).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::AlreadySubmitted, _)
    ));
}

#[test]
fn private_five_outside_phase_is_a_phase_error() {
    let mut state = GameState::new();
    engine::claim_seat(&mut state, 1, "a").unwrap();
    let err = engine::begin_private_five(&mut state, 1, concepts("a")).unwrap_err();
    assert!(matches!(err, DomainError::PhaseMismatch(_)));
}

#[test]
fn life_pick_opens_only_after_the_last_player_is_scored() {
    let mut state = private_input_state();
    for seat in 1..=2u8 {
        engine::begin_private_five(&mut state, seat, concepts(&format!("c{seat}-"))).unwrap();
        engine::finish_private_five(&mut state, seat, uniform_scores(50));
    }
    assert_eq!(state.phase, Phase::PrivateInput);

    engine::begin_private_five(&mut state, 3, concepts("c3-")).unwrap();
    assert_eq!(state.phase, Phase::PrivateInput);
    engine::finish_private_five(&mut state, 3, uniform_scores(50));
    assert_eq!(state.phase, Phase::LifePick);
    assert_eq!(state.history.private_done, vec![1, 2, 3]);
}

#[test]
fn scores_for_a_superseded_game_are_ignored() {
    let mut state = private_input_state();
    engine::begin_private_five(&mut state, 1, concepts("a")).unwrap();
    engine::reset(&mut state);
    engine::finish_private_five(&mut state, 1, uniform_scores(50));
    assert_eq!(state.phase, Phase::Waiting);
    assert!(state.history.private_done.is_empty());
}

#[test]
fn attack_rules_are_enforced() {
    let mut state = battle_state();

    // Wrong phase is silent-drop territory.
    let mut picking = life_pick_state();
    assert!(matches!(
        engine::record_attack(&mut picking, 1, "zap"),
        Err(DomainError::PhaseMismatch(_))
    ));

    assert!(matches!(
        engine::record_attack(&mut state, 1, "   "),
        Err(DomainError::Validation(ValidationKind::ConceptList, _))
    ));

    assert!(!engine::record_attack(&mut state, 1, "zap").unwrap());
    assert!(matches!(
        engine::record_attack(&mut state, 1, "zap again"),
        Err(DomainError::Validation(ValidationKind::AlreadySubmitted, _))
    ));

    // Eliminated players cannot attack.
    state.player_mut(2).unwrap().alive = false;
    assert!(matches!(
        engine::record_attack(&mut state, 2, "zap"),
        Err(DomainError::Validation(ValidationKind::NotAlive, _))
    ));

    // Last alive submission reports the barrier.
    assert!(engine::record_attack(&mut state, 3, "pow").unwrap());
}

#[test]
fn reset_clears_everything_and_reopens_seat_one() {
    let mut state = battle_state();
    state.phase = Phase::Finished;
    engine::reset(&mut state);
    assert_eq!(state.phase, Phase::Waiting);
    assert!(state.players.is_empty());
    assert!(state.history.turns.is_empty());
    assert!(state.themes.is_none());

    match engine::claim_seat(&mut state, 777, "fresh").unwrap() {
        SeatOutcome::Seated { seat, .. } => assert_eq!(seat, 1),
        other => panic!("expected seat 1, got {other:?}"),
    }
}

#[test]
fn joining_a_finished_match_resets_it_implicitly() {
    let mut state = battle_state();
    state.phase = Phase::Finished;
    match engine::claim_seat(&mut state, 777, "fresh").unwrap() {
        SeatOutcome::Seated { seat, .. } => assert_eq!(seat, 1),
        other => panic!("expected seat, got {other:?}"),
    }
    assert_eq!(state.players.len(), 1);
    assert_eq!(state.phase, Phase::Waiting);
}

#[test]
fn seated_disconnect_resets_the_match() {
    let mut state = battle_state();
    assert!(engine::drop_connection(&mut state, conn(2)));
    assert_eq!(state.phase, Phase::Waiting);
    assert!(state.players.is_empty());
}

#[test]
fn unseated_disconnect_changes_nothing() {
    let mut state = battle_state();
    assert!(!engine::drop_connection(&mut state, 999));
    assert_eq!(state.phase, Phase::Battle);
}

#[test]
fn theme_score_sum_helper() {
    let s = ThemeScores {
        theme_a: 80,
        theme_b: 75,
    };
    assert_eq!(s.sum(), 155);
}
