//! End-to-end flow tests with stubbed oracle and theme source.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::state::Phase;
use crate::protocol::{ClientMsg, ServerMsg};
use crate::scoring::{
    fallback_themes, ConceptPair, OracleError, ScoreCache, ScoreOracle, ScoringPipeline,
    ThemeSource,
};
use crate::services::game_flow::{MatchFlow, Outbound};

/// Deterministic judge: attacks prefixed `kill` land in the destruction
/// interval, everything else scores a harmless 70.
struct RuleOracle;

#[async_trait]
impl ScoreOracle for RuleOracle {
    async fn score_pairs(&self, pairs: &[ConceptPair]) -> Result<Vec<Option<i32>>, OracleError> {
        Ok(pairs
            .iter()
            .map(|p| Some(if p.a.starts_with("kill") { 30 } else { 70 }))
            .collect())
    }
}

struct GoodThemes;

#[async_trait]
impl ThemeSource for GoodThemes {
    async fn generate(&self) -> Result<(String, String), OracleError> {
        Ok(("sea".into(), "star".into()))
    }
}

struct FailingThemes;

#[async_trait]
impl ThemeSource for FailingThemes {
    async fn generate(&self) -> Result<(String, String), OracleError> {
        Err(OracleError::Unavailable("generator down".into()))
    }
}

fn flow_with(themes: Arc<dyn ThemeSource>) -> MatchFlow {
    let pipeline = Arc::new(ScoringPipeline::new(
        Arc::new(ScoreCache::new()),
        Arc::new(RuleOracle),
    ));
    MatchFlow::new(pipeline, themes)
}

fn has_state_broadcast(out: &[Outbound]) -> bool {
    out.iter()
        .any(|o| matches!(o, Outbound::Broadcast(ServerMsg::State { .. })))
}

async fn join_three(flow: &mut MatchFlow) {
    for conn in [1, 2, 3] {
        flow.handle(
            conn,
            ClientMsg::Join {
                name: format!("P{conn}"),
            },
        )
        .await;
    }
}

fn five(prefix: &str) -> Vec<String> {
    (0..5).map(|i| format!("{prefix}{i}")).collect()
}

#[tokio::test]
async fn full_match_walks_every_phase() {
    let mut flow = flow_with(Arc::new(GoodThemes));

    join_three(&mut flow).await;
    assert_eq!(flow.state().phase, Phase::PrivateInput);
    assert_eq!(
        flow.state().themes,
        Some(("sea".into(), "star".into()))
    );

    // Life pick opens only after the third player's concepts are scored.
    for conn in [1, 2] {
        flow.handle(
            conn,
            ClientMsg::SubmitPrivateFive {
                concepts: five(&format!("c{conn}-")),
            },
        )
        .await;
        assert_eq!(flow.state().phase, Phase::PrivateInput);
    }
    flow.handle(
        3,
        ClientMsg::SubmitPrivateFive {
            concepts: five("c3-"),
        },
    )
    .await;
    assert_eq!(flow.state().phase, Phase::LifePick);

    // Uniform raw scores normalize to 50/50, all picks eligible.
    for conn in [1, 2] {
        flow.handle(
            conn,
            ClientMsg::PickLives {
                selected: vec![0, 1],
                secret_index: 0,
            },
        )
        .await;
        assert_eq!(flow.state().phase, Phase::LifePick);
    }
    let out = flow
        .handle(
            3,
            ClientMsg::PickLives {
                selected: vec![0, 1, 2],
                secret_index: 2,
            },
        )
        .await;
    assert!(has_state_broadcast(&out));
    assert_eq!(flow.state().phase, Phase::Battle);
    assert_eq!(flow.state().round, 1);

    // Round 1: harmless attacks, exactly one resolution pass.
    for conn in [1, 2, 3] {
        flow.handle(
            conn,
            ClientMsg::SubmitAttack {
                concept: format!("dodge{conn}"),
            },
        )
        .await;
    }
    assert_eq!(flow.state().history.turns.len(), 1);
    assert_eq!(flow.state().phase, Phase::Battle);
    assert_eq!(flow.state().round, 2);
    assert_eq!(flow.state().alive_count(), 3);

    // Round 2: everything lands in the destruction interval.
    for conn in [1, 2, 3] {
        flow.handle(
            conn,
            ClientMsg::SubmitAttack {
                concept: format!("kill{conn}"),
            },
        )
        .await;
    }
    assert_eq!(flow.state().history.turns.len(), 2);
    assert_eq!(flow.state().phase, Phase::Finished);
    assert!(flow.state().alive_count() <= 1);

    // Reset from Finished reopens seat 1.
    flow.handle(9, ClientMsg::ResetGame).await;
    assert_eq!(flow.state().phase, Phase::Waiting);
    assert!(flow.state().history.turns.is_empty());
    flow.handle(50, ClientMsg::Join { name: "new".into() }).await;
    assert_eq!(flow.state().players[0].seat, 1);
}

#[tokio::test]
async fn theme_generator_failure_falls_back_without_stalling() {
    let mut flow = flow_with(Arc::new(FailingThemes));
    join_three(&mut flow).await;
    assert_eq!(flow.state().phase, Phase::PrivateInput);
    assert_eq!(flow.state().themes, Some(fallback_themes()));
}

#[tokio::test]
async fn fourth_join_gets_an_error_message_only() {
    let mut flow = flow_with(Arc::new(GoodThemes));
    join_three(&mut flow).await;

    let out = flow.handle(99, ClientMsg::Join { name: "late".into() }).await;
    assert_eq!(out.len(), 1);
    assert!(matches!(
        &out[0],
        Outbound::To(99, ServerMsg::ErrorMsg { .. })
    ));
    assert_eq!(flow.state().players.len(), 3);
}

#[tokio::test]
async fn out_of_phase_messages_are_dropped_silently() {
    let mut flow = flow_with(Arc::new(GoodThemes));
    join_three(&mut flow).await;

    // Attack during PrivateInput: stale, no broadcast, no error.
    let out = flow
        .handle(1, ClientMsg::SubmitAttack { concept: "zap".into() })
        .await;
    assert!(out.is_empty());
    assert_eq!(flow.state().phase, Phase::PrivateInput);
}

#[tokio::test]
async fn unseated_sender_gets_an_error_message() {
    let mut flow = flow_with(Arc::new(GoodThemes));
    join_three(&mut flow).await;

    let out = flow
        .handle(
            42,
            ClientMsg::SubmitPrivateFive {
                concepts: five("x"),
            },
        )
        .await;
    assert!(matches!(
        &out[0],
        Outbound::To(42, ServerMsg::ErrorMsg { .. })
    ));
}

#[tokio::test]
async fn private_views_go_only_to_their_owners() {
    let mut flow = flow_with(Arc::new(GoodThemes));
    join_three(&mut flow).await;

    let out = flow
        .handle(
            1,
            ClientMsg::SubmitPrivateFive {
                concepts: five("mine-"),
            },
        )
        .await;
    for o in &out {
        if let Outbound::To(conn, ServerMsg::PrivateView { view }) = o {
            assert_eq!(*conn, view.seat as i64);
        }
    }
    // Seat 1's view carries its inputs after submission.
    let seat1_view = out.iter().rev().find_map(|o| match o {
        Outbound::To(1, ServerMsg::PrivateView { view }) => Some(view.clone()),
        _ => None,
    });
    let inputs = seat1_view.unwrap().private_inputs.unwrap();
    assert_eq!(inputs[0], "mine-0");
}

#[tokio::test]
async fn seated_disconnect_resets_and_rebroadcasts() {
    let mut flow = flow_with(Arc::new(GoodThemes));
    join_three(&mut flow).await;

    let out = flow.connection_lost(2);
    assert!(has_state_broadcast(&out));
    assert_eq!(flow.state().phase, Phase::Waiting);
    assert!(flow.state().players.is_empty());

    assert!(flow.connection_lost(99).is_empty());
}
