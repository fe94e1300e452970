//! Single-writer orchestration for one match.
//!
//! One event is processed to completion (including any scoring calls)
//! before the next; the scoring pipeline awaits are the only suspension
//! points. Every successful mutation is followed by a public snapshot
//! broadcast plus a private view per seated connection.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::engine;
use crate::domain::normalize::{normalize_theme_scores, RawThemeScores};
use crate::domain::player_view::private_view;
use crate::domain::resolution::{apply_turn, collect_attacks, collect_targets};
use crate::domain::rules::PRIVATE_CONCEPTS;
use crate::domain::snapshot::snapshot;
use crate::domain::state::{ConnId, GameState, Phase, Seat};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::{ClientMsg, ServerMsg};
use crate::scoring::{fallback_themes, ConceptPair, ScoringPipeline, ThemeSource};

/// A message the transport must deliver.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// To every attached connection.
    Broadcast(ServerMsg),
    /// To one connection.
    To(ConnId, ServerMsg),
}

pub struct MatchFlow {
    state: GameState,
    scoring: Arc<ScoringPipeline>,
    themes: Arc<dyn ThemeSource>,
}

impl MatchFlow {
    pub fn new(scoring: Arc<ScoringPipeline>, themes: Arc<dyn ThemeSource>) -> Self {
        Self {
            state: GameState::new(),
            scoring,
            themes,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Process one client event to completion.
    pub async fn handle(&mut self, conn: ConnId, msg: ClientMsg) -> Vec<Outbound> {
        let result = match msg {
            ClientMsg::Join { name } => self.join(conn, &name).await,
            ClientMsg::SubmitPrivateFive { concepts } => {
                self.submit_private_five(conn, &concepts).await
            }
            ClientMsg::PickLives {
                selected,
                secret_index,
            } => self.pick_lives(conn, &selected, secret_index),
            ClientMsg::SubmitAttack { concept } => self.submit_attack(conn, &concept).await,
            ClientMsg::ResetGame => {
                engine::reset(&mut self.state);
                info!("match reset by client request");
                Ok(self.refresh())
            }
        };

        match result {
            Ok(out) => out,
            Err(DomainError::PhaseMismatch(detail)) => {
                // Stale or late client message; dropped without broadcast.
                debug!(conn, %detail, "dropping out-of-phase message");
                Vec::new()
            }
            Err(err) => vec![Outbound::To(
                conn,
                ServerMsg::ErrorMsg {
                    message: err.to_string(),
                },
            )],
        }
    }

    /// Disconnect edge: a seated connection loss resets the whole match.
    pub fn connection_lost(&mut self, conn: ConnId) -> Vec<Outbound> {
        if engine::drop_connection(&mut self.state, conn) {
            info!(conn, "seated connection lost, match reset");
            self.refresh()
        } else {
            Vec::new()
        }
    }

    /// Current snapshot plus private views, for broadcast.
    pub fn refresh(&self) -> Vec<Outbound> {
        let mut out = vec![Outbound::Broadcast(ServerMsg::State {
            game: snapshot(&self.state),
        })];
        for p in &self.state.players {
            if let Some(view) = private_view(&self.state, p.seat) {
                out.push(Outbound::To(p.conn, ServerMsg::PrivateView { view }));
            }
        }
        out
    }

    async fn join(&mut self, conn: ConnId, name: &str) -> Result<Vec<Outbound>, DomainError> {
        let outcome = engine::claim_seat(&mut self.state, conn, name)?;
        let mut out = self.refresh();
        if let engine::SeatOutcome::Seated { seat, start_themes } = outcome {
            info!(conn, seat, "seat claimed");
            if start_themes {
                let themes = match self.themes.generate().await {
                    Ok(pair) => pair,
                    Err(err) => {
                        warn!(%err, "theme generation failed, using fallback pair");
                        fallback_themes()
                    }
                };
                engine::install_themes(&mut self.state, themes);
                out.extend(self.refresh());
            }
        }
        Ok(out)
    }

    async fn submit_private_five(
        &mut self,
        conn: ConnId,
        concepts: &[String],
    ) -> Result<Vec<Outbound>, DomainError> {
        let seat = self.require_seat(conn)?;
        let concepts = engine::validate_private_five(concepts)?;
        engine::begin_private_five(&mut self.state, seat, concepts.clone())?;
        let mut out = self.refresh();

        let Some((theme_a, theme_b)) = self.state.themes.clone() else {
            return Err(DomainError::phase("themes not assigned yet"));
        };
        // Two theme pairs per concept, concept-major: 10 pairs total.
        let pairs: Vec<ConceptPair> = concepts
            .iter()
            .flat_map(|c| {
                [
                    ConceptPair::new(c.clone(), theme_a.clone()),
                    ConceptPair::new(c.clone(), theme_b.clone()),
                ]
            })
            .collect();
        let scores = self.scoring.score(&pairs).await;

        let mut raw: [RawThemeScores; PRIVATE_CONCEPTS] = [(0, 0); PRIVATE_CONCEPTS];
        for (i, chunk) in scores.chunks(2).enumerate().take(PRIVATE_CONCEPTS) {
            raw[i] = (chunk[0], chunk[1]);
        }
        engine::finish_private_five(&mut self.state, seat, normalize_theme_scores(&raw));
        out.extend(self.refresh());
        Ok(out)
    }

    fn pick_lives(
        &mut self,
        conn: ConnId,
        selected: &[usize],
        secret_index: usize,
    ) -> Result<Vec<Outbound>, DomainError> {
        let seat = self.require_seat(conn)?;
        let outcome = engine::pick_lives(&mut self.state, seat, selected, secret_index)?;
        if let engine::PickOutcome::InstantLoss = outcome {
            info!(seat, "no eligible lives, instant loss");
        }
        let mut out = self.refresh();
        if self.state.phase == Phase::LifeReveal {
            // Transient phase: broadcast it once, then enter battle.
            engine::advance_reveal(&mut self.state);
            out.extend(self.refresh());
        }
        Ok(out)
    }

    async fn submit_attack(
        &mut self,
        conn: ConnId,
        concept: &str,
    ) -> Result<Vec<Outbound>, DomainError> {
        let seat = self.require_seat(conn)?;
        let all_submitted = engine::record_attack(&mut self.state, seat, concept)?;
        let mut out = self.refresh();
        if all_submitted {
            out.extend(self.resolve_turn().await);
        }
        Ok(out)
    }

    /// Score the full attack × target product in one batch and apply it.
    async fn resolve_turn(&mut self) -> Vec<Outbound> {
        let attacks = collect_attacks(&self.state);
        let targets = collect_targets(&self.state);
        let pairs: Vec<ConceptPair> = attacks
            .iter()
            .flat_map(|a| {
                targets
                    .iter()
                    .map(|t| ConceptPair::new(a.concept.clone(), t.concept.clone()))
            })
            .collect();
        let grid = self.scoring.score(&pairs).await;
        apply_turn(&mut self.state, &attacks, &targets, &grid);
        info!(
            round = self.state.round,
            phase = ?self.state.phase,
            "battle turn resolved"
        );
        self.refresh()
    }

    fn require_seat(&self, conn: ConnId) -> Result<Seat, DomainError> {
        self.state
            .seat_of(conn)
            .ok_or_else(|| DomainError::validation(ValidationKind::NotSeated, "not seated"))
    }
}
