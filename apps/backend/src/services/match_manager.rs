//! Actor-per-match manager.
//!
//! Each match is an independent aggregate behind a single-writer command
//! queue: a dedicated task owns the [`MatchFlow`] and processes commands in
//! arrival order, so no two mutating events ever interleave against the
//! same game. The only cross-match shared resource is the score cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::state::ConnId;
use crate::protocol::{ClientMsg, ServerMsg};
use crate::scoring::{ScoreCache, ScoreOracle, ScoringPipeline, ThemeSource};
use crate::services::game_flow::{MatchFlow, Outbound};

pub type MatchId = i64;

const COMMAND_QUEUE_DEPTH: usize = 64;

enum Command {
    Attach {
        conn: ConnId,
        tx: mpsc::UnboundedSender<ServerMsg>,
    },
    Detach {
        conn: ConnId,
    },
    Client {
        conn: ConnId,
        msg: ClientMsg,
    },
}

/// Cheap handle to one match's command queue.
#[derive(Clone)]
pub struct MatchHandle {
    tx: mpsc::Sender<Command>,
}

impl MatchHandle {
    /// Register a connection's outbound sender. The match immediately sends
    /// it the current state.
    pub async fn attach(&self, conn: ConnId, tx: mpsc::UnboundedSender<ServerMsg>) {
        let _ = self.tx.send(Command::Attach { conn, tx }).await;
    }

    /// Unregister a connection. A seated connection resets the match.
    pub async fn detach(&self, conn: ConnId) {
        let _ = self.tx.send(Command::Detach { conn }).await;
    }

    /// Queue one client event; events are processed strictly in order.
    pub async fn send(&self, conn: ConnId, msg: ClientMsg) {
        let _ = self.tx.send(Command::Client { conn, msg }).await;
    }
}

/// Registry of running matches, sharing one oracle, theme source, and
/// process-wide score cache.
pub struct MatchManager {
    cache: Arc<ScoreCache>,
    oracle: Arc<dyn ScoreOracle>,
    themes: Arc<dyn ThemeSource>,
    matches: DashMap<MatchId, MatchHandle>,
    next_id: AtomicI64,
}

impl MatchManager {
    pub fn new(
        cache: Arc<ScoreCache>,
        oracle: Arc<dyn ScoreOracle>,
        themes: Arc<dyn ThemeSource>,
    ) -> Self {
        Self {
            cache,
            oracle,
            themes,
            matches: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Spawn a new match actor and return its id and handle.
    pub fn create_match(&self) -> (MatchId, MatchHandle) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let pipeline = Arc::new(ScoringPipeline::new(
            self.cache.clone(),
            self.oracle.clone(),
        ));
        let flow = MatchFlow::new(pipeline, self.themes.clone());

        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let handle = MatchHandle { tx };
        self.matches.insert(id, handle.clone());
        tokio::spawn(run_match(id, flow, rx));
        info!(match_id = id, "match actor spawned");
        (id, handle)
    }

    pub fn handle(&self, id: MatchId) -> Option<MatchHandle> {
        self.matches.get(&id).map(|h| h.value().clone())
    }

    /// Drop the registry entry; the actor ends when the last handle goes.
    pub fn remove(&self, id: MatchId) {
        self.matches.remove(&id);
    }
}

async fn run_match(id: MatchId, mut flow: MatchFlow, mut rx: mpsc::Receiver<Command>) {
    let mut conns: HashMap<ConnId, mpsc::UnboundedSender<ServerMsg>> = HashMap::new();

    while let Some(cmd) = rx.recv().await {
        match cmd {
            Command::Attach { conn, tx } => {
                conns.insert(conn, tx);
                dispatch(&mut conns, flow.refresh());
            }
            Command::Detach { conn } => {
                conns.remove(&conn);
                let out = flow.connection_lost(conn);
                dispatch(&mut conns, out);
            }
            Command::Client { conn, msg } => {
                let out = flow.handle(conn, msg).await;
                dispatch(&mut conns, out);
            }
        }
    }
    debug!(match_id = id, "match actor stopped");
}

fn dispatch(conns: &mut HashMap<ConnId, mpsc::UnboundedSender<ServerMsg>>, out: Vec<Outbound>) {
    for msg in out {
        match msg {
            Outbound::Broadcast(m) => {
                conns.retain(|_, tx| tx.send(m.clone()).is_ok());
            }
            Outbound::To(conn, m) => {
                if let Some(tx) = conns.get(&conn) {
                    if tx.send(m).is_err() {
                        conns.remove(&conn);
                    }
                }
            }
        }
    }
}
