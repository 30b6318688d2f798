//! Game flow orchestration service - the single mutation path for a room.
//!
//! Every state-mutating entry point takes an exclusive lease on the room,
//! runs pure resolution logic over the leased copy, commits all-or-nothing
//! and only then flushes broadcast events. A validation rejection drops the
//! lease uncommitted, so a refused action can never leave a partial ballot
//! or phase-list mutation behind. The terminal signal raised by the win
//! evaluator is caught here, exactly once: the boundary finalizes the
//! result, resets the room for replay and commits both together.

mod lifecycle;
mod player_actions;
mod scheduler;


pub use lifecycle::{RoomSpec, RoomView, SeatView};
pub use player_actions::{ElectAction, PotionChoice};
pub use scheduler::AdvanceOutcome;

use std::sync::Arc;

use tracing::info;

use crate::broadcast::{Broadcaster, GameEvent, Outbox};
use crate::config::EngineConfig;
use crate::domain::catalog::{GameStatus, GroupType, StatusCode};
use crate::domain::participant::UserId;
use crate::domain::room::Room;
use crate::error::EngineError;
use crate::errors::domain::{DomainError, GameFinished};
use crate::state::app_state::AppState;
use crate::store::RoomStore;

/// Game flow service - all mutations to a room's game state go through here.
pub struct GameFlowService {
    store: Arc<dyn RoomStore>,
    broadcaster: Arc<dyn Broadcaster>,
    config: EngineConfig,
}

/// Player-facing confirmation of an accepted request.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReply {
    pub code: StatusCode,
    pub message: String,
    /// Set when this request ended the game.
    pub finished: Option<GroupType>,
}

impl ActionReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::Ok,
            message: message.into(),
            finished: None,
        }
    }

    pub fn with_code(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            finished: None,
        }
    }
}

/// Append a public history line and queue its broadcast.
pub(super) fn note(room: &mut Room, out: &mut Outbox, line: String) {
    room.history.push(line.clone());
    out.push(GameEvent::History { line });
}

impl GameFlowService {
    pub fn new(state: AppState) -> Self {
        Self {
            store: state.store,
            broadcaster: state.broadcaster,
            config: state.config,
        }
    }

    /// Run one locked mutation against the room the user is seated in.
    ///
    /// Commit-then-flush on success; rollback (drop the lease) on
    /// rejection; catch-finalize-reset on the terminal signal.
    pub(super) async fn with_room<F>(
        &self,
        user_id: UserId,
        f: F,
    ) -> Result<ActionReply, EngineError>
    where
        F: FnOnce(&mut Room, &mut Outbox) -> Result<ActionReply, DomainError>,
    {
        let room_id = self.store.room_of(user_id).await.ok_or_else(|| {
            DomainError::rejected(StatusCode::NotInRoom, "you are not seated in any room")
        })?;
        let mut lease = self.store.lock(room_id).await?;
        let mut out = Outbox::new();

        match f(&mut lease.room, &mut out) {
            Ok(reply) => {
                lease.commit()?;
                out.flush(self.broadcaster.as_ref(), room_id);
                Ok(reply)
            }
            Err(DomainError::Finished(done)) => {
                self.finalize_game(&mut lease.room, &mut out, done);
                lease.commit()?;
                out.flush(self.broadcaster.as_ref(), room_id);
                let mut reply =
                    ActionReply::ok(format!("game over: {} win", done.winner.label()));
                reply.finished = Some(done.winner);
                Ok(reply)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Terminal-signal boundary: record the result, then reset for replay.
    fn finalize_game(&self, room: &mut Room, out: &mut Outbox, done: GameFinished) {
        info!(
            room_id = room.room_id,
            winner = done.winner.code(),
            "game finished"
        );
        room.status = GameStatus::Finished;
        note(
            room,
            out,
            format!("the game is over: {} win", done.winner.label()),
        );
        out.push(GameEvent::GameFinished {
            winner: done.winner,
        });
        room.reset_for_replay();
        out.push(GameEvent::StatusChanged {
            status: GameStatus::WaitToStart,
        });
    }
}
