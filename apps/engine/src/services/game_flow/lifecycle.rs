//! Room lifecycle: create, join, quit, seat, deal, and the read-only view.

use rand::seq::SliceRandom;
use rand::Rng;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use super::{ActionReply, GameFlowService};
use crate::broadcast::GameEvent;
use crate::domain::catalog::{
    CaptainMode, GameStatus, PhaseId, RoleType, StatusCode, VictoryMode, WitchMode,
};
use crate::domain::participant::{Participant, RoomId, Seat, UserId, NO_SEAT};
use crate::domain::room::Room;
use crate::domain::schedule::instruction_for;
use crate::error::EngineError;
use crate::errors::domain::DomainError;
use crate::store::StoreError;

/// Configuration of a new room.
#[derive(Debug, Clone)]
pub struct RoomSpec {
    pub victory_mode: VictoryMode,
    pub captain_mode: CaptainMode,
    pub witch_mode: WitchMode,
    pub villagers: usize,
    pub wolves: usize,
    /// Special cards on top of the plain villagers and wolves.
    pub specials: Vec<RoleType>,
}

impl RoomSpec {
    fn card_pool(&self) -> Result<Vec<RoleType>, DomainError> {
        let mut pool = Vec::with_capacity(self.villagers + self.wolves + self.specials.len());
        pool.extend(std::iter::repeat(RoleType::Villager).take(self.villagers));
        pool.extend(std::iter::repeat(RoleType::NormalWolf).take(self.wolves));
        for role in &self.specials {
            if *role == RoleType::Unknown {
                return Err(DomainError::config("unknown role in the card pool"));
            }
            pool.push(*role);
        }
        if !pool.iter().any(|c| c.is_wolf()) {
            return Err(DomainError::config("a room needs at least one wolf"));
        }
        if pool.iter().all(|c| c.is_wolf()) {
            return Err(DomainError::config("a room needs at least one non-wolf"));
        }
        Ok(pool)
    }
}

/// Read-only snapshot of a room, safe to serve without the room lease.
#[derive(Debug, Clone)]
pub struct RoomView {
    pub room_id: RoomId,
    pub status: GameStatus,
    pub day_count: u32,
    pub seat_count: usize,
    pub seats: Vec<SeatView>,
    pub current_phase: Option<PhaseId>,
    pub instruction: Option<&'static str>,
    pub captain_seat: Option<Seat>,
    pub history: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SeatView {
    pub seat: Seat,
    pub user_id: UserId,
    pub alive: bool,
}

impl GameFlowService {
    /// Create a room from a card-pool spec. The host joins like anyone else.
    pub async fn create_room(
        &self,
        host_user_id: UserId,
        spec: RoomSpec,
    ) -> Result<RoomId, EngineError> {
        let card_pool = spec.card_pool()?;
        let ttl_hours = rand::rng().random_range(self.config.room_ttl_hours.clone());
        let expires_at = OffsetDateTime::now_utc() + Duration::hours(ttl_hours);

        let room = Room::new(
            0,
            host_user_id,
            spec.victory_mode,
            spec.captain_mode,
            spec.witch_mode,
            card_pool,
            expires_at,
        );
        let room_id = self.store.create(room).await?;
        info!(room_id, host_user_id, "room created");
        Ok(room_id)
    }

    /// Take a spot on the roster of a waiting room.
    pub async fn join_room(
        &self,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<ActionReply, EngineError> {
        match self.store.room_of(user_id).await {
            Some(current) if current == room_id => {
                return Ok(ActionReply::with_code(
                    StatusCode::AlreadyIn,
                    "you are already in this room",
                ));
            }
            Some(_) => {
                return Err(DomainError::cannot_act("leave your current room first").into());
            }
            None => {}
        }

        let mut lease = match self.store.lock(room_id).await {
            Ok(lease) => lease,
            Err(StoreError::RoomNotFound(_)) => {
                return Err(
                    DomainError::rejected(StatusCode::RoomNotFound, "that room does not exist")
                        .into(),
                );
            }
            Err(err) => return Err(err.into()),
        };

        if OffsetDateTime::now_utc() > lease.room.expires_at {
            return Err(
                DomainError::rejected(StatusCode::RoomNotFound, "that room has lapsed").into(),
            );
        }
        if lease.room.status != GameStatus::WaitToStart {
            return Err(DomainError::rejected(
                StatusCode::AlreadyStarted,
                "the game has already started",
            )
            .into());
        }
        if lease.room.participants.len() >= lease.room.seat_count() {
            return Err(
                DomainError::rejected(StatusCode::RoomFull, "that room is full").into(),
            );
        }

        lease.room.participants.push(Participant::new(user_id, room_id));
        lease.commit()?;
        self.store.bind_user(user_id, room_id).await;
        self.broadcaster.publish(room_id, GameEvent::SeatsChanged);
        info!(room_id, user_id, "player joined");
        Ok(ActionReply::ok("you joined the room"))
    }

    /// Leave a room that has not started.
    pub async fn quit_room(&self, user_id: UserId) -> Result<ActionReply, EngineError> {
        let Some(room_id) = self.store.room_of(user_id).await else {
            return Err(
                DomainError::rejected(StatusCode::NotInRoom, "you are not in a room").into(),
            );
        };

        let mut lease = match self.store.lock(room_id).await {
            Ok(lease) => lease,
            Err(StoreError::RoomNotFound(_)) => {
                // Stale binding to a vanished room.
                self.store.unbind_user(user_id).await;
                return Err(
                    DomainError::rejected(StatusCode::NotInRoom, "you are not in a room").into(),
                );
            }
            Err(err) => return Err(err.into()),
        };

        if lease.room.status != GameStatus::WaitToStart {
            return Err(DomainError::rejected(
                StatusCode::AlreadyStarted,
                "you cannot leave a running game",
            )
            .into());
        }

        lease.room.participants.retain(|p| p.user_id != user_id);
        lease.commit()?;
        self.store.unbind_user(user_id).await;
        self.broadcaster.publish(room_id, GameEvent::SeatsChanged);
        info!(room_id, user_id, "player left");
        Ok(ActionReply::ok("you left the room"))
    }

    /// Claim a seat position before the deal.
    pub async fn sit(&self, user_id: UserId, seat: Seat) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            if room.status != GameStatus::WaitToStart {
                return Err(DomainError::rejected(
                    StatusCode::AlreadyStarted,
                    "the game has already started",
                ));
            }
            if seat < 1 || seat as usize > room.seat_count() {
                return Err(DomainError::cannot_act("no such seat"));
            }
            if room
                .participants
                .iter()
                .any(|p| p.seat == seat && p.user_id != user_id)
            {
                return Err(DomainError::rejected(
                    StatusCode::SeatOccupied,
                    "someone is already in that seat",
                ));
            }

            let p = room.by_user_mut(user_id).ok_or_else(|| {
                DomainError::rejected(StatusCode::NotInRoom, "you are not in this room")
            })?;
            p.seat = seat;
            out.push(GameEvent::SeatsChanged);
            debug!(room_id = room.room_id, user_id, seat, "seat claimed");
            Ok(ActionReply::ok(format!("you took seat {seat}")))
        })
        .await
    }

    /// Shuffle the card pool over the full, fully-seated roster and hand
    /// every participant their role.
    pub async fn deal(&self, user_id: UserId) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            if room.status != GameStatus::WaitToStart {
                return Err(DomainError::rejected(
                    StatusCode::CannotStart,
                    "the game cannot start now",
                ));
            }
            let seat_count = room.seat_count();
            if room.participants.len() != seat_count {
                return Err(DomainError::rejected(
                    StatusCode::CannotStart,
                    "not every seat is filled",
                ));
            }
            let mut seats: Vec<Seat> = room.participants.iter().map(|p| p.seat).collect();
            seats.sort_unstable();
            let expected: Vec<Seat> = (1..=seat_count as Seat).collect();
            if seats != expected || seats.contains(&NO_SEAT) {
                return Err(DomainError::rejected(
                    StatusCode::CannotStart,
                    "every player must pick a distinct seat first",
                ));
            }

            // Uniform shuffle; roster order becomes seat order.
            room.participants.sort_by_key(|p| p.seat);
            let mut cards = room.card_pool.clone();
            cards.shuffle(&mut rand::rng());
            let captain_mode = room.captain_mode;
            for (p, card) in room.participants.iter_mut().zip(cards.iter()) {
                p.prepare(*card, captain_mode);
            }

            room.status = GameStatus::Ready;
            out.push(GameEvent::CardsDealt);
            out.push(GameEvent::StatusChanged {
                status: GameStatus::Ready,
            });
            info!(room_id = room.room_id, seat_count, "cards dealt");
            Ok(ActionReply::ok("the cards are dealt"))
        })
        .await
    }

    /// Read-only room snapshot. Advisory only; never used for decisions.
    pub async fn room_info(&self, user_id: UserId) -> Result<RoomView, EngineError> {
        let Some(room_id) = self.store.room_of(user_id).await else {
            return Err(
                DomainError::rejected(StatusCode::NotInRoom, "you are not in a room").into(),
            );
        };
        let room = self.store.snapshot(room_id).await?;

        let mut seats: Vec<SeatView> = room
            .participants
            .iter()
            .map(|p| SeatView {
                seat: p.seat,
                user_id: p.user_id,
                alive: p.alive,
            })
            .collect();
        seats.sort_by_key(|s| s.seat);

        let current_phase = room.current_phase();
        let instruction = current_phase
            .map(instruction_for)
            .filter(|text| !text.is_empty());

        Ok(RoomView {
            room_id: room.room_id,
            status: room.status,
            day_count: room.day_count,
            seat_count: room.seat_count(),
            seats,
            current_phase,
            instruction,
            captain_seat: room.captain_seat,
            history: room.history,
        })
    }
}
