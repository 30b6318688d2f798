//! Per-room aggregate state: configuration, roster, the day's phase list
//! and the transient per-day scratch record.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::domain::ballot::Ballot;
use crate::domain::catalog::{
    CaptainMode, GameStatus, PhaseId, RoleType, Tag, VictoryMode, WitchMode, WolfMode,
};
use crate::domain::night::{KillChoice, KillDecision};
use crate::domain::participant::{Participant, RoomId, Seat, UserId};

/// Cursor value before the first `advance` of a game.
pub const CURSOR_START: i32 = -1;

/// Transient per-day state, cleared on every night entry.
#[derive(Debug, Clone, Default)]
pub struct DayScratch {
    /// Kill submissions, one per kill-capable seat.
    pub wolf_votes: BTreeMap<Seat, KillChoice>,
    pub wolf_decision: KillDecision,
    pub antidote_used: bool,
    pub poison_target: Option<Seat>,
    pub guard_target: Option<Seat>,
    pub seer_target: Option<Seat>,
    /// Seats allowed to cast a ballot in the current vote.
    pub ballot_electors: Vec<Seat>,
    /// Seats that can be voted for. Disjoint from the electors during an
    /// election, identical to the living set during a day vote.
    pub ballot_candidates: Vec<Seat>,
    pub ballots: BTreeMap<Seat, Ballot>,
    /// Deaths resolved at dawn but not yet publicly announced.
    pub pending_deaths: Vec<Seat>,
    /// Announced deaths still inside their last-words window.
    pub dying: Vec<Seat>,
}

/// One game instance.
#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: RoomId,
    pub host_user_id: UserId,
    pub status: GameStatus,
    pub victory_mode: VictoryMode,
    pub captain_mode: CaptainMode,
    pub witch_mode: WitchMode,
    pub wolf_mode: WolfMode,
    /// Rooms lapse after this instant; expired rooms reject joins.
    pub expires_at: OffsetDateTime,
    /// One card per seat, shuffled at deal time.
    pub card_pool: Vec<RoleType>,
    /// Roster in join order before the deal, seat order after.
    pub participants: Vec<Participant>,
    pub day_count: u32,
    /// Total steps taken since the deal, diagnostics only.
    pub step_count: u64,
    /// Index into `phases`; `CURSOR_START` before the first advance.
    pub phase_cursor: i32,
    /// Monotonic counter of schedule mutations, diagnostics only.
    pub phase_sequence_version: u32,
    pub phases: Vec<PhaseId>,
    pub scratch: DayScratch,
    pub captain_seat: Option<Seat>,
    /// Public history lines, also broadcast as they are appended.
    pub history: Vec<String>,
}

impl Room {
    pub fn new(
        room_id: RoomId,
        host_user_id: UserId,
        victory_mode: VictoryMode,
        captain_mode: CaptainMode,
        witch_mode: WitchMode,
        card_pool: Vec<RoleType>,
        expires_at: OffsetDateTime,
    ) -> Self {
        let wolf_mode = WolfMode::for_cards(&card_pool);
        Self {
            room_id,
            host_user_id,
            status: GameStatus::WaitToStart,
            victory_mode,
            captain_mode,
            witch_mode,
            wolf_mode,
            expires_at,
            card_pool,
            participants: Vec::new(),
            day_count: 0,
            step_count: 0,
            phase_cursor: CURSOR_START,
            phase_sequence_version: 0,
            phases: Vec::new(),
            scratch: DayScratch::default(),
            captain_seat: None,
            history: Vec::new(),
        }
    }

    pub fn seat_count(&self) -> usize {
        self.card_pool.len()
    }

    pub fn roster(&self) -> Vec<UserId> {
        self.participants.iter().map(|p| p.user_id).collect()
    }

    pub fn current_phase(&self) -> Option<PhaseId> {
        if self.phase_cursor < 0 {
            return None;
        }
        self.phases.get(self.phase_cursor as usize).copied()
    }

    pub fn by_user(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    pub fn by_user_mut(&mut self, user_id: UserId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.user_id == user_id)
    }

    pub fn by_seat(&self, seat: Seat) -> Option<&Participant> {
        self.participants.iter().find(|p| p.seat == seat)
    }

    pub fn by_seat_mut(&mut self, seat: Seat) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.seat == seat)
    }

    /// Living seats in seat order.
    pub fn living_seats(&self) -> Vec<Seat> {
        let mut seats: Vec<Seat> = self
            .participants
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.seat)
            .collect();
        seats.sort_unstable();
        seats
    }

    /// Living seats carrying the given tag, in seat order.
    pub fn living_seats_with_tag(&self, tag: Tag) -> Vec<Seat> {
        let mut seats: Vec<Seat> = self
            .participants
            .iter()
            .filter(|p| p.alive && p.has_tag(tag))
            .map(|p| p.seat)
            .collect();
        seats.sort_unstable();
        seats
    }

    /// True when the given role was dealt into this room's card pool.
    pub fn role_in_play(&self, role: RoleType) -> bool {
        self.card_pool.contains(&role)
    }

    /// Splice phases in right after the cursor. Used for runoff insertion.
    pub fn insert_phases_after_cursor(&mut self, phases: &[PhaseId]) {
        let at = (self.phase_cursor + 1).max(0) as usize;
        let at = at.min(self.phases.len());
        for (offset, phase) in phases.iter().enumerate() {
            self.phases.insert(at + offset, *phase);
        }
        self.phase_sequence_version += 1;
    }

    /// Remove the first occurrence of `phase` after the cursor, if any.
    /// Returns whether a phase was removed.
    pub fn remove_phase_after_cursor(&mut self, phase: PhaseId) -> bool {
        let from = (self.phase_cursor + 1).max(0) as usize;
        if let Some(pos) = self.phases[from.min(self.phases.len())..]
            .iter()
            .position(|p| *p == phase)
        {
            self.phases.remove(from + pos);
            self.phase_sequence_version += 1;
            true
        } else {
            false
        }
    }

    /// Drop every phase after the cursor, ending the current day early.
    pub fn truncate_day_after_cursor(&mut self) {
        let keep = (self.phase_cursor + 1).max(0) as usize;
        if keep < self.phases.len() {
            self.phases.truncate(keep);
            self.phase_sequence_version += 1;
        }
    }

    /// Reset the room for replay after a finished game. Roster, seats and
    /// configuration are preserved; everything dealt is cleared.
    pub fn reset_for_replay(&mut self) {
        for p in &mut self.participants {
            p.reset();
        }
        self.status = GameStatus::WaitToStart;
        self.day_count = 0;
        self.step_count = 0;
        self.phase_cursor = CURSOR_START;
        self.phase_sequence_version = 0;
        self.phases.clear();
        self.scratch = DayScratch::default();
        self.captain_seat = None;
        self.history.clear();
    }
}
