//! Domain layer: pure game logic types and helpers.

pub mod ballot;
pub mod catalog;
pub mod night;
pub mod participant;
pub mod room;
pub mod schedule;
pub mod win;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests_ballot;
#[cfg(test)]
mod tests_night;
#[cfg(test)]
mod tests_props_ballot;
#[cfg(test)]
mod tests_props_night;
#[cfg(test)]
mod tests_win;

// Re-exports for ergonomics
pub use ballot::{tally, Ballot, TallyReport, VoteOutcome};
pub use catalog::{
    CaptainMode, GameStatus, GroupType, PhaseId, RoleType, SkillId, StatusCode, Tag, VictoryMode,
    WitchMode, WolfMode,
};
pub use night::{reconcile_kill, resolve_dawn, KillChoice, KillDecision};
pub use participant::{Participant, RoomId, Seat, UserId};
pub use room::{DayScratch, Room};
pub use schedule::build_day_schedule;
pub use win::check_win;
