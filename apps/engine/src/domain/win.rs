//! Win-condition evaluation.

use crate::domain::catalog::{GameStatus, GroupType, VictoryMode};
use crate::domain::room::Room;
use crate::errors::domain::{DomainError, GameFinished};

/// Living, not-pending-death seat counts per alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactionCount {
    pub wolves: usize,
    pub gods: usize,
    pub villagers: usize,
}

pub fn count_factions(room: &Room) -> FactionCount {
    let mut count = FactionCount {
        wolves: 0,
        gods: 0,
        villagers: 0,
    };
    for p in &room.participants {
        if !p.alive || room.scratch.pending_deaths.contains(&p.seat) {
            continue;
        }
        match p.group_type {
            GroupType::Wolves => count.wolves += 1,
            GroupType::Gods => count.gods += 1,
            GroupType::Villagers => count.villagers += 1,
            GroupType::Unknown | GroupType::Good => {}
        }
    }
    count
}

/// Evaluate the win condition after a finalized elimination.
///
/// Raises the terminal signal as a typed error variant that every frame up
/// to the service boundary forwards with `?`. A room that has already
/// finished never raises again, so the evaluator can be re-run safely.
/// A faction that was never dealt into the card pool is not a side the
/// wolves can exterminate.
pub fn check_win(room: &Room) -> Result<(), DomainError> {
    if room.status == GameStatus::Finished {
        return Ok(());
    }

    let count = count_factions(room);

    if count.wolves == 0 {
        return Err(DomainError::Finished(GameFinished {
            room_id: room.room_id,
            winner: GroupType::Good,
        }));
    }

    let gods_dealt = room
        .card_pool
        .iter()
        .any(|c| c.group() == GroupType::Gods);
    let villagers_dealt = room
        .card_pool
        .iter()
        .any(|c| c.group() == GroupType::Villagers);

    let wolves_win = match room.victory_mode {
        VictoryMode::KillSide => {
            (gods_dealt && count.gods == 0) || (villagers_dealt && count.villagers == 0)
        }
        VictoryMode::KillAll => count.gods == 0 && count.villagers == 0,
    };
    if wolves_win {
        return Err(DomainError::Finished(GameFinished {
            room_id: room.room_id,
            winner: GroupType::Wolves,
        }));
    }

    Ok(())
}
