use time::{Duration, OffsetDateTime};

use crate::domain::catalog::{CaptainMode, GameStatus, RoleType, VictoryMode, WitchMode};
use crate::domain::participant::{Participant, Seat, UserId};
use crate::domain::room::Room;

/// Build a dealt room: one seated participant per card, seat `i + 1`
/// holding `roles[i]`, user ids starting at 100.
pub(crate) fn dealt_room(
    roles: &[RoleType],
    victory_mode: VictoryMode,
    captain_mode: CaptainMode,
    witch_mode: WitchMode,
) -> Room {
    let mut room = Room::new(
        1,
        100,
        victory_mode,
        captain_mode,
        witch_mode,
        roles.to_vec(),
        OffsetDateTime::now_utc() + Duration::hours(12),
    );
    for (idx, role) in roles.iter().enumerate() {
        let mut p = Participant::new(100 + idx as UserId, 1);
        p.seat = (idx + 1) as Seat;
        p.prepare(*role, captain_mode);
        room.participants.push(p);
    }
    room.status = GameStatus::Ready;
    room
}
