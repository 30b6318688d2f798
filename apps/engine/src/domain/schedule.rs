//! Per-day phase list construction.

use crate::domain::catalog::{CaptainMode, PhaseId, RoleType};

/// Build the ordered phase list for one game-day.
///
/// Night windows for the seer, witch and guard only appear when the role
/// was dealt into the card pool. The election block and the morning
/// last-words phase exist on day 1 only. Runoff phases are never part of
/// the built list; they are spliced in after a tied vote.
pub fn build_day_schedule(
    day: u32,
    captain_mode: CaptainMode,
    card_pool: &[RoleType],
) -> Vec<PhaseId> {
    let mut phases = vec![PhaseId::TurnNight, PhaseId::WolfKill];

    if card_pool.contains(&RoleType::Seer) {
        phases.push(PhaseId::SeerVerify);
    }
    if card_pool.contains(&RoleType::Witch) {
        phases.push(PhaseId::WitchPotion);
    }
    if card_pool.contains(&RoleType::Guard) {
        phases.push(PhaseId::GuardProtect);
    }

    phases.push(PhaseId::TurnDay);

    if day == 1 && captain_mode == CaptainMode::WithCaptain {
        phases.push(PhaseId::Elect);
        phases.push(PhaseId::ElectTalk);
        phases.push(PhaseId::ElectVote);
    }

    phases.push(PhaseId::Announce);
    phases.push(PhaseId::UseSkills);
    if day == 1 {
        phases.push(PhaseId::LastWords);
    }
    phases.push(PhaseId::Talk);
    phases.push(PhaseId::Vote);
    phases.push(PhaseId::UseSkills);
    phases.push(PhaseId::LastWords);

    phases
}

/// Instruction shown to players while a phase waits for input.
pub fn instruction_for(phase: PhaseId) -> &'static str {
    match phase {
        PhaseId::WolfKill => "choose a target for the night attack",
        PhaseId::SeerVerify => "choose a player to inspect",
        PhaseId::WitchPotion => "use a potion or pass",
        PhaseId::GuardProtect => "choose a player to protect",
        PhaseId::Elect => "end candidacy",
        PhaseId::ElectTalk | PhaseId::ElectPkTalk => "end candidacy speeches",
        PhaseId::ElectVote | PhaseId::ElectPkVote => "end voting",
        PhaseId::Talk | PhaseId::PkTalk => "end discussion",
        PhaseId::Vote | PhaseId::PkVote => "end voting",
        PhaseId::LastWords => "end last words",
        PhaseId::UseSkills => "use or pass death abilities",
        PhaseId::TurnNight | PhaseId::TurnDay | PhaseId::Announce => "",
    }
}
