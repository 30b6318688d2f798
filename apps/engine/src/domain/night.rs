//! Night-kill reconciliation and dawn resolution.

use std::collections::BTreeMap;

use crate::domain::catalog::WolfMode;
use crate::domain::participant::Seat;

/// One attacker's submission during the kill window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillChoice {
    /// Valid abstention.
    NoOne,
    Seat(Seat),
}

/// The reconciled night-kill decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KillDecision {
    #[default]
    Pending,
    NoKill,
    Kill(Seat),
}

/// Finalize the kill decision once the window closes.
///
/// First-decision mode is normally decided as submissions arrive; here it
/// falls back to no-kill when nobody committed to a target. All-agree mode
/// requires unanimity over the exact submitted values: a unanimous
/// abstention is a decided no-kill, any disagreement is no-kill.
pub fn reconcile_kill(
    mode: WolfMode,
    votes: &BTreeMap<Seat, KillChoice>,
    current: KillDecision,
) -> KillDecision {
    match mode {
        WolfMode::FirstDecision => match current {
            KillDecision::Pending => KillDecision::NoKill,
            decided => decided,
        },
        WolfMode::AllAgree => {
            let mut submitted = votes.values();
            let Some(first) = submitted.next() else {
                return KillDecision::NoKill;
            };
            if submitted.all(|c| c == first) {
                match first {
                    KillChoice::NoOne => KillDecision::NoKill,
                    KillChoice::Seat(seat) => KillDecision::Kill(*seat),
                }
            } else {
                KillDecision::NoKill
            }
        }
    }
}

/// Apply the night's effects at day-transition and return the deaths.
///
/// The kill target dies unless the guard protected that seat this night or
/// the antidote was used this night; either cancellation alone reverses the
/// kill, and both together still cancel exactly once. A poison target is a
/// second, independent, unconditional death.
pub fn resolve_dawn(
    decision: KillDecision,
    guard_target: Option<Seat>,
    antidote_used: bool,
    poison_target: Option<Seat>,
) -> Vec<Seat> {
    let mut deaths = Vec::new();

    if let KillDecision::Kill(target) = decision {
        let guarded = guard_target == Some(target);
        if !guarded && !antidote_used {
            deaths.push(target);
        }
    }

    if let Some(poisoned) = poison_target {
        if !deaths.contains(&poisoned) {
            deaths.push(poisoned);
        }
    }

    deaths
}
