//! Property tests for night-kill reconciliation and dawn resolution.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::domain::catalog::WolfMode;
use crate::domain::night::{reconcile_kill, resolve_dawn, KillChoice, KillDecision};
use crate::domain::participant::Seat;

fn kill_choice() -> impl Strategy<Value = KillChoice> {
    prop_oneof![
        Just(KillChoice::NoOne),
        (1..=12 as Seat).prop_map(KillChoice::Seat),
    ]
}

fn submissions() -> impl Strategy<Value = BTreeMap<Seat, KillChoice>> {
    prop::collection::btree_map(1..=12 as Seat, kill_choice(), 1..=4)
}

proptest! {
    /// Consensus law: two or more distinct submissions always reconcile to
    /// no-kill; a unanimous target reconciles to that target.
    #[test]
    fn prop_all_agree_consensus(votes in submissions()) {
        let decision = reconcile_kill(WolfMode::AllAgree, &votes, KillDecision::Pending);

        let mut distinct: Vec<KillChoice> = votes.values().copied().collect();
        distinct.sort_by_key(|c| match c {
            KillChoice::NoOne => -1,
            KillChoice::Seat(s) => *s as i32,
        });
        distinct.dedup();

        if distinct.len() >= 2 {
            prop_assert_eq!(decision, KillDecision::NoKill);
        } else {
            match distinct[0] {
                KillChoice::NoOne => prop_assert_eq!(decision, KillDecision::NoKill),
                KillChoice::Seat(target) => {
                    prop_assert_eq!(decision, KillDecision::Kill(target))
                }
            }
        }
    }

    /// First-decision law: the decision equals the first non-abstaining
    /// submission, or no-kill if every submission abstained.
    #[test]
    fn prop_first_decision_takes_first_target(
        ordered in prop::collection::vec(kill_choice(), 1..=4),
    ) {
        // Replay the submissions in arrival order the way the kill window
        // records them: the first target fixes the decision on the spot.
        let mut current = KillDecision::Pending;
        for choice in &ordered {
            if current == KillDecision::Pending {
                if let KillChoice::Seat(target) = choice {
                    current = KillDecision::Kill(*target);
                }
            }
        }
        let votes: BTreeMap<Seat, KillChoice> = ordered
            .iter()
            .enumerate()
            .map(|(idx, c)| ((idx + 1) as Seat, *c))
            .collect();
        let decision = reconcile_kill(WolfMode::FirstDecision, &votes, current);

        let first_target = ordered.iter().find_map(|c| match c {
            KillChoice::Seat(s) => Some(*s),
            KillChoice::NoOne => None,
        });
        match first_target {
            Some(target) => prop_assert_eq!(decision, KillDecision::Kill(target)),
            None => prop_assert_eq!(decision, KillDecision::NoKill),
        }
    }

    /// Cancellation law: guard and antidote each independently cancel the
    /// kill; together they still cancel exactly once, and the kill target
    /// only dies when neither applies. Poison lands regardless.
    #[test]
    fn prop_dawn_cancellation(
        target in 1..=8 as Seat,
        guard in prop::option::of(1..=8 as Seat),
        antidote in any::<bool>(),
        poison in prop::option::of(1..=8 as Seat),
    ) {
        let deaths = resolve_dawn(KillDecision::Kill(target), guard, antidote, poison);

        let kill_cancelled = guard == Some(target) || antidote;
        if kill_cancelled {
            // A cancelled kill target only dies to an independent poison.
            prop_assert_eq!(deaths.contains(&target), poison == Some(target));
        } else {
            prop_assert!(deaths.contains(&target));
        }

        if let Some(poisoned) = poison {
            prop_assert!(deaths.contains(&poisoned));
        }

        // Never more than one death entry per seat.
        let mut unique = deaths.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), deaths.len());
    }
}
