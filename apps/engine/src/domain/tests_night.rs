use std::collections::BTreeMap;

use crate::domain::catalog::WolfMode;
use crate::domain::night::{reconcile_kill, resolve_dawn, KillChoice, KillDecision};
use crate::domain::participant::Seat;

fn votes(entries: &[(Seat, KillChoice)]) -> BTreeMap<Seat, KillChoice> {
    entries.iter().copied().collect()
}

#[test]
fn all_agree_unanimous_target_kills() {
    let v = votes(&[(1, KillChoice::Seat(5)), (2, KillChoice::Seat(5))]);
    assert_eq!(
        reconcile_kill(WolfMode::AllAgree, &v, KillDecision::Pending),
        KillDecision::Kill(5)
    );
}

#[test]
fn all_agree_disagreement_is_no_kill() {
    let v = votes(&[(1, KillChoice::Seat(5)), (2, KillChoice::Seat(6))]);
    assert_eq!(
        reconcile_kill(WolfMode::AllAgree, &v, KillDecision::Pending),
        KillDecision::NoKill
    );

    // Target versus abstention is a disagreement too.
    let v = votes(&[(1, KillChoice::Seat(5)), (2, KillChoice::NoOne)]);
    assert_eq!(
        reconcile_kill(WolfMode::AllAgree, &v, KillDecision::Pending),
        KillDecision::NoKill
    );
}

#[test]
fn all_agree_unanimous_abstention_is_no_kill() {
    let v = votes(&[(1, KillChoice::NoOne), (2, KillChoice::NoOne)]);
    assert_eq!(
        reconcile_kill(WolfMode::AllAgree, &v, KillDecision::Pending),
        KillDecision::NoKill
    );
    assert_eq!(
        reconcile_kill(WolfMode::AllAgree, &votes(&[]), KillDecision::Pending),
        KillDecision::NoKill
    );
}

#[test]
fn first_decision_keeps_the_decided_target() {
    let v = votes(&[(1, KillChoice::Seat(3))]);
    assert_eq!(
        reconcile_kill(WolfMode::FirstDecision, &v, KillDecision::Kill(3)),
        KillDecision::Kill(3)
    );
    // Window forced shut with nothing decided: no kill.
    assert_eq!(
        reconcile_kill(WolfMode::FirstDecision, &v, KillDecision::Pending),
        KillDecision::NoKill
    );
}

#[test]
fn plain_kill_dies_at_dawn() {
    assert_eq!(resolve_dawn(KillDecision::Kill(4), None, false, None), vec![4]);
    assert_eq!(resolve_dawn(KillDecision::NoKill, None, false, None), Vec::<Seat>::new());
}

#[test]
fn protection_cancels_the_kill() {
    assert!(resolve_dawn(KillDecision::Kill(4), Some(4), false, None).is_empty());
    // Protecting someone else does not.
    assert_eq!(
        resolve_dawn(KillDecision::Kill(4), Some(2), false, None),
        vec![4]
    );
}

#[test]
fn antidote_cancels_the_kill() {
    assert!(resolve_dawn(KillDecision::Kill(4), None, true, None).is_empty());
}

#[test]
fn protection_and_antidote_cancel_exactly_once() {
    // Both on the same kill: still cancelled, never a double-negative.
    assert!(resolve_dawn(KillDecision::Kill(4), Some(4), true, None).is_empty());
}

#[test]
fn poison_is_unconditional_and_independent() {
    // Poison lands even when the kill was cancelled.
    assert_eq!(
        resolve_dawn(KillDecision::Kill(4), Some(4), false, Some(2)),
        vec![2]
    );
    // Kill and poison on different seats both land.
    assert_eq!(
        resolve_dawn(KillDecision::Kill(4), None, false, Some(2)),
        vec![4, 2]
    );
    // Kill and poison on the same seat is one death, not two.
    assert_eq!(
        resolve_dawn(KillDecision::Kill(4), None, false, Some(4)),
        vec![4]
    );
}
