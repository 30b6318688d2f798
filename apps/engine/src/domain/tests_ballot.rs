use std::collections::BTreeMap;

use crate::domain::ballot::{
    runoff_electors, tally, Ballot, VoteOutcome, BALLOT_WEIGHT, CAPTAIN_BALLOT_WEIGHT,
};
use crate::domain::participant::Seat;

fn ballots(entries: &[(Seat, Ballot)]) -> BTreeMap<Seat, Ballot> {
    entries.iter().copied().collect()
}

#[test]
fn plain_majority_wins() {
    let electors = [1, 2, 3, 4];
    let candidates = [1, 2, 3, 4];
    let b = ballots(&[
        (1, Ballot::For(3)),
        (2, Ballot::For(3)),
        (3, Ballot::For(1)),
        (4, Ballot::For(3)),
    ]);
    let report = tally(&electors, &candidates, &b, None);
    assert_eq!(report.outcome, VoteOutcome::Decided(3));
    assert!(report.forfeits.is_empty());
    assert_eq!(report.weight_cast, 4 * BALLOT_WEIGHT);
}

#[test]
fn captain_half_vote_breaks_a_would_be_tie() {
    let electors = [1, 2, 3, 4];
    let candidates = [1, 2, 3, 4];
    let b = ballots(&[
        (1, Ballot::For(3)),
        (2, Ballot::For(3)),
        (3, Ballot::For(4)),
        (4, Ballot::For(4)),
    ]);

    // Without a captain this is a 2-2 tie.
    let report = tally(&electors, &candidates, &b, None);
    assert_eq!(report.outcome, VoteOutcome::Tie(vec![3, 4]));

    // Seat 1's ballot carries 1.5 votes once elected captain.
    let report = tally(&electors, &candidates, &b, Some(1));
    assert_eq!(report.outcome, VoteOutcome::Decided(3));
    assert_eq!(
        report.weight_cast,
        CAPTAIN_BALLOT_WEIGHT + 3 * BALLOT_WEIGHT
    );
}

#[test]
fn forfeits_are_decided_at_finalize() {
    let electors = [1, 2, 3, 4];
    let candidates = [1, 2, 3, 4];
    // Seat 2 abstains explicitly, seat 4 never casts.
    let b = ballots(&[(1, Ballot::For(3)), (2, Ballot::Abstain), (3, Ballot::For(3))]);
    let report = tally(&electors, &candidates, &b, None);
    assert_eq!(report.outcome, VoteOutcome::Decided(3));
    assert_eq!(report.forfeits, vec![2, 4]);
    assert_eq!(report.weight_cast, 2 * BALLOT_WEIGHT);
}

#[test]
fn forfeiting_captain_contributes_nothing() {
    let electors = [1, 2, 3];
    let candidates = [1, 2, 3];
    let b = ballots(&[(2, Ballot::For(3)), (3, Ballot::For(3))]);
    // Captain seat 1 never casts: the half-vote bonus is simply absent.
    let report = tally(&electors, &candidates, &b, Some(1));
    assert_eq!(report.forfeits, vec![1]);
    assert_eq!(report.weight_cast, 2 * BALLOT_WEIGHT);
}

#[test]
fn ballot_outside_electorate_is_not_counted() {
    // Seat 5 is not part of the electorate; its entry is ignored entirely.
    let electors = [1, 2];
    let candidates = [1, 2];
    let b = ballots(&[(1, Ballot::For(2)), (5, Ballot::For(1))]);
    let report = tally(&electors, &candidates, &b, None);
    assert_eq!(report.outcome, VoteOutcome::Decided(2));
    assert_eq!(report.weight_cast, BALLOT_WEIGHT);
}

#[test]
fn ballot_for_non_candidate_is_a_forfeit() {
    let electors = [1, 2];
    let candidates = [3, 4];
    let b = ballots(&[(1, Ballot::For(2)), (2, Ballot::For(3))]);
    let report = tally(&electors, &candidates, &b, None);
    assert_eq!(report.outcome, VoteOutcome::Decided(3));
    assert_eq!(report.forfeits, vec![1]);
}

#[test]
fn no_valid_ballots_when_everyone_forfeits() {
    let electors = [1, 2, 3];
    let candidates = [1, 2, 3];
    let b = ballots(&[(1, Ballot::Abstain)]);
    let report = tally(&electors, &candidates, &b, None);
    assert_eq!(report.outcome, VoteOutcome::NoValidBallots);
    assert_eq!(report.forfeits, vec![1, 2, 3]);
    assert_eq!(report.weight_cast, 0);
}

#[test]
fn runoff_electorate_redraws_non_tied_voters() {
    // Day vote: electors and candidates are the same living set.
    let living = [1, 2, 3, 4, 5];
    let tied = [2, 4];
    assert_eq!(runoff_electors(&living, &living, &tied), vec![1, 3, 5]);

    // Election: candidates were disjoint from the electors.
    let electors = [3, 4, 5];
    let candidates = [1, 2];
    let tied = [1, 2];
    assert_eq!(runoff_electors(&electors, &candidates, &tied), vec![3, 4, 5]);
}
