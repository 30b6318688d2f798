//! Property tests for vote tallying (pure domain).
//!
//! Tally contract:
//! - Only ballots cast by electors for candidates carry weight
//! - Abstentions and uncast ballots land on the forfeit list at finalize
//! - The captain's ballot weighs 3 half-votes, every other ballot 2
//! - Total weight assigned equals the sum of the counted ballots' weights

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::domain::ballot::{
    tally, Ballot, VoteOutcome, BALLOT_WEIGHT, CAPTAIN_BALLOT_WEIGHT,
};
use crate::domain::participant::Seat;

/// An electorate of seats 1..=n and an arbitrary ballot per elector:
/// None = never cast, Some(None) = abstain, Some(Some(t)) = vote for t.
fn electorate_and_ballots() -> impl Strategy<Value = (Vec<Seat>, BTreeMap<Seat, Ballot>)> {
    (2usize..=10).prop_flat_map(|n| {
        let electors: Vec<Seat> = (1..=n as Seat).collect();
        let per_elector = prop::option::of(prop::option::of(1..=n as Seat));
        (
            Just(electors),
            prop::collection::vec(per_elector, n..=n).prop_map(move |choices| {
                let mut ballots = BTreeMap::new();
                for (idx, choice) in choices.into_iter().enumerate() {
                    let seat = (idx + 1) as Seat;
                    match choice {
                        None => {}
                        Some(None) => {
                            ballots.insert(seat, Ballot::Abstain);
                        }
                        Some(Some(target)) => {
                            ballots.insert(seat, Ballot::For(target));
                        }
                    }
                }
                ballots
            }),
        )
    })
}

proptest! {
    /// Weight conservation: the tally assigns exactly one ballot-weight per
    /// non-forfeiting elector, plus the captain's extra half-vote when the
    /// captain is not among the forfeiters.
    #[test]
    fn prop_weight_conservation(
        (electors, ballots) in electorate_and_ballots(),
        captain_idx in prop::option::of(0usize..10),
    ) {
        let candidates = electors.clone();
        let captain = captain_idx
            .map(|idx| (idx % electors.len() + 1) as Seat);

        let report = tally(&electors, &candidates, &ballots, captain);

        let counted = electors.len() - report.forfeits.len();
        let captain_counted = match captain {
            Some(seat) => electors.contains(&seat) && !report.forfeits.contains(&seat),
            None => false,
        };
        let expected = counted as u32 * BALLOT_WEIGHT
            + if captain_counted {
                CAPTAIN_BALLOT_WEIGHT - BALLOT_WEIGHT
            } else {
                0
            };
        prop_assert_eq!(report.weight_cast, expected);
    }

    /// A decided winner is always a candidate, and a tie always has at
    /// least two distinct candidates.
    #[test]
    fn prop_outcome_is_consistent(
        (electors, ballots) in electorate_and_ballots(),
    ) {
        let candidates = electors.clone();
        let report = tally(&electors, &candidates, &ballots, None);

        match report.outcome {
            VoteOutcome::Decided(winner) => {
                prop_assert!(candidates.contains(&winner));
            }
            VoteOutcome::Tie(tied) => {
                prop_assert!(tied.len() >= 2);
                for seat in &tied {
                    prop_assert!(candidates.contains(seat));
                }
            }
            VoteOutcome::NoValidBallots => {
                prop_assert_eq!(report.weight_cast, 0);
                prop_assert_eq!(report.forfeits.len(), electors.len());
            }
        }
    }

    /// Every elector ends up counted or forfeited, never both or neither.
    #[test]
    fn prop_forfeits_partition_the_electorate(
        (electors, ballots) in electorate_and_ballots(),
    ) {
        let candidates = electors.clone();
        let report = tally(&electors, &candidates, &ballots, None);

        for seat in &electors {
            let cast_valid = matches!(
                ballots.get(seat),
                Some(Ballot::For(t)) if candidates.contains(t)
            );
            prop_assert_eq!(!cast_valid, report.forfeits.contains(seat));
        }
    }
}
