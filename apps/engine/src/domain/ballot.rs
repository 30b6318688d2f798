//! Vote tallying with the captain's weighted ballot and runoff detection.

use std::collections::BTreeMap;

use crate::domain::participant::Seat;

/// Weight of an ordinary ballot, in half-vote units.
pub const BALLOT_WEIGHT: u32 = 2;
/// Weight of the captain's ballot: one and a half votes.
pub const CAPTAIN_BALLOT_WEIGHT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ballot {
    /// Explicit abstention; lands on the forfeit list at finalize.
    Abstain,
    For(Seat),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Decided(Seat),
    /// Several targets tied for the highest tally; all advance to a runoff.
    Tie(Vec<Seat>),
    NoValidBallots,
}

/// Finalized tally of one vote phase.
#[derive(Debug, Clone)]
pub struct TallyReport {
    pub outcome: VoteOutcome,
    /// Electors whose ballot was uncast or an abstention, decided at
    /// finalize time rather than when cast.
    pub forfeits: Vec<Seat>,
    /// Total weight assigned to candidates, in half-vote units.
    pub weight_cast: u32,
}

/// Tally the ballots of one vote phase.
///
/// Only ballots from `electors` for members of `candidates` count. The
/// captain's ballot weighs [`CAPTAIN_BALLOT_WEIGHT`] half-votes, all others
/// [`BALLOT_WEIGHT`]. A forfeiting captain contributes nothing; the extra
/// half-vote is absent, not reassigned.
pub fn tally(
    electors: &[Seat],
    candidates: &[Seat],
    ballots: &BTreeMap<Seat, Ballot>,
    captain_seat: Option<Seat>,
) -> TallyReport {
    let mut weights: BTreeMap<Seat, u32> = BTreeMap::new();
    let mut forfeits = Vec::new();
    let mut weight_cast = 0u32;

    for &elector in electors {
        match ballots.get(&elector) {
            Some(Ballot::For(target)) if candidates.contains(target) => {
                let weight = if captain_seat == Some(elector) {
                    CAPTAIN_BALLOT_WEIGHT
                } else {
                    BALLOT_WEIGHT
                };
                *weights.entry(*target).or_insert(0) += weight;
                weight_cast += weight;
            }
            _ => forfeits.push(elector),
        }
    }

    let outcome = match weights.values().max().copied() {
        None => VoteOutcome::NoValidBallots,
        Some(top) => {
            let leaders: Vec<Seat> = weights
                .iter()
                .filter(|(_, w)| **w == top)
                .map(|(seat, _)| *seat)
                .collect();
            if leaders.len() == 1 {
                VoteOutcome::Decided(leaders[0])
            } else {
                VoteOutcome::Tie(leaders)
            }
        }
    };

    TallyReport {
        outcome,
        forfeits,
        weight_cast,
    }
}

/// Electorate of a runoff: the previous electorate and candidates, minus
/// the tied candidates themselves.
pub fn runoff_electors(electors: &[Seat], candidates: &[Seat], tied: &[Seat]) -> Vec<Seat> {
    let mut next: Vec<Seat> = electors
        .iter()
        .chain(candidates.iter())
        .copied()
        .filter(|s| !tied.contains(s))
        .collect();
    next.sort_unstable();
    next.dedup();
    next
}
