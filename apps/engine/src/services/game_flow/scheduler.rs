//! The phase scheduler: advances a room through its per-day step list,
//! finalizing each phase on exit and applying setup on entry, looping while
//! phases auto-continue and stopping where player input is required.

use tracing::{debug, info};

use super::{note, ActionReply, GameFlowService};
use crate::broadcast::{GameEvent, Outbox};
use crate::domain::ballot::{runoff_electors, tally, VoteOutcome};
use crate::domain::catalog::{GameStatus, PhaseId, SkillId, StatusCode, Tag, WolfMode};
use crate::domain::night::{reconcile_kill, resolve_dawn};
use crate::domain::participant::{ability, Seat, UserId};
use crate::domain::room::{DayScratch, Room};
use crate::domain::schedule::{build_day_schedule, instruction_for};
use crate::domain::win::check_win;
use crate::error::EngineError;
use crate::errors::domain::DomainError;

/// Result of one `advance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Stopped at a phase that needs player input to end.
    Waiting {
        phase: PhaseId,
        instruction: &'static str,
    },
    /// The phase being left refused to finalize; the cursor did not move.
    NotReady { waiting_on: Vec<Seat> },
}

enum EnterFlow {
    Auto,
    Wait(&'static str),
}

enum LeaveFlow {
    Done,
    NotReady(Vec<Seat>),
}

// A full day never exceeds the built list plus one spliced runoff pair;
// this bounds a runaway auto-continue chain across a day boundary.
const MAX_STEPS: usize = 64;

impl GameFlowService {
    /// Host-driven advance: the `next_step` of the surrounding application
    /// and the entry point a timeout job would call.
    pub async fn move_on(&self, user_id: UserId) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            if !matches!(
                room.status,
                GameStatus::Ready | GameStatus::Day | GameStatus::Night
            ) {
                return Err(DomainError::cannot_act("the game has not started"));
            }
            match self.advance(room, out)? {
                AdvanceOutcome::Waiting { instruction, .. } => {
                    Ok(ActionReply::ok(format!("waiting: {instruction}")))
                }
                AdvanceOutcome::NotReady { waiting_on } => Ok(ActionReply::with_code(
                    StatusCode::NotVotedYet,
                    format!("still waiting on seats {waiting_on:?}"),
                )),
            }
        })
        .await
    }

    /// Advance the phase cursor until a phase requires player input.
    pub(super) fn advance(
        &self,
        room: &mut Room,
        out: &mut Outbox,
    ) -> Result<AdvanceOutcome, DomainError> {
        for _ in 0..MAX_STEPS {
            if let Some(current) = room.current_phase() {
                match self.leave_phase(room, current, out)? {
                    LeaveFlow::Done => {}
                    LeaveFlow::NotReady(waiting_on) => {
                        return Ok(AdvanceOutcome::NotReady { waiting_on });
                    }
                }
            }

            room.step_count += 1;
            room.phase_cursor += 1;
            if room.phase_cursor as usize >= room.phases.len() {
                room.phase_cursor = 0;
                room.day_count += 1;
                room.phases =
                    build_day_schedule(room.day_count, room.captain_mode, &room.card_pool);
                room.phase_sequence_version += 1;
                debug!(
                    room_id = room.room_id,
                    day = room.day_count,
                    "schedule regenerated"
                );
            }

            let phase = room.phases[room.phase_cursor as usize];
            debug!(room_id = room.room_id, phase = phase.code(), "enter phase");
            match self.enter_phase(room, phase, out)? {
                EnterFlow::Auto => continue,
                EnterFlow::Wait(instruction) => {
                    out.push(GameEvent::Instruction {
                        phase,
                        text: instruction.into(),
                    });
                    return Ok(AdvanceOutcome::Waiting { phase, instruction });
                }
            }
        }
        Err(DomainError::config("phase advance exceeded maximum steps"))
    }

    /// Finalize the effects of the phase being left.
    fn leave_phase(
        &self,
        room: &mut Room,
        phase: PhaseId,
        out: &mut Outbox,
    ) -> Result<LeaveFlow, DomainError> {
        match phase {
            PhaseId::WolfKill => {
                if room.wolf_mode == WolfMode::AllAgree {
                    let missing: Vec<Seat> = room
                        .living_seats_with_tag(Tag::AttackableWolf)
                        .into_iter()
                        .filter(|seat| !room.scratch.wolf_votes.contains_key(seat))
                        .collect();
                    if !missing.is_empty() {
                        return Ok(LeaveFlow::NotReady(missing));
                    }
                }
                let decision = reconcile_kill(
                    room.wolf_mode,
                    &room.scratch.wolf_votes,
                    room.scratch.wolf_decision,
                );
                room.scratch.wolf_decision = decision;
                debug!(room_id = room.room_id, decision = ?decision, "night attack reconciled");
            }
            PhaseId::Elect => self.close_candidacy(room, out),
            PhaseId::ElectVote | PhaseId::ElectPkVote => {
                self.close_captain_vote(room, phase, out);
            }
            PhaseId::Vote | PhaseId::PkVote => {
                self.close_day_vote(room, phase, out)?;
            }
            PhaseId::LastWords => {
                room.scratch.dying.clear();
            }
            _ => {}
        }
        Ok(LeaveFlow::Done)
    }

    /// Apply phase-specific setup; auto-continue or wait for input.
    fn enter_phase(
        &self,
        room: &mut Room,
        phase: PhaseId,
        out: &mut Outbox,
    ) -> Result<EnterFlow, DomainError> {
        let flow = match phase {
            PhaseId::TurnNight => {
                room.scratch = DayScratch::default();
                room.status = GameStatus::Night;
                note(room, out, format!("night {} falls", room.day_count));
                out.push(GameEvent::StatusChanged {
                    status: GameStatus::Night,
                });
                out.push(GameEvent::AudioCue {
                    cue: "night".into(),
                });
                EnterFlow::Auto
            }
            PhaseId::WolfKill => {
                if room.living_seats_with_tag(Tag::AttackableWolf).is_empty() {
                    EnterFlow::Auto
                } else {
                    EnterFlow::Wait(instruction_for(phase))
                }
            }
            PhaseId::SeerVerify => self.night_window(room, SkillId::Discover, phase),
            PhaseId::WitchPotion => self.night_window(room, SkillId::Potion, phase),
            PhaseId::GuardProtect => self.night_window(room, SkillId::Guard, phase),
            PhaseId::TurnDay => {
                let deaths = resolve_dawn(
                    room.scratch.wolf_decision,
                    room.scratch.guard_target,
                    room.scratch.antidote_used,
                    room.scratch.poison_target,
                );
                room.scratch.pending_deaths = deaths
                    .into_iter()
                    .filter(|seat| room.by_seat(*seat).is_some_and(|p| p.alive))
                    .collect();
                room.status = GameStatus::Day;
                note(room, out, format!("day {} breaks", room.day_count));
                out.push(GameEvent::StatusChanged {
                    status: GameStatus::Day,
                });
                out.push(GameEvent::AudioCue { cue: "day".into() });
                check_win(room)?;
                EnterFlow::Auto
            }
            PhaseId::Announce => {
                self.announce_deaths(room, out)?;
                EnterFlow::Auto
            }
            PhaseId::Elect | PhaseId::ElectTalk | PhaseId::ElectPkTalk => {
                EnterFlow::Wait(instruction_for(phase))
            }
            PhaseId::Talk | PhaseId::PkTalk => EnterFlow::Wait(instruction_for(phase)),
            PhaseId::Vote => {
                let living = room.living_seats();
                let electors: Vec<Seat> = living
                    .iter()
                    .copied()
                    .filter(|seat| room.by_seat(*seat).is_some_and(|p| p.vote_eligible))
                    .collect();
                room.scratch.ballot_electors = electors;
                room.scratch.ballot_candidates = living;
                room.scratch.ballots.clear();
                EnterFlow::Wait(instruction_for(phase))
            }
            // Electorate and candidates were frozen when the tie or the
            // candidacy phase was closed.
            PhaseId::ElectVote | PhaseId::ElectPkVote | PhaseId::PkVote => {
                EnterFlow::Wait(instruction_for(phase))
            }
            PhaseId::UseSkills => {
                let armed = room.scratch.dying.iter().any(|seat| {
                    room.by_seat(*seat)
                        .is_some_and(|p| p.ability_flag(ability::SHOOT))
                });
                if armed {
                    EnterFlow::Wait(instruction_for(phase))
                } else {
                    EnterFlow::Auto
                }
            }
            PhaseId::LastWords => {
                if room.scratch.dying.is_empty() {
                    EnterFlow::Auto
                } else {
                    EnterFlow::Wait(instruction_for(phase))
                }
            }
        };
        Ok(flow)
    }

    /// A night action window waits only while a living holder of the skill
    /// exists; the timed skip for unresponsive players is an external job.
    fn night_window(&self, room: &Room, skill: SkillId, phase: PhaseId) -> EnterFlow {
        let holder_alive = room
            .participants
            .iter()
            .any(|p| p.alive && p.has_skill(skill));
        if holder_alive {
            EnterFlow::Wait(instruction_for(phase))
        } else {
            EnterFlow::Auto
        }
    }

    /// Make the night's deaths public.
    fn announce_deaths(&self, room: &mut Room, out: &mut Outbox) -> Result<(), DomainError> {
        let pending = std::mem::take(&mut room.scratch.pending_deaths);
        if pending.is_empty() {
            note(room, out, "a peaceful night, no one died".into());
            return Ok(());
        }
        for seat in &pending {
            if let Some(p) = room.by_seat_mut(*seat) {
                p.alive = false;
            }
            room.scratch.dying.push(*seat);
        }
        let seats: Vec<String> = pending.iter().map(|s| s.to_string()).collect();
        note(
            room,
            out,
            format!(
                "last night, these seats fell, in no particular order: {}",
                seats.join(", ")
            ),
        );
        Ok(())
    }

    /// Close the candidacy window: freeze the electorate and candidates.
    fn close_candidacy(&self, room: &mut Room, out: &mut Outbox) {
        let living = room.living_seats();
        let candidates: Vec<Seat> = living
            .iter()
            .copied()
            .filter(|seat| room.by_seat(*seat).is_some_and(|p| p.has_tag(Tag::Elect)))
            .collect();
        let electors: Vec<Seat> = living
            .iter()
            .copied()
            .filter(|seat| !candidates.contains(seat))
            .collect();

        if candidates.is_empty() {
            note(room, out, "no one ran for captain".into());
            self.drop_election_phases(room);
        } else if candidates.len() == 1 {
            self.elect_captain(room, candidates[0], out);
            self.drop_election_phases(room);
        } else if electors.is_empty() {
            note(
                room,
                out,
                "everyone ran for captain, the election is cancelled".into(),
            );
            self.drop_election_phases(room);
        } else {
            room.scratch.ballot_candidates = candidates;
            room.scratch.ballot_electors = electors;
            room.scratch.ballots.clear();
        }
    }

    /// Tally a captain vote; a tie splices the runoff pair, a runoff tie
    /// ends the election with no captain.
    fn close_captain_vote(&self, room: &mut Room, phase: PhaseId, out: &mut Outbox) {
        let report = tally(
            &room.scratch.ballot_electors,
            &room.scratch.ballot_candidates,
            &room.scratch.ballots,
            room.captain_seat,
        );
        match report.outcome {
            VoteOutcome::Decided(seat) => self.elect_captain(room, seat, out),
            VoteOutcome::Tie(tied) if phase == PhaseId::ElectVote => {
                let seats: Vec<String> = tied.iter().map(|s| s.to_string()).collect();
                note(
                    room,
                    out,
                    format!("the captain vote tied between seats {}", seats.join(", ")),
                );
                room.insert_phases_after_cursor(&[PhaseId::ElectPkTalk, PhaseId::ElectPkVote]);
                room.scratch.ballot_electors = runoff_electors(
                    &room.scratch.ballot_electors,
                    &room.scratch.ballot_candidates,
                    &tied,
                );
                room.scratch.ballot_candidates = tied;
                room.scratch.ballots.clear();
            }
            VoteOutcome::Tie(_) | VoteOutcome::NoValidBallots => {
                note(room, out, "the election ends with no captain".into());
            }
        }
    }

    /// Tally a day vote; the winner is eliminated, a tie splices the runoff
    /// pair, a runoff tie is a peace result.
    fn close_day_vote(
        &self,
        room: &mut Room,
        phase: PhaseId,
        out: &mut Outbox,
    ) -> Result<(), DomainError> {
        let report = tally(
            &room.scratch.ballot_electors,
            &room.scratch.ballot_candidates,
            &room.scratch.ballots,
            room.captain_seat,
        );
        match report.outcome {
            VoteOutcome::Decided(seat) => {
                self.eliminate(room, seat, out, "was voted out")?;
            }
            VoteOutcome::Tie(tied) if phase == PhaseId::Vote => {
                let seats: Vec<String> = tied.iter().map(|s| s.to_string()).collect();
                note(
                    room,
                    out,
                    format!("the vote tied between seats {}", seats.join(", ")),
                );
                room.insert_phases_after_cursor(&[PhaseId::PkTalk, PhaseId::PkVote]);
                room.scratch.ballot_electors = runoff_electors(
                    &room.scratch.ballot_electors,
                    &room.scratch.ballot_candidates,
                    &tied,
                );
                room.scratch.ballot_candidates = tied;
                room.scratch.ballots.clear();
            }
            VoteOutcome::Tie(_) => {
                // Runoff tied again: peace, and the last-words slot for the
                // would-be eliminee goes away.
                note(room, out, "the runoff tied again, no one is voted out".into());
                room.remove_phase_after_cursor(PhaseId::LastWords);
            }
            VoteOutcome::NoValidBallots => {
                note(room, out, "no valid ballots, no one is voted out".into());
            }
        }
        Ok(())
    }

    pub(super) fn elect_captain(&self, room: &mut Room, seat: Seat, out: &mut Outbox) {
        room.captain_seat = Some(seat);
        info!(room_id = room.room_id, seat, "captain elected");
        note(room, out, format!("seat {seat} is elected captain"));
    }

    /// Splice out whatever is left of the election block.
    pub(super) fn drop_election_phases(&self, room: &mut Room) {
        for phase in [
            PhaseId::ElectTalk,
            PhaseId::ElectVote,
            PhaseId::ElectPkTalk,
            PhaseId::ElectPkVote,
        ] {
            while room.remove_phase_after_cursor(phase) {}
        }
    }

    /// Direct elimination: vote result, revenge shot or detonation. The
    /// win evaluator runs before this returns.
    pub(super) fn eliminate(
        &self,
        room: &mut Room,
        seat: Seat,
        out: &mut Outbox,
        cause: &str,
    ) -> Result<(), DomainError> {
        match room.by_seat_mut(seat) {
            Some(p) if p.alive => p.alive = false,
            Some(_) => return Ok(()),
            None => return Err(DomainError::cannot_act("no such seat")),
        }
        room.scratch.dying.push(seat);
        note(room, out, format!("seat {seat} {cause}"));
        check_win(room)
    }
}
