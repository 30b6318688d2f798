//! One handler per player-initiated verb.
//!
//! Every handler resolves the actor and room under the room's lease,
//! validates against the current phase and participant state, applies a
//! single state delta, advances the scheduler when the phase's completion
//! predicate is now met, and returns a confirmation echoing the chosen
//! target. Anything else is the standardized "cannot act" rejection with
//! no state mutation.

use tracing::{debug, info};

use super::{note, ActionReply, GameFlowService};
use crate::domain::ballot::Ballot;
use crate::domain::catalog::{GroupType, PhaseId, SkillId, StatusCode, Tag, WitchMode, WolfMode};
use crate::domain::night::{KillChoice, KillDecision};
use crate::domain::participant::{ability, Seat, UserId, NO_SEAT};
use crate::domain::room::Room;
use crate::error::EngineError;
use crate::errors::domain::DomainError;

/// Witch's move during the potion window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotionChoice {
    /// Save tonight's attack victim.
    Antidote,
    Poison(Seat),
    Pass,
}

/// Candidacy verbs during the election.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectAction {
    Declare,
    Decline,
    Withdraw,
}

const SPEECH_PHASES: &[PhaseId] = &[
    PhaseId::Talk,
    PhaseId::ElectTalk,
    PhaseId::PkTalk,
    PhaseId::ElectPkTalk,
    PhaseId::LastWords,
];

const DAY_SPEECH_PHASES: &[PhaseId] = &[
    PhaseId::Talk,
    PhaseId::ElectTalk,
    PhaseId::PkTalk,
    PhaseId::ElectPkTalk,
];

const VOTE_PHASES: &[PhaseId] = &[
    PhaseId::Vote,
    PhaseId::PkVote,
    PhaseId::ElectVote,
    PhaseId::ElectPkVote,
];

fn require_phase(room: &Room, allowed: &[PhaseId]) -> Result<PhaseId, DomainError> {
    match room.current_phase() {
        Some(phase) if allowed.contains(&phase) => Ok(phase),
        _ => Err(DomainError::cannot_act(
            "this action does not fit the current phase",
        )),
    }
}

/// Resolve the acting participant's seat; dead or unseated actors are out.
fn living_actor_seat(room: &Room, user_id: UserId) -> Result<Seat, DomainError> {
    let p = room.by_user(user_id).ok_or_else(|| {
        DomainError::rejected(StatusCode::NotInRoom, "you are not in this room")
    })?;
    if p.seat == NO_SEAT {
        return Err(DomainError::cannot_act("you have not taken a seat"));
    }
    if !p.alive {
        return Err(DomainError::cannot_act("the dead cannot act"));
    }
    Ok(p.seat)
}

/// Resolve an actor inside their death window (announced, last words open).
fn dying_actor_seat(room: &Room, user_id: UserId) -> Result<Seat, DomainError> {
    let p = room.by_user(user_id).ok_or_else(|| {
        DomainError::rejected(StatusCode::NotInRoom, "you are not in this room")
    })?;
    if !room.scratch.dying.contains(&p.seat) {
        return Err(DomainError::cannot_act("only a dying player may do this"));
    }
    Ok(p.seat)
}

fn require_living_target(room: &Room, seat: Seat) -> Result<(), DomainError> {
    match room.by_seat(seat) {
        Some(p) if p.alive => Ok(()),
        Some(_) => Err(DomainError::cannot_act("that player is already dead")),
        None => Err(DomainError::cannot_act("no one sits in that seat")),
    }
}

impl GameFlowService {
    /// Cast a ballot in the current vote or runoff.
    pub async fn vote(&self, user_id: UserId, ballot: Ballot) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            require_phase(room, VOTE_PHASES)?;
            let actor = living_actor_seat(room, user_id)?;

            if !room.scratch.ballot_electors.contains(&actor) {
                return Err(DomainError::cannot_act("you are not part of this electorate"));
            }
            if room.scratch.ballots.contains_key(&actor) {
                return Err(DomainError::cannot_act("you already voted"));
            }
            if let Ballot::For(target) = ballot {
                if !room.scratch.ballot_candidates.contains(&target) {
                    return Err(DomainError::cannot_act("that seat is not a candidate"));
                }
            }

            room.scratch.ballots.insert(actor, ballot);
            debug!(room_id = room.room_id, seat = actor, "ballot recorded");

            let message = match ballot {
                Ballot::For(target) => format!("you voted for seat {target}"),
                Ballot::Abstain => "you abstained".to_string(),
            };

            // Electorate fully covered: finalize without waiting for the host.
            if room.scratch.ballots.len() >= room.scratch.ballot_electors.len() {
                self.advance(room, out)?;
            }
            Ok(ActionReply::ok(message))
        })
        .await
    }

    /// Submit a night-attack choice during the kill window.
    pub async fn wolf_kill(
        &self,
        user_id: UserId,
        choice: KillChoice,
    ) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            require_phase(room, &[PhaseId::WolfKill])?;
            let actor = living_actor_seat(room, user_id)?;

            let p = room.by_seat(actor).ok_or_else(|| {
                DomainError::cannot_act("no such seat")
            })?;
            if !p.has_tag(Tag::AttackableWolf) || !p.has_skill(SkillId::WolfKill) {
                return Err(DomainError::cannot_act("you have no night attack"));
            }
            if let KillChoice::Seat(target) = choice {
                require_living_target(room, target)?;
            }
            if room.scratch.wolf_votes.contains_key(&actor) {
                return Err(DomainError::cannot_act("you already chose tonight"));
            }
            if room.wolf_mode == WolfMode::FirstDecision
                && room.scratch.wolf_decision != KillDecision::Pending
            {
                return Err(DomainError::cannot_act("the night attack is already decided"));
            }

            room.scratch.wolf_votes.insert(actor, choice);
            if room.wolf_mode == WolfMode::FirstDecision {
                if let KillChoice::Seat(target) = choice {
                    room.scratch.wolf_decision = KillDecision::Kill(target);
                }
            }
            debug!(room_id = room.room_id, seat = actor, "attack choice recorded");

            let message = match choice {
                KillChoice::Seat(target) => format!("you chose seat {target}"),
                KillChoice::NoOne => "you chose no target".to_string(),
            };

            let wolves = room.living_seats_with_tag(Tag::AttackableWolf);
            let all_submitted = wolves
                .iter()
                .all(|seat| room.scratch.wolf_votes.contains_key(seat));
            let complete = match room.wolf_mode {
                WolfMode::FirstDecision => {
                    room.scratch.wolf_decision != KillDecision::Pending || all_submitted
                }
                WolfMode::AllAgree => all_submitted,
            };
            if complete {
                self.advance(room, out)?;
            }
            Ok(ActionReply::ok(message))
        })
        .await
    }

    /// Inspect a player's alignment. Single-shot per night; the result
    /// reveals only wolf-aligned or not, never the role.
    pub async fn investigate(
        &self,
        user_id: UserId,
        target: Seat,
    ) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            require_phase(room, &[PhaseId::SeerVerify])?;
            let actor = living_actor_seat(room, user_id)?;

            let p = room.by_seat(actor).ok_or_else(|| {
                DomainError::cannot_act("no such seat")
            })?;
            if !p.has_skill(SkillId::Discover) {
                return Err(DomainError::cannot_act("you cannot inspect anyone"));
            }
            if target == actor {
                return Err(DomainError::cannot_act("you cannot inspect yourself"));
            }
            require_living_target(room, target)?;
            if room.scratch.seer_target.is_some() {
                return Err(DomainError::cannot_act("you already inspected tonight"));
            }

            room.scratch.seer_target = Some(target);
            let wolf_aligned = room
                .by_seat(target)
                .is_some_and(|t| t.group_type == GroupType::Wolves);
            debug!(room_id = room.room_id, seat = actor, target, "inspection recorded");

            self.advance(room, out)?;
            Ok(ActionReply::ok(format!(
                "seat {target} is {}",
                if wolf_aligned {
                    "wolf-aligned"
                } else {
                    "not wolf-aligned"
                }
            )))
        })
        .await
    }

    /// Use the antidote or the poison, or pass. The two potions cannot be
    /// combined in one night and each is single-shot per game.
    pub async fn witch_potion(
        &self,
        user_id: UserId,
        choice: PotionChoice,
    ) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            require_phase(room, &[PhaseId::WitchPotion])?;
            let actor = living_actor_seat(room, user_id)?;

            let p = room.by_seat(actor).ok_or_else(|| {
                DomainError::cannot_act("no such seat")
            })?;
            if !p.has_skill(SkillId::Potion) && !p.has_skill(SkillId::Toxic) {
                return Err(DomainError::cannot_act("you have no potions"));
            }

            let message = match choice {
                PotionChoice::Antidote => {
                    if !p.ability_flag(ability::ANTIDOTE) {
                        return Err(DomainError::cannot_act("the antidote is already spent"));
                    }
                    if room.scratch.poison_target.is_some() {
                        return Err(DomainError::cannot_act(
                            "the potions cannot be combined in one night",
                        ));
                    }
                    let KillDecision::Kill(victim) = room.scratch.wolf_decision else {
                        return Err(DomainError::cannot_act("there is no one to save tonight"));
                    };
                    if victim == actor {
                        let allowed = match room.witch_mode {
                            WitchMode::CanSaveSelf => true,
                            WitchMode::FirstNightOnly => room.day_count == 1,
                            WitchMode::CannotSaveSelf => false,
                        };
                        if !allowed {
                            return Err(DomainError::cannot_act("you may not save yourself"));
                        }
                    }
                    room.scratch.antidote_used = true;
                    if let Some(p) = room.by_seat_mut(actor) {
                        p.spend_ability(ability::ANTIDOTE);
                    }
                    "you used the antidote".to_string()
                }
                PotionChoice::Poison(target) => {
                    if !p.ability_flag(ability::POISON) {
                        return Err(DomainError::cannot_act("the poison is already spent"));
                    }
                    if room.scratch.antidote_used {
                        return Err(DomainError::cannot_act(
                            "the potions cannot be combined in one night",
                        ));
                    }
                    require_living_target(room, target)?;
                    room.scratch.poison_target = Some(target);
                    if let Some(p) = room.by_seat_mut(actor) {
                        p.spend_ability(ability::POISON);
                    }
                    format!("you poisoned seat {target}")
                }
                PotionChoice::Pass => "you used no potion".to_string(),
            };
            debug!(room_id = room.room_id, seat = actor, "potion window closed");

            self.advance(room, out)?;
            Ok(ActionReply::ok(message))
        })
        .await
    }

    /// Protect a seat for the night, or no one. The same seat cannot be
    /// protected on consecutive uses.
    pub async fn guard_protect(
        &self,
        user_id: UserId,
        target: Option<Seat>,
    ) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            require_phase(room, &[PhaseId::GuardProtect])?;
            let actor = living_actor_seat(room, user_id)?;

            let last = {
                let p = room.by_seat(actor).ok_or_else(|| {
                    DomainError::cannot_act("no such seat")
                })?;
                if !p.has_skill(SkillId::Guard) {
                    return Err(DomainError::cannot_act("you cannot protect anyone"));
                }
                p.ability_seat(ability::GUARD_LAST)
            };

            let message = match target {
                Some(seat) => {
                    require_living_target(room, seat)?;
                    if last == Some(seat) {
                        return Err(DomainError::cannot_act(
                            "you cannot protect the same player on consecutive nights",
                        ));
                    }
                    room.scratch.guard_target = Some(seat);
                    if let Some(p) = room.by_seat_mut(actor) {
                        p.set_ability_seat(ability::GUARD_LAST, Some(seat));
                    }
                    format!("you protect seat {seat} tonight")
                }
                None => {
                    room.scratch.guard_target = None;
                    if let Some(p) = room.by_seat_mut(actor) {
                        p.set_ability_seat(ability::GUARD_LAST, None);
                    }
                    "you protect no one tonight".to_string()
                }
            };
            debug!(room_id = room.room_id, seat = actor, "protection recorded");

            self.advance(room, out)?;
            Ok(ActionReply::ok(message))
        })
        .await
    }

    /// End the current speech phase.
    pub async fn end_speech(&self, user_id: UserId) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            let phase = require_phase(room, SPEECH_PHASES)?;
            let actor = if phase == PhaseId::LastWords {
                dying_actor_seat(room, user_id)?
            } else {
                living_actor_seat(room, user_id)?
            };
            let speak_eligible = room
                .by_seat(actor)
                .is_some_and(|p| p.speak_eligible);
            if !speak_eligible {
                return Err(DomainError::cannot_act("you may not speak"));
            }

            self.advance(room, out)?;
            Ok(ActionReply::ok("the speech is over"))
        })
        .await
    }

    /// Declare, decline or withdraw candidacy for captain.
    pub async fn elect(
        &self,
        user_id: UserId,
        action: ElectAction,
    ) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            match action {
                ElectAction::Declare | ElectAction::Decline => {
                    require_phase(room, &[PhaseId::Elect])?;
                    let actor = living_actor_seat(room, user_id)?;
                    let already = room.by_seat(actor).is_some_and(|p| {
                        p.has_tag(Tag::Elect) || p.has_tag(Tag::NotElect)
                    });
                    if already {
                        return Err(DomainError::cannot_act("you already declared"));
                    }
                    let tag = if action == ElectAction::Declare {
                        Tag::Elect
                    } else {
                        Tag::NotElect
                    };
                    if let Some(p) = room.by_seat_mut(actor) {
                        p.add_tag(tag);
                    }
                    debug!(room_id = room.room_id, seat = actor, tag = tag.code(), "candidacy recorded");

                    // Candidacy closes itself once every living seat spoke up.
                    let all_declared = room.living_seats().iter().all(|seat| {
                        room.by_seat(*seat).is_some_and(|p| {
                            p.has_tag(Tag::Elect) || p.has_tag(Tag::NotElect)
                        })
                    });
                    if all_declared {
                        self.advance(room, out)?;
                    }
                    Ok(ActionReply::ok(if action == ElectAction::Declare {
                        "you are running for captain"
                    } else {
                        "you are not running for captain"
                    }))
                }
                ElectAction::Withdraw => {
                    require_phase(room, &[PhaseId::ElectTalk, PhaseId::ElectPkTalk])?;
                    let actor = living_actor_seat(room, user_id)?;
                    if !room.scratch.ballot_candidates.contains(&actor) {
                        return Err(DomainError::cannot_act("you are not a candidate"));
                    }
                    if let Some(p) = room.by_seat_mut(actor) {
                        p.remove_tag(Tag::Elect);
                        p.add_tag(Tag::GiveUpElect);
                    }
                    room.scratch.ballot_candidates.retain(|seat| *seat != actor);
                    note(room, out, format!("seat {actor} withdrew from the election"));

                    match room.scratch.ballot_candidates.len() {
                        0 => {
                            note(room, out, "every candidate withdrew, no captain".into());
                            self.drop_election_phases(room);
                            self.advance(room, out)?;
                        }
                        1 => {
                            let last = room.scratch.ballot_candidates[0];
                            self.elect_captain(room, last, out);
                            self.drop_election_phases(room);
                            self.advance(room, out)?;
                        }
                        _ => {}
                    }
                    Ok(ActionReply::ok("you withdrew from the election"))
                }
            }
        })
        .await
    }

    /// Pass the captaincy on while dying.
    pub async fn handover_captain(
        &self,
        user_id: UserId,
        target: Seat,
    ) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            require_phase(room, &[PhaseId::UseSkills, PhaseId::LastWords])?;
            let actor = dying_actor_seat(room, user_id)?;
            if room.captain_seat != Some(actor) {
                return Err(DomainError::cannot_act("only the captain may hand over"));
            }
            if target == actor {
                return Err(DomainError::cannot_act("choose another player"));
            }
            require_living_target(room, target)?;

            room.captain_seat = Some(target);
            info!(room_id = room.room_id, from = actor, to = target, "captaincy handed over");
            note(room, out, format!("the captaincy passes to seat {target}"));
            Ok(ActionReply::ok(format!("seat {target} is the new captain")))
        })
        .await
    }

    /// Revenge shot of a dying marksman: eliminates the target directly.
    pub async fn shoot(&self, user_id: UserId, target: Seat) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            require_phase(room, &[PhaseId::UseSkills])?;
            let actor = dying_actor_seat(room, user_id)?;

            let armed = room.by_seat(actor).is_some_and(|p| {
                p.has_skill(SkillId::Shoot) && p.ability_flag(ability::SHOOT)
            });
            if !armed {
                return Err(DomainError::cannot_act("you have no shot to take"));
            }
            if target == actor {
                return Err(DomainError::cannot_act("choose another player"));
            }
            require_living_target(room, target)?;

            if let Some(p) = room.by_seat_mut(actor) {
                p.spend_ability(ability::SHOOT);
            }
            info!(room_id = room.room_id, seat = actor, target, "revenge shot");
            self.eliminate(room, target, out, &format!("was shot by seat {actor}"))?;
            self.advance(room, out)?;
            Ok(ActionReply::ok(format!("you shot seat {target}")))
        })
        .await
    }

    /// Self-detonation of a wolf during day speeches: direct elimination,
    /// then the rest of the day is cut short and night falls.
    pub async fn suicide(
        &self,
        user_id: UserId,
        take_along: Option<Seat>,
    ) -> Result<ActionReply, EngineError> {
        self.with_room(user_id, |room, out| {
            require_phase(room, DAY_SPEECH_PHASES)?;
            let actor = living_actor_seat(room, user_id)?;

            let p = room.by_seat(actor).ok_or_else(|| {
                DomainError::cannot_act("no such seat")
            })?;
            if !p.has_skill(SkillId::Suicide) || !p.has_tag(Tag::AttackableWolf) {
                return Err(DomainError::cannot_act("you cannot self-detonate"));
            }
            if let Some(target) = take_along {
                if !p.ability_flag(ability::DETONATE) {
                    return Err(DomainError::cannot_act(
                        "you cannot take anyone along",
                    ));
                }
                if target == actor {
                    return Err(DomainError::cannot_act("choose another player"));
                }
                require_living_target(room, target)?;
            }

            info!(room_id = room.room_id, seat = actor, "self-detonation");
            self.eliminate(room, actor, out, "self-detonated")?;
            if let Some(target) = take_along {
                if let Some(p) = room.by_seat_mut(actor) {
                    p.spend_ability(ability::DETONATE);
                }
                self.eliminate(room, target, out, &format!("was taken along by seat {actor}"))?;
            }

            // Detonation ends the day on the spot; no last words.
            room.truncate_day_after_cursor();
            room.scratch.dying.clear();
            self.advance(room, out)?;
            Ok(ActionReply::ok("you self-detonated, night falls"))
        })
        .await
    }
}
