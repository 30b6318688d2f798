//! Per-player in-room state.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::catalog::{CaptainMode, GroupType, RoleType, SkillId, Tag};

pub type UserId = i64;
pub type RoomId = i64;
/// Seat position, 1..=N once seated. `NO_SEAT` before seating.
pub type Seat = i16;

pub const NO_ROOM: RoomId = -1;
pub const NO_SEAT: Seat = -1;

/// Keys of the per-role ability bag. Handlers check key presence, not role
/// identity, so new roles can be added without touching the scheduler.
pub mod ability {
    /// Witch: antidote still available this game.
    pub const ANTIDOTE: &str = "antidote";
    /// Witch: poison still available this game.
    pub const POISON: &str = "poison";
    /// Guard: seat protected on the most recent use.
    pub const GUARD_LAST: &str = "guard_last";
    /// Hunter: revenge shot still armed.
    pub const SHOOT: &str = "shoot";
    /// White wolf: detonation may take a target along.
    pub const DETONATE: &str = "detonate";
}

/// One player's state inside a room, for one room-lifetime slot.
///
/// Invariant: `role_type == Unknown` implies `skills` is empty and
/// `alive` is true.
#[derive(Debug, Clone)]
pub struct Participant {
    pub user_id: UserId,
    /// `NO_ROOM` when not seated in any room.
    pub room_id: RoomId,
    /// `NO_SEAT` before the player claims a position.
    pub seat: Seat,
    pub role_type: RoleType,
    pub group_type: GroupType,
    pub alive: bool,
    pub vote_eligible: bool,
    pub speak_eligible: bool,
    /// Abilities usable this game, in deal order.
    pub skills: Vec<SkillId>,
    pub tags: Vec<Tag>,
    /// Per-role consumable flags and memory, populated at deal time.
    pub ability_state: BTreeMap<String, Value>,
}

impl Participant {
    pub fn new(user_id: UserId, room_id: RoomId) -> Self {
        Self {
            user_id,
            room_id,
            seat: NO_SEAT,
            role_type: RoleType::Unknown,
            group_type: GroupType::Unknown,
            alive: true,
            vote_eligible: true,
            speak_eligible: true,
            skills: Vec::new(),
            tags: Vec::new(),
            ability_state: BTreeMap::new(),
        }
    }

    /// Restore the undealt state. Seat and room binding are preserved so the
    /// roster can replay without re-seating.
    pub fn reset(&mut self) {
        self.role_type = RoleType::Unknown;
        self.group_type = GroupType::Unknown;
        self.alive = true;
        self.vote_eligible = true;
        self.speak_eligible = true;
        self.skills.clear();
        self.tags.clear();
        self.ability_state.clear();
    }

    /// Outfit the participant with a dealt role: alignment, skills, tags and
    /// the ability bag keys that role consumes.
    pub fn prepare(&mut self, role_type: RoleType, captain_mode: CaptainMode) {
        self.role_type = role_type;
        self.group_type = role_type.group();
        self.skills.clear();
        self.tags.clear();
        self.ability_state.clear();

        self.skills.push(SkillId::Vote);
        if captain_mode == CaptainMode::WithCaptain {
            self.skills.push(SkillId::Captain);
        }

        match role_type {
            RoleType::Seer => {
                self.skills.push(SkillId::Discover);
            }
            RoleType::Witch => {
                self.skills.push(SkillId::Potion);
                self.skills.push(SkillId::Toxic);
                self.ability_state
                    .insert(ability::ANTIDOTE.into(), Value::Bool(true));
                self.ability_state
                    .insert(ability::POISON.into(), Value::Bool(true));
            }
            RoleType::Hunter => {
                self.skills.push(SkillId::Shoot);
                self.ability_state
                    .insert(ability::SHOOT.into(), Value::Bool(true));
            }
            RoleType::Guard => {
                self.skills.push(SkillId::Guard);
                self.ability_state
                    .insert(ability::GUARD_LAST.into(), Value::Null);
            }
            RoleType::NormalWolf => {
                self.skills.push(SkillId::WolfKill);
                self.skills.push(SkillId::Suicide);
                self.tags.push(Tag::AttackableWolf);
            }
            RoleType::WhiteWolf => {
                self.skills.push(SkillId::WolfKill);
                self.skills.push(SkillId::Suicide);
                self.tags.push(Tag::AttackableWolf);
                self.ability_state
                    .insert(ability::DETONATE.into(), Value::Bool(true));
            }
            RoleType::Villager | RoleType::Unknown => {}
        }
    }

    pub fn has_skill(&self, skill: SkillId) -> bool {
        self.skills.contains(&skill)
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn add_tag(&mut self, tag: Tag) {
        if !self.has_tag(tag) {
            self.tags.push(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: Tag) {
        self.tags.retain(|t| *t != tag);
    }

    /// True when the ability key is present and set.
    pub fn ability_flag(&self, key: &str) -> bool {
        matches!(self.ability_state.get(key), Some(Value::Bool(true)))
    }

    /// Consume a one-shot ability flag. Returns false if it was not armed.
    pub fn spend_ability(&mut self, key: &str) -> bool {
        if self.ability_flag(key) {
            self.ability_state.insert(key.into(), Value::Bool(false));
            true
        } else {
            false
        }
    }

    pub fn ability_seat(&self, key: &str) -> Option<Seat> {
        match self.ability_state.get(key) {
            Some(Value::Number(n)) => n.as_i64().map(|v| v as Seat),
            _ => None,
        }
    }

    pub fn set_ability_seat(&mut self, key: &str, seat: Option<Seat>) {
        let value = match seat {
            Some(s) => Value::from(s as i64),
            None => Value::Null,
        };
        self.ability_state.insert(key.into(), value);
    }
}
