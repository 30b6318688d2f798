//! Closed catalogs: every enum the engine persists or puts on the wire.
//!
//! Each member carries a stable numeric identity (used for persistence and
//! wire messages) and a display label (used in player-facing text). Equality
//! and set membership are always by numeric identity, never by label.

use serde::{Deserialize, Serialize};

/// Declares a catalog enum: explicit `i16` codes, a display label per
/// member, `code()/label()/from_code()`, and serde as the bare code.
macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "i16", try_from = "i16")]
        #[repr(i16)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn code(self) -> i16 {
                self as i16
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_code(code: i16) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<$name> for i16 {
            fn from(value: $name) -> i16 {
                value.code()
            }
        }

        impl TryFrom<i16> for $name {
            type Error = String;

            fn try_from(code: i16) -> Result<Self, Self::Error> {
                Self::from_code(code)
                    .ok_or_else(|| format!("unknown {} code {code}", stringify!($name)))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

catalog_enum! {
    /// How the wolves win.
    VictoryMode {
        /// Wolves win once one full non-wolf faction is exterminated.
        KillSide = 101 => "exterminate one side",
        /// Wolves win only when both non-wolf factions are exterminated.
        KillAll = 102 => "exterminate everyone",
    }
}

catalog_enum! {
    CaptainMode {
        WithCaptain = 201 => "captain election enabled",
        WithoutCaptain = 202 => "no captain election",
    }
}

catalog_enum! {
    /// Whether the witch may spend the antidote on herself.
    WitchMode {
        CanSaveSelf = 301 => "may always self-save",
        FirstNightOnly = 302 => "may self-save on the first night only",
        CannotSaveSelf = 303 => "may never self-save",
    }
}

catalog_enum! {
    RoleType {
        Unknown = 400 => "unknown role",
        Seer = 401 => "seer",
        Hunter = 402 => "hunter",
        Witch = 404 => "witch",
        Villager = 407 => "villager",
        NormalWolf = 408 => "werewolf",
        Guard = 412 => "guard",
        WhiteWolf = 414 => "white wolf king",
    }
}

catalog_enum! {
    GroupType {
        Unknown = 500 => "unknown alignment",
        Wolves = 501 => "the wolves",
        Gods = 502 => "the gods",
        Villagers = 503 => "the villagers",
        /// Winner designation for the combined non-wolf side.
        Good = 505 => "the good people",
    }
}

catalog_enum! {
    /// One named step of a day/night cycle.
    PhaseId {
        TurnNight = 602 => "night falls",
        TurnDay = 603 => "day breaks",
        Elect = 604 => "candidacy",
        ElectTalk = 605 => "candidacy speeches",
        ElectVote = 606 => "captain vote",
        ElectPkTalk = 607 => "captain runoff speeches",
        ElectPkVote = 608 => "captain runoff vote",
        Talk = 609 => "discussion",
        Vote = 610 => "vote",
        PkTalk = 611 => "runoff speeches",
        PkVote = 612 => "runoff vote",
        Announce = 613 => "announcement",
        LastWords = 614 => "last words",
        UseSkills = 615 => "ability resolution",
        WolfKill = 616 => "wolf attack",
        SeerVerify = 617 => "seer inspection",
        WitchPotion = 618 => "witch potions",
        GuardProtect = 619 => "guard protection",
    }
}

catalog_enum! {
    SkillId {
        Vote = 800 => "vote",
        WolfKill = 801 => "night attack",
        Discover = 802 => "inspect alignment",
        Potion = 803 => "antidote",
        Guard = 804 => "protect",
        Shoot = 805 => "revenge shot",
        Suicide = 806 => "self-detonate",
        Toxic = 807 => "poison",
        Captain = 808 => "captaincy",
    }
}

catalog_enum! {
    Tag {
        Elect = 900 => "declared candidacy",
        NotElect = 901 => "declined candidacy",
        GiveUpElect = 902 => "withdrew candidacy",
        AttackableWolf = 1100 => "kill-capable wolf",
    }
}

catalog_enum! {
    /// Night-kill reconciliation mode, fixed at room creation.
    WolfMode {
        /// The first submission of the night is immediately the decision.
        FirstDecision = 1000 => "first decision wins",
        /// Finalized only once every living attacker has submitted.
        AllAgree = 1001 => "all attackers must agree",
    }
}

catalog_enum! {
    GameStatus {
        WaitToStart = 1401 => "waiting for players",
        Ready = 1402 => "cards dealt",
        Day = 1403 => "day",
        Night = 1404 => "night",
        Finished = 1405 => "finished",
    }
}

catalog_enum! {
    /// Player-facing result codes for room and action requests.
    StatusCode {
        Ok = 1 => "OK",
        RoomNotFound = 700 => "that room does not exist",
        RoomFull = 701 => "that room is full",
        AlreadyIn = 702 => "you are already in this room",
        NotInRoom = 704 => "you are not in a room",
        CannotStart = 705 => "not enough seated players to start",
        AlreadyStarted = 708 => "the game has already started",
        SeatOccupied = 709 => "someone is already in that seat",
        CannotAct = 710 => "you cannot do that right now",
        NotVotedYet = 713 => "still waiting on some players",
    }
}

impl RoleType {
    /// Alignment the role belongs to once dealt.
    pub fn group(self) -> GroupType {
        match self {
            RoleType::Unknown => GroupType::Unknown,
            RoleType::Seer | RoleType::Hunter | RoleType::Witch | RoleType::Guard => {
                GroupType::Gods
            }
            RoleType::Villager => GroupType::Villagers,
            RoleType::NormalWolf | RoleType::WhiteWolf => GroupType::Wolves,
        }
    }

    pub fn is_wolf(self) -> bool {
        self.group() == GroupType::Wolves
    }
}

impl WolfMode {
    /// Default reconciliation mode for a card pool: packs made up purely of
    /// plain wolves coordinate on consensus; special wolves fall back to
    /// first-decision-wins.
    pub fn for_cards(cards: &[RoleType]) -> WolfMode {
        let any_special_wolf = cards
            .iter()
            .any(|c| c.is_wolf() && *c != RoleType::NormalWolf);
        if any_special_wolf {
            WolfMode::FirstDecision
        } else {
            WolfMode::AllAgree
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for role in RoleType::ALL {
            assert_eq!(RoleType::from_code(role.code()), Some(*role));
        }
        for phase in PhaseId::ALL {
            assert_eq!(PhaseId::from_code(phase.code()), Some(*phase));
        }
        assert_eq!(GameStatus::from_code(9999), None);
    }

    #[test]
    fn identity_is_numeric_not_label() {
        // Serde round-trips through the bare code.
        let json = serde_json::to_string(&RoleType::Witch).unwrap();
        assert_eq!(json, "404");
        let back: RoleType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RoleType::Witch);
    }

    #[test]
    fn role_groups() {
        assert_eq!(RoleType::NormalWolf.group(), GroupType::Wolves);
        assert_eq!(RoleType::WhiteWolf.group(), GroupType::Wolves);
        assert_eq!(RoleType::Seer.group(), GroupType::Gods);
        assert_eq!(RoleType::Villager.group(), GroupType::Villagers);
        assert_eq!(RoleType::Unknown.group(), GroupType::Unknown);
    }

    #[test]
    fn wolf_mode_for_cards() {
        let plain = vec![
            RoleType::NormalWolf,
            RoleType::NormalWolf,
            RoleType::Villager,
        ];
        assert_eq!(WolfMode::for_cards(&plain), WolfMode::AllAgree);

        let special = vec![RoleType::NormalWolf, RoleType::WhiteWolf];
        assert_eq!(WolfMode::for_cards(&special), WolfMode::FirstDecision);
    }
}
