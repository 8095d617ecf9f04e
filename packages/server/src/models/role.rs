use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::GameError;
use super::player::Participant;

/// Probability that an automated witch spends her antidote when a save target exists.
pub const WITCH_SAVE_CHANCE: f64 = 0.7;
/// Probability that an automated witch spends her poison when a wolf is alive.
pub const WITCH_POISON_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleCapability {
    Wolf,
    Villager,
    Seer,
    Witch {
        has_antidote: bool,
        has_poison: bool,
    },
    Hunter,
}

/// A chosen effect that has not been applied yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    KillVote {
        target: String,
    },
    Potion {
        save: Option<String>,
        poison: Option<String>,
    },
    Reveal {
        target: String,
    },
    Shoot {
        target: String,
    },
    Vote {
        target: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    #[serde(rename = "wolf")]
    Wolf,
    #[serde(rename = "not-wolf")]
    NotWolf,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Wolf => "wolf",
            Alignment::NotWolf => "not-wolf",
        }
    }
}

impl RoleCapability {
    pub fn witch() -> Self {
        RoleCapability::Witch {
            has_antidote: true,
            has_poison: true,
        }
    }

    /// Looks a role up by its configured name.
    pub fn from_name(name: &str) -> Result<Self, GameError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "wolf" | "werewolf" => Ok(RoleCapability::Wolf),
            "villager" => Ok(RoleCapability::Villager),
            "seer" => Ok(RoleCapability::Seer),
            "witch" => Ok(RoleCapability::witch()),
            "hunter" => Ok(RoleCapability::Hunter),
            _ => Err(GameError::UnknownRole(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoleCapability::Wolf => "Wolf",
            RoleCapability::Villager => "Villager",
            RoleCapability::Seer => "Seer",
            RoleCapability::Witch { .. } => "Witch",
            RoleCapability::Hunter => "Hunter",
        }
    }

    pub fn is_wolf(&self) -> bool {
        matches!(self, RoleCapability::Wolf)
    }

    pub fn acts_at_night(&self) -> bool {
        matches!(
            self,
            RoleCapability::Wolf | RoleCapability::Seer | RoleCapability::Witch { .. }
        )
    }

    pub fn has_day_ability(&self) -> bool {
        matches!(self, RoleCapability::Hunter)
    }

    pub fn alignment(&self) -> Alignment {
        if self.is_wolf() {
            Alignment::Wolf
        } else {
            Alignment::NotWolf
        }
    }

    pub fn has_antidote(&self) -> bool {
        matches!(
            self,
            RoleCapability::Witch {
                has_antidote: true,
                ..
            }
        )
    }

    pub fn has_poison(&self) -> bool {
        matches!(
            self,
            RoleCapability::Witch {
                has_poison: true,
                ..
            }
        )
    }

    /// Returns `true` if an antidote was available and is now spent.
    pub fn consume_antidote(&mut self) -> bool {
        match self {
            RoleCapability::Witch { has_antidote, .. } if *has_antidote => {
                *has_antidote = false;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if a poison was available and is now spent.
    pub fn consume_poison(&mut self) -> bool {
        match self {
            RoleCapability::Witch { has_poison, .. } if *has_poison => {
                *has_poison = false;
                true
            }
            _ => false,
        }
    }

    /// Automated night policy. `me` must be the participant holding this role.
    pub fn act_night<R: Rng + ?Sized>(
        &self,
        me: &Participant,
        roster: &[Participant],
        rng: &mut R,
    ) -> Option<Intent> {
        match self {
            RoleCapability::Wolf => {
                let targets: Vec<&Participant> = roster
                    .iter()
                    .filter(|p| p.alive && !p.is_wolf())
                    .collect();
                targets.choose(rng).map(|t| Intent::KillVote {
                    target: t.name.clone(),
                })
            }
            RoleCapability::Seer => {
                let targets: Vec<&Participant> = roster
                    .iter()
                    .filter(|p| p.alive && p.name != me.name)
                    .collect();
                targets.choose(rng).map(|t| Intent::Reveal {
                    target: t.name.clone(),
                })
            }
            RoleCapability::Witch {
                has_antidote,
                has_poison,
            } => {
                let mut save = None;
                let mut poison = None;

                if *has_antidote {
                    let dead: Vec<&Participant> = roster
                        .iter()
                        .filter(|p| !p.alive && !p.is_wolf())
                        .collect();
                    if !dead.is_empty() && rng.gen_bool(WITCH_SAVE_CHANCE) {
                        save = dead.choose(rng).map(|t| t.name.clone());
                    }
                }

                if *has_poison {
                    let wolves: Vec<&Participant> =
                        roster.iter().filter(|p| p.alive && p.is_wolf()).collect();
                    if !wolves.is_empty() && rng.gen_bool(WITCH_POISON_CHANCE) {
                        poison = wolves.choose(rng).map(|t| t.name.clone());
                    }
                }

                if save.is_none() && poison.is_none() {
                    None
                } else {
                    Some(Intent::Potion { save, poison })
                }
            }
            RoleCapability::Villager | RoleCapability::Hunter => None,
        }
    }

    /// Automated day ability. Only a hunter who has just died produces anything.
    pub fn act_day<R: Rng + ?Sized>(
        &self,
        me: &Participant,
        roster: &[Participant],
        rng: &mut R,
    ) -> Option<Intent> {
        match self {
            RoleCapability::Hunter if !me.alive && me.is_automated => {
                let targets: Vec<&Participant> = roster
                    .iter()
                    .filter(|p| p.alive && p.name != me.name)
                    .collect();
                targets.choose(rng).map(|t| Intent::Shoot {
                    target: t.name.clone(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for RoleCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
