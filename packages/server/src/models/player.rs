use serde::{Deserialize, Serialize};

use super::role::RoleCapability;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub role: RoleCapability,
    pub alive: bool,
    pub is_automated: bool,
    pub is_sheriff: bool,
    /// Weighted votes received in the tally currently in progress.
    pub vote_accumulator: f64,
}

impl Participant {
    pub fn new(name: impl Into<String>, role: RoleCapability, is_automated: bool) -> Self {
        Self {
            name: name.into(),
            role,
            alive: true,
            is_automated,
            is_sheriff: false,
            vote_accumulator: 0.0,
        }
    }

    pub fn human(name: impl Into<String>, role: RoleCapability) -> Self {
        Self::new(name, role, false)
    }

    pub fn automated(name: impl Into<String>, role: RoleCapability) -> Self {
        Self::new(name, role, true)
    }

    pub fn is_wolf(&self) -> bool {
        self.role.is_wolf()
    }
}
