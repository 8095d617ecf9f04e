use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::game::{GamePhase, GameResult, GameState};

pub const HIDDEN_ROLE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub name: String,
    pub role: String,
    pub alive: bool,
    pub is_sheriff: bool,
}

/// The game as one participant is allowed to see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub viewer: String,
    pub role: String,
    pub players: Vec<PlayerStatus>,
    pub day_count: u32,
}

impl StatusSnapshot {
    /// Returns `None` if `viewer` is not seated in this game.
    pub fn for_viewer(game: &GameState, viewer: &str) -> Option<Self> {
        let me = game.participant(viewer)?;
        let players = game
            .participants
            .iter()
            .map(|p| {
                let visible = p.name == me.name || (p.is_wolf() && me.is_wolf());
                PlayerStatus {
                    name: p.name.clone(),
                    role: if visible {
                        p.role.name().to_string()
                    } else {
                        HIDDEN_ROLE.to_string()
                    },
                    alive: p.alive,
                    is_sheriff: p.is_sheriff,
                }
            })
            .collect();

        Some(StatusSnapshot {
            viewer: me.name.clone(),
            role: me.role.name().to_string(),
            players,
            day_count: game.day_count,
        })
    }
}

/// Spectator view served by the status API. No roles are revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicSnapshot {
    pub session_id: String,
    pub phase: GamePhase,
    pub result: GameResult,
    pub day_count: u32,
    pub sheriff: Option<String>,
    pub players: Vec<PlayerStatus>,
    pub updated_at: DateTime<Utc>,
}

impl PublicSnapshot {
    pub fn from_game(game: &GameState) -> Self {
        PublicSnapshot {
            session_id: game.session_id.clone(),
            phase: game.phase,
            result: game.result,
            day_count: game.day_count,
            sheriff: game.sheriff.clone(),
            players: game
                .participants
                .iter()
                .map(|p| PlayerStatus {
                    name: p.name.clone(),
                    role: HIDDEN_ROLE.to_string(),
                    alive: p.alive,
                    is_sheriff: p.is_sheriff,
                })
                .collect(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{player::Participant, role::RoleCapability};

    fn game() -> GameState {
        GameState::with_participants(vec![
            Participant::human("ann", RoleCapability::Wolf),
            Participant::human("bob", RoleCapability::Wolf),
            Participant::human("cat", RoleCapability::Seer),
            Participant::automated("dan", RoleCapability::Villager),
        ])
        .unwrap()
    }

    fn roles(snapshot: &StatusSnapshot) -> Vec<&str> {
        snapshot.players.iter().map(|p| p.role.as_str()).collect()
    }

    #[test]
    fn wolves_see_each_other() {
        let snapshot = StatusSnapshot::for_viewer(&game(), "ann").unwrap();
        assert_eq!(snapshot.role, "Wolf");
        assert_eq!(roles(&snapshot), vec!["Wolf", "Wolf", "unknown", "unknown"]);
    }

    #[test]
    fn good_players_only_see_themselves() {
        let snapshot = StatusSnapshot::for_viewer(&game(), "cat").unwrap();
        assert_eq!(roles(&snapshot), vec!["unknown", "unknown", "Seer", "unknown"]);
        assert!(StatusSnapshot::for_viewer(&game(), "zed").is_none());
    }

    #[test]
    fn public_snapshot_hides_everything() {
        let mut g = game();
        g.assign_sheriff("dan").unwrap();
        let snapshot = PublicSnapshot::from_game(&g);
        assert!(snapshot.players.iter().all(|p| p.role == HIDDEN_ROLE));
        assert_eq!(snapshot.sheriff.as_deref(), Some("dan"));
        assert_eq!(snapshot.result, GameResult::InProgress);
    }
}
