use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::game::GameResult;
use super::role::{Alignment, Intent};
use super::snapshot::StatusSnapshot;

/// What a participant is asked to decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    SheriffElection {
        candidates: Vec<String>,
    },
    DayVote {
        candidates: Vec<String>,
    },
    WolfKill {
        candidates: Vec<String>,
    },
    Witch {
        has_antidote: bool,
        has_poison: bool,
        dead: Vec<String>,
        alive: Vec<String>,
    },
    SeerCheck {
        candidates: Vec<String>,
    },
    HunterShot {
        candidates: Vec<String>,
    },
}

impl ActionRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ActionRequest::SheriffElection { .. } => "sheriff_election",
            ActionRequest::DayVote { .. } => "day_vote",
            ActionRequest::WolfKill { .. } => "werewolf",
            ActionRequest::Witch { .. } => "witch",
            ActionRequest::SeerCheck { .. } => "seer",
            ActionRequest::HunterShot { .. } => "hunter",
        }
    }

    pub fn to_wire(&self) -> Value {
        match self {
            ActionRequest::SheriffElection { candidates } => json!({
                "type": "sheriff_election",
                "candidates": candidates,
            }),
            ActionRequest::DayVote { candidates } => json!({
                "type": "day_vote",
                "candidates": candidates,
            }),
            ActionRequest::WolfKill { candidates }
            | ActionRequest::SeerCheck { candidates }
            | ActionRequest::HunterShot { candidates } => json!({
                "type": "night_action",
                "action": self.kind(),
                "candidates": candidates,
            }),
            ActionRequest::Witch {
                has_antidote,
                has_poison,
                dead,
                alive,
            } => json!({
                "type": "night_action",
                "action": "witch",
                "has_antidote": has_antidote,
                "has_poison": has_poison,
                "dead_players": dead,
                "alive_players": alive,
            }),
        }
    }

    /// Turns a human answer into an intent. Names outside the offered lists are
    /// treated as no answer.
    pub fn interpret(&self, response: &ActionResponse) -> Option<Intent> {
        let offered = |list: &[String], name: Option<&str>| {
            name.filter(|n| list.iter().any(|c| c.as_str() == *n))
                .map(str::to_string)
        };

        match self {
            ActionRequest::SheriffElection { candidates } | ActionRequest::DayVote { candidates } => {
                offered(candidates, response.vote_name()).map(|target| Intent::Vote { target })
            }
            ActionRequest::WolfKill { candidates } => {
                offered(candidates, response.target_name()).map(|target| Intent::KillVote { target })
            }
            ActionRequest::SeerCheck { candidates } => {
                offered(candidates, response.target_name()).map(|target| Intent::Reveal { target })
            }
            ActionRequest::HunterShot { candidates } => {
                offered(candidates, response.target_name()).map(|target| Intent::Shoot { target })
            }
            ActionRequest::Witch {
                has_antidote,
                has_poison,
                dead,
                alive,
            } => {
                let save = has_antidote
                    .then(|| offered(dead, response.save_name()))
                    .flatten();
                let poison = has_poison
                    .then(|| offered(alive, response.poison_name()))
                    .flatten();
                if save.is_none() && poison.is_none() {
                    None
                } else {
                    Some(Intent::Potion { save, poison })
                }
            }
        }
    }
}

/// A participant's answer. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub vote: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub save: Option<String>,
    #[serde(default)]
    pub poison: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
}

impl ActionResponse {
    pub fn vote(name: impl Into<String>) -> Self {
        Self {
            vote: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn target(name: impl Into<String>) -> Self {
        Self {
            target: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn potion(save: Option<&str>, poison: Option<&str>) -> Self {
        Self {
            save: save.map(str::to_string),
            poison: poison.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn vote_name(&self) -> Option<&str> {
        present(&self.vote)
    }

    pub fn target_name(&self) -> Option<&str> {
        present(&self.target)
    }

    pub fn save_name(&self) -> Option<&str> {
        present(&self.save)
    }

    pub fn poison_name(&self) -> Option<&str> {
        present(&self.poison)
    }
}

/// Server-to-participant messages that expect no answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    WaitConfirm { players: Vec<String> },
    GameCancelled,
    GameStatus(StatusSnapshot),
    SeerResult { target: String, result: Alignment },
    GameEnd { result: GameResult },
}

impl Notification {
    pub fn to_wire(&self) -> Value {
        match self {
            Notification::WaitConfirm { players } => json!({
                "type": "wait_confirm",
                "players": players,
            }),
            Notification::GameCancelled => json!({ "type": "game_cancelled" }),
            Notification::GameStatus(snapshot) => {
                let players: Vec<Value> = snapshot
                    .players
                    .iter()
                    .map(|p| json!([p.name, p.role, p.alive, p.is_sheriff]))
                    .collect();
                json!({
                    "type": "game_status",
                    "role": snapshot.role,
                    "players": players,
                    "day_count": snapshot.day_count,
                })
            }
            Notification::SeerResult { target, result } => json!({
                "type": "seer_result",
                "action": "seer",
                "target": target,
                "result": result.as_str(),
            }),
            Notification::GameEnd { result } => json!({
                "type": "game_end",
                "result": result,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_and_blank_fields_are_absent() {
        let response: ActionResponse =
            serde_json::from_str(r#"{"save": "none", "poison": "  ", "vote": "bob"}"#).unwrap();
        assert_eq!(response.save_name(), None);
        assert_eq!(response.poison_name(), None);
        assert_eq!(response.vote_name(), Some("bob"));
        assert_eq!(response.target_name(), None);
    }

    #[test]
    fn witch_request_matches_client_protocol() {
        let request = ActionRequest::Witch {
            has_antidote: true,
            has_poison: false,
            dead: vec!["ann".into()],
            alive: vec!["bob".into()],
        };
        let wire = request.to_wire();
        assert_eq!(wire["type"], "night_action");
        assert_eq!(wire["action"], "witch");
        assert_eq!(wire["dead_players"][0], "ann");
        assert_eq!(wire["has_poison"], false);
    }

    #[test]
    fn answers_outside_the_candidate_list_are_dropped() {
        let request = ActionRequest::DayVote {
            candidates: vec!["ann".into(), "bob".into()],
        };
        assert_eq!(
            request.interpret(&ActionResponse::vote("bob")),
            Some(Intent::Vote {
                target: "bob".into()
            })
        );
        assert_eq!(request.interpret(&ActionResponse::vote("zed")), None);
        assert_eq!(request.interpret(&ActionResponse::target("bob")), None);
    }

    #[test]
    fn witch_answer_respects_spent_resources() {
        let request = ActionRequest::Witch {
            has_antidote: false,
            has_poison: true,
            dead: vec!["ann".into()],
            alive: vec!["bob".into()],
        };
        assert_eq!(
            request.interpret(&ActionResponse::potion(Some("ann"), Some("bob"))),
            Some(Intent::Potion {
                save: None,
                poison: Some("bob".into())
            })
        );
        assert_eq!(
            request.interpret(&ActionResponse::potion(Some("ann"), Some("none"))),
            None
        );
    }

    #[test]
    fn seer_result_uses_wolf_and_not_wolf() {
        let wire = Notification::SeerResult {
            target: "bob".into(),
            result: Alignment::NotWolf,
        }
        .to_wire();
        assert_eq!(wire["result"], "not-wolf");
    }
}
