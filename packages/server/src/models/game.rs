use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::player::Participant;
use super::tally::VoteTally;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Waiting,
    Night,
    SheriffElection,
    Day,
    Finished,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    GoodWin,
    WolfWin,
}

impl GameResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }
}

/// Aggregate root of one session. Death is a flag: participants are never removed.
#[derive(Debug, Clone)]
pub struct GameState {
    pub session_id: String,
    pub participants: Vec<Participant>,
    pub day_count: u32,
    pub sheriff: Option<String>,
    pub sheriff_election_held: bool,
    /// Non-empty only while the wolf sub-phase of a night is running.
    pub pending_wolf_votes: VoteTally<String>,
    pub phase: GamePhase,
    pub result: GameResult,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            session_id: uuid::Uuid::new_v4().to_string(),
            participants: Vec::new(),
            day_count: 1,
            sheriff: None,
            sheriff_election_held: false,
            pending_wolf_votes: VoteTally::new(),
            phase: GamePhase::Waiting,
            result: GameResult::InProgress,
        }
    }

    pub fn with_participants(participants: Vec<Participant>) -> Result<Self, GameError> {
        let mut game = GameState::new();
        for participant in participants {
            game.add_participant(participant)?;
        }
        Ok(game)
    }

    pub fn add_participant(&mut self, participant: Participant) -> Result<(), GameError> {
        if self.participant(&participant.name).is_some() {
            return Err(GameError::DuplicateName(participant.name));
        }
        self.participants.push(participant);
        Ok(())
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    pub fn participant_mut(&mut self, name: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.name == name)
    }

    pub fn is_alive(&self, name: &str) -> bool {
        self.participant(name).is_some_and(|p| p.alive)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.alive)
    }

    pub fn alive_names(&self) -> Vec<String> {
        self.alive().map(|p| p.name.clone()).collect()
    }

    pub fn alive_names_except(&self, name: &str) -> Vec<String> {
        self.alive()
            .filter(|p| p.name != name)
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn alive_non_wolf_names(&self) -> Vec<String> {
        self.alive()
            .filter(|p| !p.is_wolf())
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn dead_names(&self) -> Vec<String> {
        self.participants
            .iter()
            .filter(|p| !p.alive)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Marks `name` dead. Returns `true` only if they were alive.
    pub fn kill(&mut self, name: &str) -> bool {
        match self.participant_mut(name) {
            Some(p) if p.alive => {
                p.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Brings `name` back. Returns `true` only if they were dead.
    pub fn revive(&mut self, name: &str) -> bool {
        match self.participant_mut(name) {
            Some(p) if !p.alive => {
                p.alive = true;
                true
            }
            _ => false,
        }
    }

    /// Hands the badge to `name`. The previous holder loses it first.
    pub fn assign_sheriff(&mut self, name: &str) -> Result<(), GameError> {
        if self.participant(name).is_none() {
            return Err(GameError::UnknownParticipant(name.to_string()));
        }
        for p in self.participants.iter_mut() {
            p.is_sheriff = false;
        }
        if let Some(p) = self.participant_mut(name) {
            p.is_sheriff = true;
        }
        self.sheriff = Some(name.to_string());
        Ok(())
    }

    /// Clears the badge of a sheriff who is no longer alive.
    pub fn vacate_dead_sheriff(&mut self) -> Option<String> {
        let name = self.sheriff.clone()?;
        if self.is_alive(&name) {
            return None;
        }
        if let Some(p) = self.participant_mut(&name) {
            p.is_sheriff = false;
        }
        self.sheriff = None;
        Some(name)
    }

    /// Picks a random alive non-sheriff and makes them sheriff.
    pub fn succeed_sheriff<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        let candidates: Vec<String> = self
            .alive()
            .filter(|p| !p.is_sheriff)
            .map(|p| p.name.clone())
            .collect();
        let next = candidates.choose(rng)?.clone();
        self.assign_sheriff(&next).ok()?;
        Some(next)
    }

    pub fn is_sheriff(&self, name: &str) -> bool {
        self.sheriff.as_deref() == Some(name)
    }

    /// Adds `weight` to an alive participant's accumulator.
    pub fn cast_vote(&mut self, target: &str, weight: f64) -> bool {
        match self.participant_mut(target) {
            Some(p) if p.alive => {
                p.vote_accumulator += weight;
                true
            }
            _ => false,
        }
    }

    pub fn reset_votes(&mut self) {
        for p in self.participants.iter_mut() {
            p.vote_accumulator = 0.0;
        }
    }

    /// Snapshot of the alive participants' accumulators.
    pub fn vote_tally(&self) -> VoteTally<String> {
        self.alive()
            .map(|p| (p.name.clone(), p.vote_accumulator))
            .collect()
    }

    pub fn check_winner(&self) -> GameResult {
        let wolves = self.alive().filter(|p| p.is_wolf()).count();
        let others = self.alive().filter(|p| !p.is_wolf()).count();

        if wolves == 0 {
            GameResult::GoodWin
        } else if wolves >= others {
            GameResult::WolfWin
        } else {
            GameResult::InProgress
        }
    }

    pub fn finish(&mut self, result: GameResult) {
        self.result = result;
        self.phase = GamePhase::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::RoleCapability;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game(roles: &[RoleCapability]) -> GameState {
        let participants = roles
            .iter()
            .enumerate()
            .map(|(i, role)| Participant::automated(format!("p{}", i + 1), role.clone()))
            .collect();
        GameState::with_participants(participants).unwrap()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut game = GameState::new();
        game.add_participant(Participant::human("alice", RoleCapability::Villager))
            .unwrap();
        assert_eq!(
            game.add_participant(Participant::automated("alice", RoleCapability::Wolf)),
            Err(GameError::DuplicateName("alice".to_string()))
        );
    }

    #[test]
    fn winner_rules() {
        let mut g = game(&[
            RoleCapability::Wolf,
            RoleCapability::Villager,
            RoleCapability::Villager,
        ]);
        assert_eq!(g.check_winner(), GameResult::InProgress);

        g.kill("p2");
        assert_eq!(g.check_winner(), GameResult::WolfWin);

        g.revive("p2");
        g.kill("p1");
        assert_eq!(g.check_winner(), GameResult::GoodWin);

        let mut all_wolves = game(&[RoleCapability::Wolf, RoleCapability::Villager]);
        all_wolves.kill("p2");
        assert_eq!(all_wolves.check_winner(), GameResult::WolfWin);
    }

    #[test]
    fn at_most_one_sheriff() {
        let mut g = game(&[
            RoleCapability::Villager,
            RoleCapability::Villager,
            RoleCapability::Wolf,
        ]);
        g.assign_sheriff("p1").unwrap();
        g.assign_sheriff("p2").unwrap();
        assert_eq!(g.participants.iter().filter(|p| p.is_sheriff).count(), 1);
        assert_eq!(g.sheriff.as_deref(), Some("p2"));
        assert!(g.assign_sheriff("nobody").is_err());
    }

    #[test]
    fn succession_skips_the_dead() {
        let mut g = game(&[
            RoleCapability::Villager,
            RoleCapability::Villager,
            RoleCapability::Wolf,
        ]);
        g.assign_sheriff("p1").unwrap();
        g.kill("p1");
        g.kill("p2");
        assert_eq!(g.vacate_dead_sheriff().as_deref(), Some("p1"));
        assert!(g.participants.iter().all(|p| !p.is_sheriff));

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(g.succeed_sheriff(&mut rng).as_deref(), Some("p3"));

        g.kill("p3");
        g.vacate_dead_sheriff();
        assert_eq!(g.succeed_sheriff(&mut rng), None);
        assert_eq!(g.sheriff, None);
    }

    #[test]
    fn votes_only_land_on_the_living() {
        let mut g = game(&[RoleCapability::Villager, RoleCapability::Wolf]);
        g.kill("p2");
        assert!(g.cast_vote("p1", 1.0));
        assert!(!g.cast_vote("p2", 1.0));
        assert!(!g.cast_vote("ghost", 1.0));
        assert_eq!(g.vote_tally().weight_of(&"p1".to_string()), 1.0);
        g.reset_votes();
        assert!(g.participants.iter().all(|p| p.vote_accumulator == 0.0));
    }
}
