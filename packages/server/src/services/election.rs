use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::models::action::ActionRequest;
use crate::models::game::GamePhase;
use crate::models::player::Participant;
use crate::models::role::Intent;
use crate::models::tally::{TallyOutcome, VOTE_WEIGHT};
use crate::services::orchestrator::PhaseOrchestrator;

pub const SHERIFF_ELECTION_ROUNDS: usize = 3;

/// Automated electors pick any living participant, themselves included.
fn election_policy(_me: &Participant, roster: &[Participant], rng: &mut StdRng) -> Option<Intent> {
    let alive: Vec<&Participant> = roster.iter().filter(|p| p.alive).collect();
    alive.choose(rng).map(|p| Intent::Vote {
        target: p.name.clone(),
    })
}

impl PhaseOrchestrator {
    /// Holds the one-off sheriff election. Returns the elected sheriff, if any.
    pub async fn run_sheriff_election(&mut self) -> Option<String> {
        self.game.phase = GamePhase::SheriffElection;
        self.game.sheriff_election_held = true;

        for round in 1..=SHERIFF_ELECTION_ROUNDS {
            self.game.reset_votes();
            let electors = self.game.alive_names();
            self.collect(
                electors,
                |game, _| ActionRequest::SheriffElection {
                    candidates: game.alive_names(),
                },
                election_policy,
                |game, voter, intent| match intent {
                    Intent::Vote { target } => {
                        if game.cast_vote(&target, VOTE_WEIGHT) {
                            info!("{} backs {} for sheriff", voter, target);
                        }
                    }
                    other => warn!("elector {} produced {:?}", voter, other),
                },
            )
            .await;

            match self.game.vote_tally().resolve() {
                TallyOutcome::Winner(sheriff) => {
                    self.game.reset_votes();
                    if self.game.assign_sheriff(&sheriff).is_ok() {
                        info!("{} is elected sheriff in round {}", sheriff, round);
                        return Some(sheriff);
                    }
                }
                TallyOutcome::Tie(leaders) => {
                    info!("round {} tied between {:?}", round, leaders)
                }
                TallyOutcome::Empty => info!("round {} drew no votes", round),
            }
        }

        self.game.reset_votes();
        info!("no sheriff after {} rounds", SHERIFF_ELECTION_ROUNDS);
        None
    }
}
