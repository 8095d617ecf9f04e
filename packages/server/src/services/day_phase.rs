use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::models::action::ActionRequest;
use crate::models::game::GamePhase;
use crate::models::player::Participant;
use crate::models::role::Intent;
use crate::models::tally::{TallyOutcome, SHERIFF_VOTE_WEIGHT, VOTE_WEIGHT};
use crate::services::orchestrator::PhaseOrchestrator;

fn day_vote_policy(me: &Participant, roster: &[Participant], rng: &mut StdRng) -> Option<Intent> {
    let others: Vec<&Participant> = roster
        .iter()
        .filter(|p| p.alive && p.name != me.name)
        .collect();
    others.choose(rng).map(|p| Intent::Vote {
        target: p.name.clone(),
    })
}

impl PhaseOrchestrator {
    /// Succession, day counter, elimination vote. Returns who was voted out.
    pub async fn run_day(&mut self) -> Option<String> {
        self.game.phase = GamePhase::Day;
        if self.game.sheriff_election_held && self.game.sheriff.is_none() {
            if let Some(sheriff) = self.game.succeed_sheriff(&mut self.rng) {
                info!("{} takes the vacant badge", sheriff);
            }
        }

        self.game.day_count += 1;
        info!("day {} begins", self.game.day_count);
        let alive_before: HashSet<String> = self.game.alive_names().into_iter().collect();

        self.game.reset_votes();
        let voters = self.game.alive_names();
        self.collect(
            voters,
            |game, me| ActionRequest::DayVote {
                candidates: game.alive_names_except(&me.name),
            },
            day_vote_policy,
            |game, voter, intent| match intent {
                Intent::Vote { target } => {
                    let weight = if game.is_sheriff(voter) {
                        SHERIFF_VOTE_WEIGHT
                    } else {
                        VOTE_WEIGHT
                    };
                    if game.cast_vote(&target, weight) {
                        info!("{} votes against {} ({})", voter, target, weight);
                    }
                }
                other => warn!("voter {} produced {:?}", voter, other),
            },
        )
        .await;

        let eliminated = match self.game.vote_tally().resolve() {
            TallyOutcome::Winner(target) => {
                self.game.kill(&target);
                info!("{} is voted out", target);
                Some(target)
            }
            TallyOutcome::Tie(leaders) => {
                info!("vote tied between {:?}, nobody leaves", leaders);
                None
            }
            TallyOutcome::Empty => None,
        };
        self.game.reset_votes();

        self.settle_sheriff();
        if self.options.hunter_enabled {
            self.run_hunter_shots(&alive_before).await;
        }
        eliminated
    }
}
