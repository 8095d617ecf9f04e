use std::collections::HashSet;
use tracing::{info, warn};

use crate::models::action::{ActionRequest, Notification};
use crate::models::game::{GamePhase, GameState};
use crate::models::player::Participant;
use crate::models::role::{Intent, RoleCapability};
use crate::models::tally::{TallyOutcome, VOTE_WEIGHT};
use crate::services::orchestrator::PhaseOrchestrator;

fn night_policy(
    me: &Participant,
    roster: &[Participant],
    rng: &mut rand::rngs::StdRng,
) -> Option<Intent> {
    me.role.act_night(me, roster, rng)
}

fn day_policy(
    me: &Participant,
    roster: &[Participant],
    rng: &mut rand::rngs::StdRng,
) -> Option<Intent> {
    me.role.act_day(me, roster, rng)
}

fn alive_with_role(game: &GameState, pred: fn(&RoleCapability) -> bool) -> Vec<String> {
    game.alive()
        .filter(|p| pred(&p.role))
        .map(|p| p.name.clone())
        .collect()
}

fn apply_potion(game: &mut GameState, witch: &str, save: Option<String>, poison: Option<String>) {
    if let Some(target) = save {
        let usable = game.participant(witch).is_some_and(|w| w.role.has_antidote());
        if usable && game.revive(&target) {
            if let Some(w) = game.participant_mut(witch) {
                w.role.consume_antidote();
            }
            info!("witch {} saved {}", witch, target);
        }
    }

    if let Some(target) = poison {
        let usable = game.participant(witch).is_some_and(|w| w.role.has_poison());
        if usable && game.kill(&target) {
            if let Some(w) = game.participant_mut(witch) {
                w.role.consume_poison();
            }
            info!("witch {} poisoned {}", witch, target);
        }
    }
}

impl PhaseOrchestrator {
    /// Runs wolves, witches and seers in that order, then applies the wolf kill.
    pub async fn run_night(&mut self) {
        self.game.phase = GamePhase::Night;
        info!("night {} falls", self.game.day_count);
        let alive_before: HashSet<String> = self.game.alive_names().into_iter().collect();

        self.run_wolves().await;
        self.run_witches().await;
        self.run_seers().await;
        self.resolve_night();

        self.settle_sheriff();
        if self.options.hunter_enabled {
            self.run_hunter_shots(&alive_before).await;
        }
    }

    pub async fn run_wolves(&mut self) {
        let wolves = alive_with_role(&self.game, |r| r.acts_at_night() && r.is_wolf());
        self.collect(
            wolves,
            |game, _| ActionRequest::WolfKill {
                candidates: game.alive_non_wolf_names(),
            },
            night_policy,
            |game, wolf, intent| match intent {
                Intent::KillVote { target } => {
                    info!("wolf {} votes to kill {}", wolf, target);
                    game.pending_wolf_votes.add(target, VOTE_WEIGHT);
                }
                other => warn!("wolf {} produced {:?}", wolf, other),
            },
        )
        .await;
    }

    pub async fn run_witches(&mut self) {
        let witches = alive_with_role(&self.game, |r| {
            r.acts_at_night() && matches!(r, RoleCapability::Witch { .. })
        });
        self.collect(
            witches,
            |game, me| ActionRequest::Witch {
                has_antidote: me.role.has_antidote(),
                has_poison: me.role.has_poison(),
                dead: game.dead_names(),
                alive: game.alive_names_except(&me.name),
            },
            night_policy,
            |game, witch, intent| match intent {
                Intent::Potion { save, poison } => apply_potion(game, witch, save, poison),
                other => warn!("witch {} produced {:?}", witch, other),
            },
        )
        .await;
    }

    pub async fn run_seers(&mut self) {
        let seers = alive_with_role(&self.game, |r| {
            r.acts_at_night() && matches!(r, RoleCapability::Seer)
        });
        let mut reveals = Vec::new();
        self.collect(
            seers,
            |game, me| ActionRequest::SeerCheck {
                candidates: game.alive_names_except(&me.name),
            },
            night_policy,
            |game, seer, intent| match intent {
                Intent::Reveal { target } => {
                    let Some(checked) = game.participant(&target) else {
                        return;
                    };
                    let result = checked.role.alignment();
                    info!("seer {} checks {}: {}", seer, target, result.as_str());
                    if game.participant(seer).is_some_and(|s| !s.is_automated) {
                        reveals.push((seer.to_string(), Notification::SeerResult { target, result }));
                    }
                }
                other => warn!("seer {} produced {:?}", seer, other),
            },
        )
        .await;
        self.notify_all(reveals).await;
    }

    /// Applies the wolf consensus. A tied or empty vote kills nobody.
    pub fn resolve_night(&mut self) -> Option<String> {
        let victim = match self.game.pending_wolf_votes.resolve() {
            TallyOutcome::Winner(target) => {
                if self.game.kill(&target) {
                    info!("the wolves killed {}", target);
                    Some(target)
                } else {
                    None
                }
            }
            TallyOutcome::Tie(targets) => {
                info!("wolves split between {:?}, nobody dies", targets);
                None
            }
            TallyOutcome::Empty => None,
        };
        self.game.pending_wolf_votes.clear();
        victim
    }

    /// Lets each hunter who died since `alive_before` take a shot, once per game.
    pub async fn run_hunter_shots(&mut self, alive_before: &HashSet<String>) {
        loop {
            let hunters: Vec<String> = self
                .game
                .participants
                .iter()
                .filter(|p| {
                    p.role.has_day_ability()
                        && !p.alive
                        && alive_before.contains(&p.name)
                        && !self.fired_hunters.contains(&p.name)
                })
                .map(|p| p.name.clone())
                .collect();
            if hunters.is_empty() {
                break;
            }
            self.fired_hunters.extend(hunters.iter().cloned());

            self.collect(
                hunters,
                |game, me| ActionRequest::HunterShot {
                    candidates: game.alive_names_except(&me.name),
                },
                day_policy,
                |game, hunter, intent| match intent {
                    Intent::Shoot { target } => {
                        if game.kill(&target) {
                            info!("hunter {} took {} down", hunter, target);
                        }
                    }
                    other => warn!("hunter {} produced {:?}", hunter, other),
                },
            )
            .await;
            self.settle_sheriff();
        }
    }
}
