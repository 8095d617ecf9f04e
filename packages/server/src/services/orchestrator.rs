use futures::future::join_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::models::action::{ActionRequest, ActionResponse, Notification};
use crate::models::config::ServerConfig;
use crate::models::game::{GameResult, GameState};
use crate::models::player::Participant;
use crate::models::role::Intent;
use crate::models::snapshot::{PublicSnapshot, StatusSnapshot};
use crate::services::broker::{ActionBroker, BrokerError};

/// In-process decision for an automated participant.
pub(crate) type AutoPolicy = fn(&Participant, &[Participant], &mut StdRng) -> Option<Intent>;

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorOptions {
    pub hunter_enabled: bool,
    /// `None` waits on human participants indefinitely.
    pub response_timeout: Option<Duration>,
    pub phase_pause: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            hunter_enabled: false,
            response_timeout: None,
            phase_pause: Duration::ZERO,
        }
    }
}

impl From<&ServerConfig> for OrchestratorOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            hunter_enabled: config.hunter_enabled,
            response_timeout: config.response_timeout,
            phase_pause: config.phase_pause,
        }
    }
}

/// Drives one session's phases over an owned [`GameState`].
///
/// Within a sub-phase every eligible participant is solicited on its own task.
/// Their decisions come back through a [`JoinSet`] and are applied here, one at a
/// time, so the orchestrator is the only writer of game state. A sub-phase is
/// over when every task has joined.
pub struct PhaseOrchestrator {
    pub(crate) game: GameState,
    pub(crate) broker: Arc<dyn ActionBroker>,
    pub(crate) rng: StdRng,
    pub(crate) options: OrchestratorOptions,
    pub(crate) fired_hunters: HashSet<String>,
    observer: Option<watch::Sender<Option<PublicSnapshot>>>,
}

async fn solicit_with_timeout(
    broker: Arc<dyn ActionBroker>,
    participant: &str,
    request: ActionRequest,
    timeout: Option<Duration>,
) -> Result<ActionResponse, BrokerError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, broker.solicit(participant, request))
            .await
            .map_err(|_| BrokerError::Timeout(participant.to_string()))?,
        None => broker.solicit(participant, request).await,
    }
}

impl PhaseOrchestrator {
    pub fn new(
        game: GameState,
        broker: Arc<dyn ActionBroker>,
        options: OrchestratorOptions,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            game,
            broker,
            rng,
            options,
            fired_hunters: HashSet::new(),
            observer: None,
        }
    }

    /// Publishes a spectator snapshot after every tick.
    pub fn with_observer(mut self, observer: watch::Sender<Option<PublicSnapshot>>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Solicits every named participant concurrently and applies each decision
    /// as it arrives.
    pub(crate) async fn collect<Q, A>(
        &mut self,
        actors: Vec<String>,
        request_for: Q,
        policy: AutoPolicy,
        mut apply: A,
    ) where
        Q: Fn(&GameState, &Participant) -> ActionRequest,
        A: FnMut(&mut GameState, &str, Intent),
    {
        let roster: Arc<Vec<Participant>> = Arc::new(self.game.participants.clone());
        let mut tasks = JoinSet::new();

        for name in actors {
            let Some(me) = self.game.participant(&name).cloned() else {
                warn!("skipping unknown participant {}", name);
                continue;
            };

            if me.is_automated {
                let roster = roster.clone();
                let mut rng = StdRng::seed_from_u64(self.rng.gen());
                tasks.spawn(async move {
                    let intent = policy(&me, &roster, &mut rng);
                    (me.name, intent)
                });
            } else {
                let request = request_for(&self.game, &me);
                let broker = self.broker.clone();
                let timeout = self.options.response_timeout;
                tasks.spawn(async move {
                    debug!("asking {} for {}", me.name, request.kind());
                    let intent =
                        match solicit_with_timeout(broker, &me.name, request.clone(), timeout).await
                        {
                            Ok(response) => {
                                let intent = request.interpret(&response);
                                if intent.is_none() {
                                    warn!(
                                        "ignoring unusable {} answer from {}: {:?}",
                                        request.kind(),
                                        me.name,
                                        response
                                    );
                                }
                                intent
                            }
                            Err(e) => {
                                warn!("no {} answer from {}: {}", request.kind(), me.name, e);
                                None
                            }
                        };
                    (me.name, intent)
                });
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((actor, Some(intent))) => {
                    debug!("{} decided {:?}", actor, intent);
                    apply(&mut self.game, &actor, intent);
                }
                Ok((actor, None)) => debug!("{} passed", actor),
                Err(e) => warn!("solicitation task failed: {}", e),
            }
        }
    }

    /// Replaces a sheriff who died this phase.
    pub(crate) fn settle_sheriff(&mut self) {
        if let Some(fallen) = self.game.vacate_dead_sheriff() {
            match self.game.succeed_sheriff(&mut self.rng) {
                Some(next) => info!("{} inherits the badge from {}", next, fallen),
                None => info!("nobody is left to inherit the badge from {}", fallen),
            }
        }
    }

    pub(crate) fn humans(&self) -> Vec<String> {
        self.game
            .participants
            .iter()
            .filter(|p| !p.is_automated)
            .map(|p| p.name.clone())
            .collect()
    }

    pub(crate) async fn notify_all(&self, notifications: Vec<(String, Notification)>) {
        let sends = notifications.into_iter().map(|(name, notification)| {
            let broker = self.broker.clone();
            async move {
                if let Err(e) = broker.notify(&name, notification).await {
                    warn!("failed to notify {}: {}", name, e);
                }
            }
        });
        join_all(sends).await;
    }

    pub async fn broadcast_status(&self) {
        let notifications = self
            .humans()
            .into_iter()
            .filter_map(|name| {
                StatusSnapshot::for_viewer(&self.game, &name)
                    .map(|snapshot| (name, Notification::GameStatus(snapshot)))
            })
            .collect();
        self.notify_all(notifications).await;
    }

    fn publish(&self) {
        if let Some(observer) = &self.observer {
            observer.send_replace(Some(PublicSnapshot::from_game(&self.game)));
        }
    }

    /// Status broadcast and end check after a completed phase.
    /// Returns `true` once the game is over.
    pub async fn end_of_tick(&mut self) -> bool {
        if !self.options.phase_pause.is_zero() {
            tokio::time::sleep(self.options.phase_pause).await;
        }
        self.broadcast_status().await;

        let result = self.game.check_winner();
        if result.is_terminal() {
            info!("game over: {:?}", result);
            self.game.finish(result);
            self.publish();
            let notifications = self
                .humans()
                .into_iter()
                .map(|name| (name, Notification::GameEnd { result }))
                .collect();
            self.notify_all(notifications).await;
            true
        } else {
            self.publish();
            false
        }
    }

    /// Alternates nights and days until one faction wins.
    pub async fn run(&mut self) -> GameResult {
        info!(
            "starting session {} with {} participants",
            self.game.session_id,
            self.game.participants.len()
        );
        self.broadcast_status().await;
        self.publish();

        loop {
            self.run_night().await;
            if !self.game.sheriff_election_held
                && self.game.sheriff.is_none()
                && !self.game.check_winner().is_terminal()
            {
                self.run_sheriff_election().await;
            }
            if self.end_of_tick().await {
                break;
            }

            self.run_day().await;
            if self.end_of_tick().await {
                break;
            }
        }

        self.game.result
    }
}
