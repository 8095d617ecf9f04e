use async_trait::async_trait;
use dotenvy::dotenv;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, Once};
use tracing_subscriber::EnvFilter;

use crate::models::action::{ActionRequest, ActionResponse, Notification};
use crate::services::broker::{ActionBroker, BrokerError};

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
struct Script {
    responses: HashMap<(String, &'static str), VecDeque<ActionResponse>>,
    disconnected: HashSet<String>,
    stalled: HashSet<String>,
    requests: Vec<(String, ActionRequest)>,
    notifications: Vec<(String, Notification)>,
}

/// Broker that answers from canned responses keyed by participant and request kind.
/// Unscripted requests get an empty answer, which every request treats as a pass.
#[derive(Clone, Default)]
pub struct ScriptedBroker {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `response` for the next `kind` request sent to `participant`.
    pub fn answer(&self, participant: &str, kind: &'static str, response: ActionResponse) -> &Self {
        self.script
            .lock()
            .unwrap()
            .responses
            .entry((participant.to_string(), kind))
            .or_default()
            .push_back(response);
        self
    }

    pub fn disconnect(&self, participant: &str) {
        self.script
            .lock()
            .unwrap()
            .disconnected
            .insert(participant.to_string());
    }

    /// Solicitations to `participant` never complete.
    pub fn stall(&self, participant: &str) {
        self.script
            .lock()
            .unwrap()
            .stalled
            .insert(participant.to_string());
    }

    pub fn requests_for(&self, participant: &str) -> Vec<ActionRequest> {
        self.script
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(name, _)| name == participant)
            .map(|(_, request)| request.clone())
            .collect()
    }

    pub fn notifications_for(&self, participant: &str) -> Vec<Notification> {
        self.script
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|(name, _)| name == participant)
            .map(|(_, notification)| notification.clone())
            .collect()
    }
}

#[async_trait]
impl ActionBroker for ScriptedBroker {
    async fn solicit(
        &self,
        participant: &str,
        request: ActionRequest,
    ) -> Result<ActionResponse, BrokerError> {
        let (stalled, answer) = {
            let mut script = self.script.lock().unwrap();
            script.requests.push((participant.to_string(), request.clone()));
            if script.disconnected.contains(participant) {
                return Err(BrokerError::Disconnected(participant.to_string()));
            }
            let answer = script
                .responses
                .get_mut(&(participant.to_string(), request.kind()))
                .and_then(|queue| queue.pop_front())
                .unwrap_or_default();
            (script.stalled.contains(participant), answer)
        };

        if stalled {
            std::future::pending::<()>().await;
        }
        Ok(answer)
    }

    async fn notify(
        &self,
        participant: &str,
        notification: Notification,
    ) -> Result<(), BrokerError> {
        let mut script = self.script.lock().unwrap();
        if script.disconnected.contains(participant) {
            return Err(BrokerError::Disconnected(participant.to_string()));
        }
        script
            .notifications
            .push((participant.to_string(), notification));
        Ok(())
    }
}
