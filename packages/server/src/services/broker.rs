use async_trait::async_trait;

use crate::models::action::{ActionRequest, ActionResponse, Notification};

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad frame: {0}")]
    Frame(#[from] tokio_util::codec::LinesCodecError),
    #[error("participant disconnected: {0}")]
    Disconnected(String),
    #[error("no connection for participant: {0}")]
    UnknownParticipant(String),
    #[error("participant did not answer in time: {0}")]
    Timeout(String),
}

/// Asks one participant for a decision and carries private messages back.
///
/// The orchestrator only talks to human participants through this trait;
/// automated participants are answered in-process by their role policy.
/// A failed call never aborts a phase: the caller logs it and moves on.
#[async_trait]
pub trait ActionBroker: Send + Sync {
    async fn solicit(
        &self,
        participant: &str,
        request: ActionRequest,
    ) -> Result<ActionResponse, BrokerError>;

    async fn notify(&self, participant: &str, notification: Notification)
        -> Result<(), BrokerError>;
}

/// Broker for tables with no human seats.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBroker;

#[async_trait]
impl ActionBroker for NullBroker {
    async fn solicit(
        &self,
        participant: &str,
        _request: ActionRequest,
    ) -> Result<ActionResponse, BrokerError> {
        Err(BrokerError::UnknownParticipant(participant.to_string()))
    }

    async fn notify(
        &self,
        _participant: &str,
        _notification: Notification,
    ) -> Result<(), BrokerError> {
        Ok(())
    }
}
