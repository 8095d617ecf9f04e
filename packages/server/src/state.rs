use tokio::sync::watch;

use crate::models::snapshot::PublicSnapshot;

/// Shared state of the spectator API. The orchestrator owns the sender half.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: watch::Receiver<Option<PublicSnapshot>>,
}

impl AppState {
    pub fn new() -> (Self, watch::Sender<Option<PublicSnapshot>>) {
        let (tx, rx) = watch::channel(None);
        (AppState { snapshot: rx }, tx)
    }

    pub fn current(&self) -> Option<PublicSnapshot> {
        self.snapshot.borrow().clone()
    }
}
