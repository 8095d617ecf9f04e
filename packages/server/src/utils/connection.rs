use async_trait::async_trait;
use futures::future::join_all;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info, warn};

use crate::models::action::{ActionRequest, ActionResponse, Notification};
use crate::services::broker::{ActionBroker, BrokerError};

/// Longest line accepted from a client. Longer lines are discarded.
pub const MAX_LINE_BYTES: usize = 1024;

type Outgoing = (String, oneshot::Sender<io::Result<()>>);

/// One newline-delimited JSON stream to a player's client.
///
/// Frames are written by a dedicated task, so a caller that gives up halfway
/// never leaves a partial line on the wire. Answers owed to exchanges that were
/// abandoned are counted and skipped before the next exchange reads its own.
pub struct Connection {
    peer: String,
    reader: FramedRead<OwnedReadHalf, LinesCodec>,
    outbox: mpsc::UnboundedSender<Outgoing>,
    owed: usize,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Self {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown peer".to_string());
        let (read, mut write) = stream.into_split();
        let (outbox, mut pending) = mpsc::unbounded_channel::<Outgoing>();

        let writer_peer = peer.clone();
        tokio::spawn(async move {
            while let Some((line, done)) = pending.recv().await {
                let written = match write.write_all(line.as_bytes()).await {
                    Ok(()) => write.flush().await,
                    Err(e) => Err(e),
                };
                let failed = written.is_err();
                let _ = done.send(written);
                if failed {
                    warn!("stopped writing to {}", writer_peer);
                    break;
                }
            }
        });

        Self {
            peer,
            reader: FramedRead::new(read, LinesCodec::new_with_max_length(MAX_LINE_BYTES)),
            outbox,
            owed: 0,
        }
    }

    fn enqueue(&self, message: &Value) -> Result<oneshot::Receiver<io::Result<()>>, BrokerError> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        let (done, written) = oneshot::channel();
        self.outbox
            .send((line, done))
            .map_err(|_| BrokerError::Disconnected(self.peer.clone()))?;
        Ok(written)
    }

    async fn written(&self, ack: oneshot::Receiver<io::Result<()>>) -> Result<(), BrokerError> {
        match ack.await {
            Ok(result) => Ok(result?),
            Err(_) => Err(BrokerError::Disconnected(self.peer.clone())),
        }
    }

    pub async fn send(&mut self, message: &Value) -> Result<(), BrokerError> {
        let ack = self.enqueue(message)?;
        self.written(ack).await
    }

    async fn next_line(&mut self) -> Result<Result<String, BrokerError>, BrokerError> {
        match self.reader.next().await {
            Some(line) => Ok(line.map_err(BrokerError::from)),
            None => Err(BrokerError::Disconnected(self.peer.clone())),
        }
    }

    pub async fn receive<T: DeserializeOwned>(&mut self) -> Result<T, BrokerError> {
        let line = self.next_line().await??;
        Ok(serde_json::from_str(&line)?)
    }

    /// Sends `message` and reads the answer to it.
    pub async fn exchange<T: DeserializeOwned>(&mut self, message: &Value) -> Result<T, BrokerError> {
        let ack = self.enqueue(message)?;
        self.owed += 1;
        self.written(ack).await?;

        loop {
            let line = self.next_line().await?;
            self.owed -= 1;
            if self.owed > 0 {
                debug!("dropping a late answer from {}", self.peer);
                continue;
            }
            return Ok(serde_json::from_str(&line?)?);
        }
    }
}

/// Routes requests to each human player's own connection.
pub struct TcpBroker {
    connections: HashMap<String, Mutex<Connection>>,
}

impl TcpBroker {
    pub fn new(connections: Vec<(String, Connection)>) -> Self {
        Self {
            connections: connections
                .into_iter()
                .map(|(name, conn)| (name, Mutex::new(conn)))
                .collect(),
        }
    }

    fn connection(&self, participant: &str) -> Result<&Mutex<Connection>, BrokerError> {
        self.connections
            .get(participant)
            .ok_or_else(|| BrokerError::UnknownParticipant(participant.to_string()))
    }
}

#[async_trait]
impl ActionBroker for TcpBroker {
    async fn solicit(
        &self,
        participant: &str,
        request: ActionRequest,
    ) -> Result<ActionResponse, BrokerError> {
        let mut conn = self.connection(participant)?.lock().await;
        conn.exchange(&request.to_wire()).await
    }

    async fn notify(
        &self,
        participant: &str,
        notification: Notification,
    ) -> Result<(), BrokerError> {
        let mut conn = self.connection(participant)?.lock().await;
        conn.send(&notification.to_wire()).await
    }
}

#[derive(Debug, Deserialize)]
struct Hello {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Confirm {
    confirm: bool,
}

pub enum Lobby {
    Ready {
        players: Vec<String>,
        broker: TcpBroker,
    },
    Cancelled,
}

fn unique_name(requested: &str, taken: &[String], seat: usize) -> String {
    let base = match requested.trim() {
        "" => format!("Player {}", seat),
        name => name.to_string(),
    };
    if !taken.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}#{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

/// Waits for `count` players, collects their names and asks everyone to confirm.
pub async fn accept_players(listener: &TcpListener, count: usize) -> Result<Lobby, BrokerError> {
    let mut seated: Vec<(String, Connection)> = Vec::with_capacity(count);

    for seat in 1..=count {
        let (stream, addr) = listener.accept().await?;
        info!("player {} connected from {}", seat, addr);
        let mut conn = Connection::new(stream);

        let requested = match conn.receive::<Hello>().await {
            Ok(hello) => hello.name,
            Err(e) => {
                warn!("bad hello from {}: {}", addr, e);
                String::new()
            }
        };
        let taken: Vec<String> = seated.iter().map(|(name, _)| name.clone()).collect();
        let name = unique_name(&requested, &taken, seat);
        seated.push((name, conn));
    }

    let players: Vec<String> = seated.iter().map(|(name, _)| name.clone()).collect();
    let wait = Notification::WaitConfirm {
        players: players.clone(),
    }
    .to_wire();

    let confirmations = join_all(seated.iter_mut().map(|(name, conn)| {
        let wait = wait.clone();
        async move {
            let confirm: Confirm = conn.exchange(&wait).await?;
            info!("{} confirmed: {}", name, confirm.confirm);
            Ok::<bool, BrokerError>(confirm.confirm)
        }
    }))
    .await;

    let everyone_ready = confirmations.iter().all(|c| matches!(c, Ok(true)));
    if !everyone_ready {
        let cancelled = Notification::GameCancelled.to_wire();
        for (name, conn) in seated.iter_mut() {
            if let Err(e) = conn.send(&cancelled).await {
                warn!("could not tell {} the game is cancelled: {}", name, e);
            }
        }
        return Ok(Lobby::Cancelled);
    }

    Ok(Lobby::Ready {
        players,
        broker: TcpBroker::new(seated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_and_blank_names_are_disambiguated() {
        let taken = vec!["ann".to_string(), "ann#2".to_string()];
        assert_eq!(unique_name("ann", &taken, 3), "ann#3");
        assert_eq!(unique_name("  ", &taken, 4), "Player 4");
        assert_eq!(unique_name("bob", &taken, 5), "bob");
    }
}
