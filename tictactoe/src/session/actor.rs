//! Session actor implementation with async message handling.

use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

use super::{
    config::SessionConfig,
    messages::{Participant, SessionMessage, SessionResponse, SessionSnapshot},
};
use crate::{
    game::{
        errors::GameError,
        session::{Session, SessionCode},
    },
    net::{
        connection::{ConnectionId, Outbound},
        messages::ServerEvent,
    },
};

/// Session actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    code: SessionCode,
}

impl SessionHandle {
    /// Create a new session handle
    pub fn new(sender: mpsc::Sender<SessionMessage>, code: SessionCode) -> Self {
        Self { sender, code }
    }

    /// Get session code
    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    /// Whether both handles talk to the same actor.
    pub fn same_session(&self, other: &SessionHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Send a message to the session
    ///
    /// A session whose actor has shut down is reported as not found.
    pub async fn send(&self, message: SessionMessage) -> Result<(), GameError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| GameError::NotFound)
    }

    async fn request(
        &self,
        message: SessionMessage,
        rx: oneshot::Receiver<SessionResponse>,
    ) -> SessionResponse {
        self.send(message).await?;
        rx.await.map_err(|_| GameError::NotFound)?
    }

    pub async fn join(&self, participant: Participant) -> SessionResponse {
        let (tx, rx) = oneshot::channel();
        self.request(
            SessionMessage::Join {
                participant,
                response: tx,
            },
            rx,
        )
        .await
    }

    pub async fn make_move(&self, connection_id: ConnectionId, cell: usize) -> SessionResponse {
        let (tx, rx) = oneshot::channel();
        self.request(
            SessionMessage::MakeMove {
                connection_id,
                cell,
                response: tx,
            },
            rx,
        )
        .await
    }

    pub async fn restart(&self, connection_id: ConnectionId) -> SessionResponse {
        let (tx, rx) = oneshot::channel();
        self.request(
            SessionMessage::Restart {
                connection_id,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Returns `true` if `connection_id` was a participant and the session
    /// has been shut down as a result.
    pub async fn abandon(&self, connection_id: ConnectionId) -> bool {
        let (tx, rx) = oneshot::channel();
        if self
            .send(SessionMessage::Abandon {
                connection_id,
                response: tx,
            })
            .await
            .is_err()
        {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    /// `None` once the actor has shut down.
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionMessage::Snapshot { response: tx })
            .await
            .ok()?;
        rx.await.ok()
    }
}

/// Actor owning a single session.
///
/// Messages are handled one at a time, so commands against the same
/// session never interleave, and broadcasts reach every participant's
/// queue before the command is acknowledged.
pub struct SessionActor {
    /// Game state
    session: Session,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Where to deliver events for each participant
    outbound: HashMap<ConnectionId, Outbound>,

    /// Set once the session has been abandoned
    is_closed: bool,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Arguments
    ///
    /// * `code` - Session code
    /// * `config` - Session configuration
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(code: SessionCode, config: &SessionConfig) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity);

        let actor = Self {
            session: Session::new(code.clone()),
            inbox,
            outbound: HashMap::new(),
            is_closed: false,
        };

        (actor, SessionHandle::new(sender, code))
    }

    /// Run the session actor event loop
    ///
    /// Exits when the session is abandoned or every handle has been dropped.
    pub async fn run(mut self) {
        log::debug!("Session {} starting", self.session.code());

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        log::debug!("Session {} stopped", self.session.code());
    }

    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Join {
                participant,
                response,
            } => {
                let result = self.handle_join(participant);
                let _ = response.send(result);
            }

            SessionMessage::MakeMove {
                connection_id,
                cell,
                response,
            } => {
                let result = self.handle_move(connection_id, cell);
                let _ = response.send(result);
            }

            SessionMessage::Restart {
                connection_id,
                response,
            } => {
                self.handle_restart(connection_id);
                let _ = response.send(Ok(()));
            }

            SessionMessage::Abandon {
                connection_id,
                response,
            } => {
                let was_member = self.handle_abandon(connection_id);
                let _ = response.send(was_member);
            }

            SessionMessage::Snapshot { response } => {
                let _ = response.send(self.snapshot());
            }
        }
    }

    fn handle_join(&mut self, participant: Participant) -> SessionResponse {
        let Participant {
            connection_id,
            outbound,
        } = participant;

        let event = self.session.join(connection_id)?;
        self.outbound.insert(connection_id, outbound);

        log::info!(
            "Connection {} joined session {} ({}/2)",
            connection_id,
            self.session.code(),
            self.session.participants().len()
        );

        if let Some(event) = ServerEvent::for_transition(&self.session, event) {
            self.broadcast(&event);
        }
        Ok(())
    }

    fn handle_move(&mut self, connection_id: ConnectionId, cell: usize) -> SessionResponse {
        let event = self.session.make_move(connection_id, cell)?;

        log::debug!(
            "Session {}: {} played cell {}, status {}",
            self.session.code(),
            connection_id,
            cell,
            self.session.status()
        );

        if let Some(event) = ServerEvent::for_transition(&self.session, event) {
            self.broadcast(&event);
        }
        Ok(())
    }

    fn handle_restart(&mut self, connection_id: ConnectionId) {
        let event = self.session.restart();

        log::info!(
            "Session {} restarted by {}",
            self.session.code(),
            connection_id
        );

        if let Some(event) = ServerEvent::for_transition(&self.session, event) {
            self.broadcast(&event);
        }
    }

    fn handle_abandon(&mut self, connection_id: ConnectionId) -> bool {
        if !self.session.contains(connection_id) {
            return false;
        }

        self.outbound.remove(&connection_id);
        self.broadcast(&ServerEvent::PlayerLeft);
        self.is_closed = true;

        log::info!(
            "Session {} ended because {} left",
            self.session.code(),
            connection_id
        );
        true
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            code: self.session.code().clone(),
            board: *self.session.board(),
            current_turn: self.session.turn(),
            status: self.session.status(),
            players: self.session.participants().to_vec(),
        }
    }

    /// Deliver an event to every participant still reachable.
    fn broadcast(&self, event: &ServerEvent) {
        for connection_id in self.session.participants() {
            let Some(outbound) = self.outbound.get(connection_id) else {
                continue;
            };
            if outbound.send(event.clone()).is_err() {
                log::warn!(
                    "Session {}: connection {} is gone, dropping event",
                    self.session.code(),
                    connection_id
                );
            }
        }
    }
}
