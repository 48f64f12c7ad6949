//! Per-connection state held by the transport.

use crate::{
    game::{errors::GameError, session::SessionCode},
    net::{
        connection::{ConnectionId, Outbound},
        messages::ServerEvent,
    },
    session::Participant,
};

/// One connected client.
///
/// Owned by the transport task serving the connection and passed to the
/// gateway on every command. Tracks at most one session membership.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    outbound: Outbound,
    pub(crate) session: Option<SessionCode>,
}

impl Connection {
    pub(crate) fn new(outbound: Outbound) -> Self {
        Self {
            id: ConnectionId::new(),
            outbound,
            session: None,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Session this connection last created or joined.
    ///
    /// May be stale if the other participant left; the registry is the
    /// source of truth.
    pub fn session(&self) -> Option<&SessionCode> {
        self.session.as_ref()
    }

    pub(crate) fn participant(&self) -> Participant {
        Participant {
            connection_id: self.id,
            outbound: self.outbound.clone(),
        }
    }

    /// Unicast an event. Returns `false` if the client is gone.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.outbound.send(event).is_ok()
    }

    /// Report a rejected command to this connection only.
    pub fn reject(&self, error: &GameError) {
        log::debug!("Rejecting command from {}: {}", self.id, error);
        self.send(ServerEvent::rejected(error));
    }
}
