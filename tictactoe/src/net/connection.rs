//! Transport-assigned connection identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::ServerEvent;

/// Sending side of a connection's outbound event queue.
///
/// Unbounded so that a session actor never waits on a slow client.
pub type Outbound = mpsc::UnboundedSender<ServerEvent>;

/// Opaque per-connection token.
///
/// Assigned when a client connects and never reused. Only ever compared
/// and hashed, never parsed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
