//! Cleanup of sessions left behind by lost connections.

use std::sync::Arc;

use crate::{game::session::SessionCode, net::connection::ConnectionId, session::SessionRegistry};

/// Retires the session a lost connection belonged to.
#[derive(Clone)]
pub struct Reaper {
    registry: Arc<SessionRegistry>,
}

impl Reaper {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Find the session `connection_id` took part in, tell the remaining
    /// participant and remove the session.
    ///
    /// Scans every live session; a connection belongs to at most one. A
    /// connection that was never a participant is a no-op.
    pub async fn reap(&self, connection_id: ConnectionId) -> Option<SessionCode> {
        for handle in self.registry.handles().await {
            if handle.abandon(connection_id).await {
                self.registry.retire(&handle).await;
                log::info!(
                    "Session {} retired after {} disconnected",
                    handle.code(),
                    connection_id
                );
                return Some(handle.code().clone());
            }
        }
        None
    }
}
