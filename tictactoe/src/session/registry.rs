//! Registry of live sessions keyed by code.

use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{
    actor::{SessionActor, SessionHandle},
    config::SessionConfig,
};
use crate::game::session::SessionCode;

/// Owns every live session.
///
/// The lock only guards the code-to-handle map. Commands run inside each
/// session's actor, so unrelated sessions never wait on each other.
pub struct SessionRegistry {
    /// Live session handles
    sessions: RwLock<HashMap<SessionCode, SessionHandle>>,

    /// Configuration handed to every new actor
    config: SessionConfig,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create and spawn a new, empty session.
    ///
    /// Draws up to `max_code_attempts` codes looking for a free one. If all
    /// of them collide the last one replaces the live entry.
    pub async fn create(&self) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        let code = fresh_code(&sessions, self.config.max_code_attempts, &mut rand::rng());

        let (actor, handle) = SessionActor::new(code.clone(), &self.config);
        if sessions.insert(code.clone(), handle.clone()).is_some() {
            log::warn!("Session code {} collided, replacing the live session", code);
        }
        drop(sessions);

        tokio::spawn(actor.run());

        log::info!("Session created: {}", code);
        handle
    }

    pub async fn get(&self, code: &SessionCode) -> Option<SessionHandle> {
        self.sessions.read().await.get(code).cloned()
    }

    /// Remove a session by code. Removing an absent code is a no-op.
    pub async fn remove(&self, code: &SessionCode) -> bool {
        self.sessions.write().await.remove(code).is_some()
    }

    /// Remove `handle`'s entry, but only if its code still maps to that
    /// same actor.
    pub async fn retire(&self, handle: &SessionHandle) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(handle.code()) {
            Some(current) if current.same_session(handle) => {
                sessions.remove(handle.code());
                true
            }
            _ => false,
        }
    }

    /// Snapshot of every live handle.
    pub async fn handles(&self) -> Vec<SessionHandle> {
        self.sessions.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Draw codes until one is not in `taken`, giving up after `attempts`.
fn fresh_code<R: Rng>(
    taken: &HashMap<SessionCode, SessionHandle>,
    attempts: u32,
    rng: &mut R,
) -> SessionCode {
    let mut code = SessionCode::generate(rng);
    for _ in 1..attempts {
        if !taken.contains_key(&code) {
            break;
        }
        code = SessionCode::generate(rng);
    }
    code
}
