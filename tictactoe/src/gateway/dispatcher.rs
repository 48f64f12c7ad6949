//! Routing of client commands to sessions.

use std::sync::Arc;

use super::{connection::Connection, reaper::Reaper};
use crate::{
    game::{board::BOARD_SIZE, errors::GameError, session::SessionCode},
    net::{
        connection::Outbound,
        messages::{ClientCommand, ServerEvent},
    },
    session::{SessionHandle, SessionRegistry},
};

/// Entry point for everything a connection does.
///
/// Validates the shape of each command, resolves its session through the
/// registry and forwards it to the session actor. Rejections are unicast to
/// the originating connection; state changes are broadcast by the actor.
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<SessionRegistry>,
    reaper: Reaper,
}

impl Gateway {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        let reaper = Reaper::new(registry.clone());
        Self { registry, reaper }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Register a new client whose events go to `outbound`.
    pub fn connect(&self, outbound: Outbound) -> Connection {
        let connection = Connection::new(outbound);
        log::info!("Connection opened: {}", connection.id());
        connection
    }

    /// Handle one command from `connection`.
    ///
    /// Returns once the outcome (success events or a rejection) has been
    /// queued for delivery.
    pub async fn dispatch(&self, connection: &mut Connection, command: ClientCommand) {
        if let Err(error) = self.execute(connection, command).await {
            connection.reject(&error);
        }
    }

    /// Retire whatever session the connection was part of.
    pub async fn disconnect(&self, connection: Connection) -> Option<SessionCode> {
        log::info!("Connection closed: {}", connection.id());
        self.reaper.reap(connection.id()).await
    }

    async fn execute(
        &self,
        connection: &mut Connection,
        command: ClientCommand,
    ) -> Result<(), GameError> {
        match command {
            ClientCommand::CreateGame => self.create_game(connection).await,

            ClientCommand::JoinGame { game_id } => {
                let code = SessionCode::parse(&game_id)?;
                self.join_game(connection, code).await
            }

            ClientCommand::MakeMove { game_id, index } => {
                let code = SessionCode::parse(&game_id)?;
                let cell = parse_cell(index)?;
                self.lookup(&code)
                    .await?
                    .make_move(connection.id(), cell)
                    .await
            }

            ClientCommand::RestartGame { game_id } => {
                let code = SessionCode::parse(&game_id)?;
                self.lookup(&code).await?.restart(connection.id()).await
            }
        }
    }

    async fn create_game(&self, connection: &mut Connection) -> Result<(), GameError> {
        let handle = self.registry.create().await;
        handle.join(connection.participant()).await?;

        let code = handle.code().clone();
        self.switch_membership(connection, code.clone()).await;
        connection.send(ServerEvent::GameCreated { game_id: code });
        Ok(())
    }

    async fn join_game(
        &self,
        connection: &mut Connection,
        code: SessionCode,
    ) -> Result<(), GameError> {
        self.lookup(&code)
            .await?
            .join(connection.participant())
            .await?;

        self.switch_membership(connection, code).await;
        Ok(())
    }

    async fn lookup(&self, code: &SessionCode) -> Result<SessionHandle, GameError> {
        self.registry.get(code).await.ok_or(GameError::NotFound)
    }

    /// Record `code` as the connection's session, abandoning any other
    /// session it was still part of.
    async fn switch_membership(&self, connection: &mut Connection, code: SessionCode) {
        let previous = connection.session.replace(code.clone());

        if let Some(previous) = previous
            && previous != code
            && let Some(handle) = self.registry.get(&previous).await
            && handle.abandon(connection.id()).await
        {
            self.registry.retire(&handle).await;
            log::info!(
                "Session {} abandoned: {} moved to {}",
                previous,
                connection.id(),
                code
            );
        }
    }
}

/// Validate a raw cell index from the wire.
fn parse_cell(index: i64) -> Result<usize, GameError> {
    usize::try_from(index)
        .ok()
        .filter(|cell| *cell < BOARD_SIZE)
        .ok_or_else(|| GameError::InvalidInput(format!("cell index {index} out of range")))
}
