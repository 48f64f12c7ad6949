//! Wire protocol between clients and the session engine.
//!
//! Commands and events are JSON objects tagged by a `type` field. The
//! transport that carries them (WebSocket in the bundled server) lives
//! outside this crate.

/// Connection identity assigned by the transport.
pub mod connection;

/// Inbound commands and outbound events.
pub mod messages;

pub use connection::{ConnectionId, Outbound};
pub use messages::{ClientCommand, ErrorCode, ServerEvent};
