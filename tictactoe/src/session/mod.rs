//! Session module providing concurrent session management with async actors.
//!
//! This module implements:
//! - SessionActor: Async actor owning a single session
//! - SessionRegistry: Code-indexed store of live session handles
//! - Message-based communication with tokio channels
//!
//! ## Architecture
//!
//! Each session runs in a separate Tokio task with an mpsc message inbox.
//! Commands for one session are serialized by its actor; the registry is
//! only locked to insert, look up or remove handles.

pub mod actor;
pub mod config;
pub mod messages;
pub mod registry;

pub use actor::{SessionActor, SessionHandle};
pub use config::SessionConfig;
pub use messages::{Participant, SessionMessage, SessionResponse, SessionSnapshot};
pub use registry::SessionRegistry;
