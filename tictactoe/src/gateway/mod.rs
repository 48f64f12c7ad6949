//! Connection gateway: the bridge between a transport and the sessions.
//!
//! A transport hands each new client an outbound channel and calls
//! [`Gateway::connect`]. Every decoded command then goes through
//! [`Gateway::dispatch`], and [`Gateway::disconnect`] runs the [`Reaper`]
//! when the client goes away.

pub mod connection;
pub mod dispatcher;
pub mod reaper;

pub use connection::Connection;
pub use dispatcher::Gateway;
pub use reaper::Reaper;
