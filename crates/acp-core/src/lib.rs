//! Connection lifecycle, session multiplexing and the host-facing traits
//! for the Agent Client Protocol.
//!
//! `acp-schema` describes the wire shapes; `acp-transport` moves bytes;
//! this crate is where dispatch, correlation and per-session ordering
//! live.

pub mod agent;
pub mod client;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod session;

pub use agent::Agent;
pub use client::Client;
pub use connection::{Connection, ConnectionState, Dispatcher};
pub use dispatch::{AgentDispatcher, ClientDispatcher};
pub use error::{AcpError, AcpResult};
pub use session::SessionRegistry;
