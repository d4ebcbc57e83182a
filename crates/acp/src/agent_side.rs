//! Entry point for a process that plays the agent role.

use acp_core::{Agent, AgentDispatcher, Connection};
use acp_transport::{StdioTransport, Transport};
use std::sync::Arc;

/// Run `agent` over the current process's own stdio, returning the live
/// connection. The editor is assumed to have already spawned this process.
pub fn serve_on_stdio<A: Agent + 'static>(agent: Arc<A>) -> Arc<Connection> {
    tracing::info!("serving agent over inherited stdio");
    let transport: Arc<dyn Transport> = Arc::new(StdioTransport::inherited_stdio());
    let dispatcher = Arc::new(AgentDispatcher::new(agent));
    Connection::spawn(transport, dispatcher)
}
