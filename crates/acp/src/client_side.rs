//! Entry point for a process that plays the client (editor) role.

use acp_core::{Client, ClientDispatcher, Connection};
use acp_transport::{StdioTransport, Transport, TransportResult};
use std::sync::Arc;

/// Resolve and spawn `executable` as an agent subprocess, wire up `client`
/// to answer its callbacks, and return the live connection.
pub async fn spawn_agent<C: Client + 'static>(
    executable: &str,
    args: &[String],
    client: Arc<C>,
) -> TransportResult<Arc<Connection>> {
    tracing::info!(executable, "spawning agent subprocess");
    let transport: Arc<dyn Transport> = Arc::new(StdioTransport::spawn_agent(executable, args).await?);
    let dispatcher = Arc::new(ClientDispatcher::new(client));
    Ok(Connection::spawn(transport, dispatcher))
}
