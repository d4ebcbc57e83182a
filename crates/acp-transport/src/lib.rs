//! ndjson-over-stdio transport for the Agent Client Protocol: spawning and
//! framing, nothing about JSON-RPC semantics (that's `acp-schema` and
//! `acp-core`).

pub mod error;
pub mod exec;
pub mod transport;

pub use error::{ClosedReason, TransportError, TransportResult};
pub use exec::resolve_executable;
pub use transport::{StdioTransport, Transport};
