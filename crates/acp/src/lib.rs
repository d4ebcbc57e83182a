//! Agent Client Protocol: a small bidirectional JSON-RPC-over-ndjson
//! library for connecting an editor (client) to a coding-agent subprocess
//! (agent).
//!
//! - `acp-schema` — wire types, codec
//! - `acp-transport` — ndjson framing and subprocess spawning
//! - `acp-core` — connection, session multiplexing, host traits
//!
//! This crate just wires the three together behind two small entry
//! points: [`agent_side::serve_on_stdio`] and [`client_side::spawn_agent`].

pub mod agent_side;
pub mod client_side;

pub use acp_core::{
    Agent, AgentDispatcher, AcpError, AcpResult, Client, ClientDispatcher, Connection,
    ConnectionState, Dispatcher,
};
pub use acp_schema::{
    AgentCapabilities, AuthenticateRequest, CancelNotification, ClientCapabilities, ContentBlock,
    CreateTerminalRequest, CreateTerminalResponse, ExitStatus, FsCapabilities, InitializeRequest,
    InitializeResponse, LoadSessionRequest, McpCapabilities, McpServerConfig, NewSessionRequest,
    NewSessionResponse, PromptCapabilities, PromptRequest, PromptResponse, ReadTextFileRequest,
    ReadTextFileResponse, SessionCapabilities, SessionId, SessionUpdate, SessionUpdateNotification,
    StopReason, TerminalIdRequest, TerminalOutputResponse, WaitForExitResponse,
    WriteTextFileRequest, PROTOCOL_VERSION,
};
pub use acp_transport::{ClosedReason, StdioTransport, Transport, TransportError};
