//! Wire schema and codec for the Agent Client Protocol: the JSON-RPC
//! envelope, the ACP-specific message payloads, and the tagged unions
//! (Content Block, Session Update) that ride inside them.
//!
//! This crate has no async runtime and no I/O; it only knows how to turn
//! bytes into typed values and back. `acp-transport` owns framing,
//! `acp-core` owns dispatch.

pub mod capabilities;
pub mod codec;
pub mod content;
pub mod jsonrpc;
pub mod messages;
pub mod session_id;
pub mod session_update;

pub use capabilities::{
    AgentCapabilities, ClientCapabilities, FsCapabilities, McpCapabilities, PromptCapabilities,
    SessionCapabilities,
};
pub use codec::{decode_line, encode_line, CodecError};
pub use content::{AudioContent, ContentBlock, EmbeddedResource, EmbeddedResourceContents, ImageContent, ResourceLink, TextContent};
pub use jsonrpc::{
    error_codes, JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, JsonRpcResponsePayload, JsonRpcVersion, RequestId, ResponseId,
};
pub use messages::*;
pub use session_id::{InvalidSessionId, SessionId};
pub use session_update::{
    AvailableCommand, PlanEntry, PlanEntryPriority, PlanEntryStatus, SessionUpdate, ToolCallStatus,
    ToolCallUpdate,
};
