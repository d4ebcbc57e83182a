//! The callback set a host implements when it plays the agent role
//! (spec §4.5, §6.1-§6.4).
//!
//! Every method here corresponds to one wire method, named the way the
//! connection's method-to-callback mapping would produce it: `session/new`
//! becomes `handle_session_new`. Optional callbacks (capability-gated, or
//! simply not every agent needing to support them) carry a default that
//! answers `-32601` so an unimplemented one behaves exactly like a method
//! the host never registered.

use crate::error::{AcpError, AcpResult};
use acp_schema::{
    AuthenticateRequest, CancelNotification, InitializeRequest, InitializeResponse,
    LoadSessionRequest, NewSessionRequest, NewSessionResponse, PromptRequest, PromptResponse,
};
use async_trait::async_trait;

/// Implemented by a host acting as the agent: it answers `initialize`,
/// manages sessions, and runs prompts.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Negotiate protocol version and capabilities. Mandatory — there is
    /// no sensible default.
    async fn handle_initialize(&self, request: InitializeRequest) -> AcpResult<InitializeResponse>;

    /// Authenticate the connection before session creation is permitted.
    /// Agents that advertise no auth methods can leave this unimplemented.
    async fn handle_authenticate(&self, request: AuthenticateRequest) -> AcpResult<()> {
        let _ = request;
        Err(AcpError::MethodNotFound("authenticate".into()))
    }

    /// Create a new session and return its freshly generated id.
    async fn handle_session_new(&self, request: NewSessionRequest) -> AcpResult<NewSessionResponse>;

    /// Resume a previously created session. Capability-gated by
    /// `agentCapabilities.loadSession` (spec §9, Open Question b).
    async fn handle_session_load(&self, request: LoadSessionRequest) -> AcpResult<()> {
        let _ = request;
        Err(AcpError::CapabilityNotSupported("session/load".into()))
    }

    /// Run a prompt to completion (or until cancelled) and report why it
    /// stopped.
    async fn handle_session_prompt(&self, request: PromptRequest) -> AcpResult<PromptResponse>;

    /// Best-effort cooperative cancellation: the agent is expected to
    /// consult a cancel flag it maintains, not be forcibly interrupted.
    async fn handle_session_cancel(&self, notification: CancelNotification);
}
