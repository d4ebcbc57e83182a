//! The callback set a host implements when it plays the client role
//! (spec §4.5, §6.3, §6.4).

use crate::error::{AcpError, AcpResult};
use acp_schema::{
    CreateTerminalRequest, CreateTerminalResponse, ReadTextFileRequest, ReadTextFileResponse,
    SessionUpdateNotification, TerminalIdRequest, TerminalOutputResponse, WaitForExitResponse,
    WriteTextFileRequest,
};
use async_trait::async_trait;

/// Implemented by a host acting as the client: it streams session updates
/// from the agent and, if it advertised the matching capability, serves
/// filesystem and terminal requests on the agent's behalf.
#[async_trait]
pub trait Client: Send + Sync {
    /// One streamed chunk of agent output, tool-call progress, or plan
    /// update. Mandatory: a client with nothing to do with updates still
    /// needs to drain them so prompt responses aren't starved.
    async fn handle_session_update(&self, notification: SessionUpdateNotification);

    /// Read a text file, gated by `clientCapabilities.fs.readTextFile`.
    async fn handle_fs_read_text_file(
        &self,
        request: ReadTextFileRequest,
    ) -> AcpResult<ReadTextFileResponse> {
        let _ = request;
        Err(AcpError::CapabilityNotSupported("fs/read_text_file".into()))
    }

    /// Write a text file, gated by `clientCapabilities.fs.writeTextFile`.
    async fn handle_fs_write_text_file(&self, request: WriteTextFileRequest) -> AcpResult<()> {
        let _ = request;
        Err(AcpError::CapabilityNotSupported("fs/write_text_file".into()))
    }

    /// Start a terminal, gated by `clientCapabilities.terminal`.
    async fn handle_terminal_create(
        &self,
        request: CreateTerminalRequest,
    ) -> AcpResult<CreateTerminalResponse> {
        let _ = request;
        Err(AcpError::CapabilityNotSupported("terminal/create".into()))
    }

    /// Fetch a terminal's buffered output so far.
    async fn handle_terminal_output(
        &self,
        request: TerminalIdRequest,
    ) -> AcpResult<TerminalOutputResponse> {
        let _ = request;
        Err(AcpError::CapabilityNotSupported("terminal/output".into()))
    }

    /// Block until a terminal's command exits.
    async fn handle_terminal_wait_for_exit(
        &self,
        request: TerminalIdRequest,
    ) -> AcpResult<WaitForExitResponse> {
        let _ = request;
        Err(AcpError::CapabilityNotSupported(
            "terminal/wait_for_exit".into(),
        ))
    }

    /// Kill a terminal's running command without releasing its resources.
    async fn handle_terminal_kill(&self, request: TerminalIdRequest) -> AcpResult<()> {
        let _ = request;
        Err(AcpError::CapabilityNotSupported("terminal/kill".into()))
    }

    /// Release a terminal's resources entirely.
    async fn handle_terminal_release(&self, request: TerminalIdRequest) -> AcpResult<()> {
        let _ = request;
        Err(AcpError::CapabilityNotSupported("terminal/release".into()))
    }
}
