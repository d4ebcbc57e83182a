//! A minimal agent that echoes each prompt's first text block back as its
//! own response, then waits for the connection to close.
//!
//! stdout is reserved for ndjson protocol frames — all diagnostics go to
//! stderr, including `tracing`'s own output.
//!
//! Usage:
//!   cargo run --example agent_demo

use acp::{
    AcpResult, Agent, AuthenticateRequest, CancelNotification, InitializeRequest,
    InitializeResponse, NewSessionRequest, NewSessionResponse, PromptRequest, PromptResponse,
    SessionId, StopReason, PROTOCOL_VERSION,
};
use acp_schema::ContentBlock;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

struct EchoAgent {
    cancelled: AtomicBool,
}

#[async_trait]
impl Agent for EchoAgent {
    async fn handle_initialize(&self, request: InitializeRequest) -> AcpResult<InitializeResponse> {
        tracing::info!(protocol_version = request.protocol_version, "negotiating");
        Ok(InitializeResponse {
            protocol_version: PROTOCOL_VERSION,
            agent_capabilities: Default::default(),
            auth_methods: vec![],
        })
    }

    async fn handle_authenticate(&self, _request: AuthenticateRequest) -> AcpResult<()> {
        Ok(())
    }

    async fn handle_session_new(&self, request: NewSessionRequest) -> AcpResult<NewSessionResponse> {
        let session_id = SessionId::generate();
        tracing::info!(%session_id, cwd = %request.cwd, "session opened");
        Ok(NewSessionResponse {
            session_id,
            capabilities: None,
        })
    }

    async fn handle_session_prompt(&self, request: PromptRequest) -> AcpResult<PromptResponse> {
        self.cancelled.store(false, Ordering::SeqCst);
        let echoed = request
            .prompt
            .iter()
            .find_map(|block| match block {
                ContentBlock::Text(text) => Some(text.text.clone()),
                _ => None,
            })
            .unwrap_or_default();
        tracing::info!(%echoed, "echoing prompt");

        if self.cancelled.load(Ordering::SeqCst) {
            return Ok(PromptResponse {
                stop_reason: StopReason::Cancelled,
            });
        }
        Ok(PromptResponse {
            stop_reason: StopReason::EndTurn,
        })
    }

    async fn handle_session_cancel(&self, notification: CancelNotification) {
        tracing::info!(session_id = %notification.session_id, "cancel requested");
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let agent = std::sync::Arc::new(EchoAgent {
        cancelled: AtomicBool::new(false),
    });
    let connection = acp::agent_side::serve_on_stdio(agent);

    while connection.state() != acp::ConnectionState::Terminated {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    Ok(())
}
