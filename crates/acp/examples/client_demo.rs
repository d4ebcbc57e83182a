//! A minimal client that spawns an agent subprocess, opens one session,
//! sends a single text prompt, and prints what came back.
//!
//! All diagnostics go to stderr via `tracing`; stdout is left untouched
//! since this process owns the agent's stdin/stdout pipe, not its own.
//!
//! Usage:
//!   cargo run --example client_demo -- <agent-executable> [agent-args...] -- <prompt text>

use acp::{
    AcpResult, Client, ContentBlock, InitializeRequest, InitializeResponse, NewSessionRequest,
    NewSessionResponse, PromptRequest, PromptResponse, ReadTextFileRequest, ReadTextFileResponse,
    SessionUpdateNotification, PROTOCOL_VERSION,
};
use acp_schema::TextContent;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

struct LoggingClient;

#[async_trait]
impl Client for LoggingClient {
    async fn handle_session_update(&self, notification: SessionUpdateNotification) {
        tracing::info!(session_id = %notification.session_id, update = ?notification.update, "session update");
    }

    async fn handle_fs_read_text_file(
        &self,
        request: ReadTextFileRequest,
    ) -> AcpResult<ReadTextFileResponse> {
        let content = std::fs::read_to_string(&request.path)
            .map_err(|e| acp::AcpError::ResourceNotFound(format!("{}: {e}", request.path)))?;
        Ok(ReadTextFileResponse { content })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let mut argv = std::env::args().skip(1);
    let executable = argv.next().context("usage: client_demo <executable> [-- args] -- <prompt>")?;
    let mut agent_args = Vec::new();
    let mut prompt_words = Vec::new();
    let mut seen_separator = false;
    for arg in argv {
        if arg == "--" {
            seen_separator = true;
            continue;
        }
        if seen_separator {
            prompt_words.push(arg);
        } else {
            agent_args.push(arg);
        }
    }
    if prompt_words.is_empty() {
        bail!("no prompt text given after `--`");
    }
    let prompt_text = prompt_words.join(" ");

    let client = Arc::new(LoggingClient);
    let connection = acp::client_side::spawn_agent(&executable, &agent_args, client).await?;

    let init: InitializeResponse = connection
        .send_request(
            "initialize",
            InitializeRequest {
                protocol_version: PROTOCOL_VERSION,
                client_capabilities: Default::default(),
            },
            Duration::from_secs(5),
        )
        .await?;
    tracing::info!(protocol_version = init.protocol_version, "agent negotiated");

    let session: NewSessionResponse = connection
        .send_request(
            "session/new",
            NewSessionRequest {
                cwd: std::env::current_dir()?.to_string_lossy().into_owned(),
                mcp_servers: vec![],
            },
            Duration::from_secs(5),
        )
        .await?;
    tracing::info!(session_id = %session.session_id, "session opened");

    let response: PromptResponse = connection
        .send_request(
            "session/prompt",
            PromptRequest {
                session_id: session.session_id,
                prompt: vec![ContentBlock::Text(TextContent {
                    text: prompt_text,
                    meta: None,
                })],
            },
            Duration::from_secs(30),
        )
        .await?;
    println!("stop reason: {:?}", response.stop_reason);
    Ok(())
}
