//! ndjson-over-stdio transport.
//!
//! Adapted from `turbomcp-stdio`'s `StdioTransport`: a background reader
//! task drains the input stream into a bounded channel so `recv_line` never
//! blocks the caller on a slow or silent peer, while state uses the same
//! split the teacher does — `std::sync::Mutex` for the rarely-touched,
//! never-held-across-`.await` closed-reason cell, `tokio::sync::Mutex` for
//! the I/O handles that do cross `.await`.

use crate::error::{ClosedReason, TransportError, TransportResult};
use crate::exec::resolve_executable;
use async_trait::async_trait;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Mutex as TokioMutex};

/// Bound on the framing channel between the reader task and `recv_line`.
///
/// Unlike outbound sends (which must never drop a message), this channel
/// only ever holds already-validated ndjson lines waiting to be decoded;
/// a slow consumer backpressures the reader task via `send().await` rather
/// than losing lines.
const CHANNEL_CAPACITY: usize = 256;

/// A bidirectional line transport: write one ndjson line, read one ndjson
/// line, and report why it stopped doing either.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write one line (without its trailing `\n`). Rejects embedded
    /// newlines rather than silently splitting them into two frames.
    async fn send_line(&self, line: String) -> TransportResult<()>;

    /// Read the next line, or `Ok(None)` once the peer side has closed.
    async fn recv_line(&self) -> TransportResult<Option<String>>;

    /// Why the transport stopped, once it has. `None` while still open.
    fn closed_reason(&self) -> Option<ClosedReason>;
}

/// Transport over a pair of stdio-like streams, used both to spawn and
/// speak to an agent subprocess (client role) and to speak over the
/// current process's own stdio (agent role).
pub struct StdioTransport {
    writer: Arc<TokioMutex<Box<dyn tokio::io::AsyncWrite + Send + Unpin>>>,
    lines_in: Arc<TokioMutex<mpsc::Receiver<String>>>,
    closed: Arc<StdMutex<Option<ClosedReason>>>,
    // Held only so the client-role child is reaped on drop; the agent role
    // has no child to track.
    _child: Option<TokioMutex<Child>>,
}

impl StdioTransport {
    /// Resolve `executable` on `PATH` (or as a direct path, if it contains
    /// a separator), spawn it with piped stdin/stdout and inherited
    /// stderr, and frame its stdout as ndjson lines.
    pub async fn spawn_agent(executable: &str, args: &[String]) -> TransportResult<Self> {
        let resolved = resolve_executable(executable)?;

        let mut child = Command::new(&resolved)
            .args(args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| TransportError::SpawnFailed(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::SpawnFailed("child stdin not piped".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::SpawnFailed("child stdout not piped".into()))?;

        let closed = Arc::new(StdMutex::new(None));
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        spawn_line_reader(BufReader::new(stdout), tx, closed.clone());

        Ok(Self {
            writer: Arc::new(TokioMutex::new(Box::new(stdin))),
            lines_in: Arc::new(TokioMutex::new(rx)),
            closed,
            _child: Some(TokioMutex::new(child)),
        })
    }

    /// Speak ndjson over an arbitrary pair of async streams (e.g. one end
    /// of a [`tokio::io::duplex`] pipe), for testing both roles without a
    /// real subprocess.
    pub fn from_raw<R, W>(reader: R, writer: W) -> Self
    where
        R: tokio::io::AsyncRead + Send + Unpin + 'static,
        W: tokio::io::AsyncWrite + Send + Unpin + 'static,
    {
        let closed = Arc::new(StdMutex::new(None));
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        spawn_line_reader(BufReader::new(reader), tx, closed.clone());

        Self {
            writer: Arc::new(TokioMutex::new(Box::new(writer))),
            lines_in: Arc::new(TokioMutex::new(rx)),
            closed,
            _child: None,
        }
    }

    /// Speak ndjson over the current process's own stdin/stdout (agent
    /// role: the editor already spawned us).
    pub fn inherited_stdio() -> Self {
        let closed = Arc::new(StdMutex::new(None));
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        spawn_line_reader(BufReader::new(tokio::io::stdin()), tx, closed.clone());

        Self {
            writer: Arc::new(TokioMutex::new(Box::new(tokio::io::stdout()))),
            lines_in: Arc::new(TokioMutex::new(rx)),
            closed,
            _child: None,
        }
    }

    fn mark_closed(&self, reason: ClosedReason) {
        let mut slot = self.closed.lock().expect("closed-reason mutex poisoned");
        if slot.is_none() {
            *slot = Some(reason);
        }
    }

    /// Wait for the spawned agent process to exit and record why (spec
    /// §4.1's `closed(status)`). A no-op for the agent-role transport,
    /// which has no child to wait on.
    pub async fn wait_for_exit(&self) -> Option<ClosedReason> {
        let child_lock = self._child.as_ref()?;
        let mut child = child_lock.lock().await;
        let status = child.wait().await.ok()?;
        let reason = ClosedReason::ProcessExited {
            code: status.code(),
        };
        self.mark_closed(reason.clone());
        Some(reason)
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn send_line(&self, line: String) -> TransportResult<()> {
        if line.contains('\n') {
            return Err(TransportError::EmbeddedNewline);
        }
        let mut writer = self.writer.lock().await;
        let result = async {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;

        if let Err(e) = result {
            let reason = ClosedReason::WriteFailed(e.to_string());
            self.mark_closed(reason.clone());
            return Err(TransportError::Io(e.to_string()));
        }
        Ok(())
    }

    async fn recv_line(&self) -> TransportResult<Option<String>> {
        let mut rx = self.lines_in.lock().await;
        Ok(rx.recv().await)
    }

    fn closed_reason(&self) -> Option<ClosedReason> {
        self.closed.lock().expect("closed-reason mutex poisoned").clone()
    }
}

fn spawn_line_reader<R>(
    reader: BufReader<R>,
    sender: mpsc::Sender<String>,
    closed: Arc<StdMutex<Option<ClosedReason>>>,
) where
    R: tokio::io::AsyncRead + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if sender.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    let mut slot = closed.lock().expect("closed-reason mutex poisoned");
                    if slot.is_none() {
                        *slot = Some(ClosedReason::Eof);
                    }
                    break;
                }
                Err(e) => {
                    tracing::warn!("stdio transport read error: {e}");
                    let mut slot = closed.lock().expect("closed-reason mutex poisoned");
                    if slot.is_none() {
                        *slot = Some(ClosedReason::WriteFailed(e.to_string()));
                    }
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn from_raw_connects_both_ends_of_a_duplex_pipe() {
        let (client_io, agent_io) = tokio::io::duplex(4096);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (agent_read, agent_write) = tokio::io::split(agent_io);

        let client = StdioTransport::from_raw(client_read, client_write);
        let agent = StdioTransport::from_raw(agent_read, agent_write);

        client.send_line("ping".to_string()).await.unwrap();
        assert_eq!(agent.recv_line().await.unwrap(), Some("ping".to_string()));
    }

    #[tokio::test]
    async fn rejects_embedded_newline_on_send() {
        let transport = StdioTransport::spawn_agent("cat", &[]).await.unwrap();
        let result = transport.send_line("line1\nline2".to_string()).await;
        assert!(matches!(result, Err(TransportError::EmbeddedNewline)));
    }

    #[tokio::test]
    async fn echoes_a_line_through_cat() {
        let transport = StdioTransport::spawn_agent("cat", &[]).await.unwrap();
        transport.send_line("hello".to_string()).await.unwrap();
        let line = transport.recv_line().await.unwrap();
        assert_eq!(line, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn recv_returns_none_after_peer_exits() {
        // `true` exits immediately, closing its stdout.
        let transport = StdioTransport::spawn_agent("true", &[]).await.unwrap();
        let line = transport.recv_line().await.unwrap();
        assert_eq!(line, None);
    }

    #[tokio::test]
    async fn wait_for_exit_reports_exit_code() {
        let transport = StdioTransport::spawn_agent("true", &[]).await.unwrap();
        let reason = transport.wait_for_exit().await.unwrap();
        assert_eq!(reason, ClosedReason::ProcessExited { code: Some(0) });
    }

    #[tokio::test]
    async fn spawn_agent_rejects_unknown_executable() {
        let result = StdioTransport::spawn_agent("definitely-not-a-real-command-xyz", &[]).await;
        assert!(matches!(result, Err(TransportError::ExecutableNotFound(_))));
    }
}
