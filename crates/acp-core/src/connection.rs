//! The connection actor: single consumer of the transport, pending-request
//! correlation, and inbound dispatch.
//!
//! Grounded in `turbomcp-client`'s `MessageDispatcher` (one background task
//! owns `transport.receive()`, responses are routed to `oneshot` waiters,
//! requests/notifications go to a handler) generalized to ACP's genuinely
//! bidirectional shape: both sides can originate requests, so the same
//! actor both answers inbound calls (via [`Dispatcher`]) and tracks
//! outbound ones (via the pending table).

use crate::error::{AcpError, AcpResult};
use acp_schema::{
    decode_line, encode_line, error_codes, JsonRpcError, JsonRpcMessage, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, RequestId,
};
use acp_transport::Transport;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::oneshot;
use tokio::time::Duration;

/// Routes inbound requests/notifications to whatever host callbacks the
/// connection's role (agent or client) implements.
///
/// Implementations translate `method` the way the wire protocol's
/// method-to-callback mapping describes (`session/prompt` ->
/// `handle_session_prompt`) as a match over known method strings, the
/// direct Rust equivalent of that string transform, with an unmatched arm
/// answering `AcpError::MethodNotFound`.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch_request(&self, method: &str, params: Option<Value>) -> AcpResult<Value>;
    async fn dispatch_notification(&self, method: &str, params: Option<Value>);
}

/// Connection lifecycle (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Accepting and issuing messages normally.
    Active,
    /// `shutdown()` has been called; no new outbound requests are issued,
    /// but already-pending ones are still awaited.
    Draining,
    /// The read loop has exited; all pending requests have been failed.
    Terminated,
}

type PendingTable = StdMutex<HashMap<RequestId, oneshot::Sender<Result<Value, JsonRpcError>>>>;

/// The live connection: owns the transport, the outbound id allocator, the
/// pending-request table, and drives the read loop.
pub struct Connection {
    transport: Arc<dyn Transport>,
    next_id: AtomicI64,
    pending: PendingTable,
    state: StdMutex<ConnectionState>,
}

impl Connection {
    /// Start the connection: spawns the single read-loop task that owns
    /// `transport.recv_line()` for the rest of the connection's life.
    pub fn spawn(transport: Arc<dyn Transport>, dispatcher: Arc<dyn Dispatcher>) -> Arc<Self> {
        let connection = Arc::new(Self {
            transport,
            next_id: AtomicI64::new(1),
            pending: StdMutex::new(HashMap::new()),
            state: StdMutex::new(ConnectionState::Active),
        });

        tokio::spawn(Self::read_loop(connection.clone(), dispatcher));
        connection
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock().expect("connection state mutex poisoned")
    }

    /// Begin graceful shutdown: stop issuing new requests, let in-flight
    /// ones finish or time out on their own.
    pub fn drain(&self) {
        let mut state = self.state.lock().expect("connection state mutex poisoned");
        if *state == ConnectionState::Active {
            *state = ConnectionState::Draining;
        }
    }

    /// Send a request and await its response, or fail it after `timeout`.
    pub async fn send_request<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: P,
        timeout: Duration,
    ) -> AcpResult<R> {
        if self.state() == ConnectionState::Terminated {
            return Err(AcpError::ConnectionClosed(None));
        }

        let id = RequestId::Number(self.next_id.fetch_add(1, Ordering::Relaxed));
        let request = JsonRpcRequest::new(id.clone(), method, params)
            .map_err(|e| AcpError::InvalidParams(e.to_string()))?;

        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("pending table mutex poisoned")
            .insert(id.clone(), tx);

        let line = encode_line(&JsonRpcMessage::Request(request))
            .map_err(|e| AcpError::Internal(e.to_string()))?;
        if let Err(e) = self.transport.send_line(line).await {
            self.pending.lock().expect("pending table mutex poisoned").remove(&id);
            return Err(AcpError::ConnectionClosed(Some(e.to_string())));
        }

        let outcome = tokio::time::timeout(timeout, rx).await;
        match outcome {
            Ok(Ok(Ok(result))) => {
                serde_json::from_value(result).map_err(|e| AcpError::InvalidParams(e.to_string()))
            }
            Ok(Ok(Err(error))) => Err(acp_error_from_wire(error)),
            Ok(Err(_canceled)) => Err(AcpError::ConnectionClosed(None)),
            Err(_elapsed) => {
                self.pending.lock().expect("pending table mutex poisoned").remove(&id);
                Err(AcpError::Timeout(method.to_string()))
            }
        }
    }

    /// Send a notification; no bookkeeping, no reply expected.
    pub async fn send_notification<P: Serialize>(&self, method: &str, params: P) -> AcpResult<()> {
        let notification = JsonRpcNotification::new(method, params)
            .map_err(|e| AcpError::InvalidParams(e.to_string()))?;
        let line = encode_line(&JsonRpcMessage::Notification(notification))
            .map_err(|e| AcpError::Internal(e.to_string()))?;
        self.transport
            .send_line(line)
            .await
            .map_err(|e| AcpError::ConnectionClosed(Some(e.to_string())))
    }

    async fn read_loop(connection: Arc<Self>, dispatcher: Arc<dyn Dispatcher>) {
        loop {
            match connection.transport.recv_line().await {
                Ok(Some(line)) => {
                    let message = match decode_line(&line) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::warn!("dropping malformed line: {e}");
                            continue;
                        }
                    };
                    Self::route(&connection, &dispatcher, message).await;
                }
                Ok(None) => {
                    tracing::debug!("transport closed, terminating connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("transport read error: {e}");
                    break;
                }
            }
        }
        connection.terminate();
    }

    async fn route(connection: &Arc<Self>, dispatcher: &Arc<dyn Dispatcher>, message: JsonRpcMessage) {
        match message {
            JsonRpcMessage::Response(response) => connection.complete_pending(response),
            JsonRpcMessage::Request(request) => {
                let connection = connection.clone();
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    let result = dispatcher
                        .dispatch_request(&request.method, request.params)
                        .await;
                    let response = match result {
                        Ok(value) => JsonRpcResponse::success(request.id, value),
                        Err(err) => JsonRpcResponse::error(request.id, err.into()),
                    };
                    if let Ok(line) = encode_line(&JsonRpcMessage::Response(response)) {
                        if let Err(e) = connection.transport.send_line(line).await {
                            tracing::warn!("failed to send response: {e}");
                        }
                    }
                });
            }
            JsonRpcMessage::Notification(notification) => {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher
                        .dispatch_notification(&notification.method, notification.params)
                        .await;
                });
            }
        }
    }

    fn complete_pending(&self, response: JsonRpcResponse) {
        let Some(id) = response.id.as_request_id().cloned() else {
            tracing::warn!("received a response with a null id outside of a parse-error context");
            return;
        };
        let waiter = self
            .pending
            .lock()
            .expect("pending table mutex poisoned")
            .remove(&id);
        let Some(waiter) = waiter else {
            tracing::warn!("received response for unknown or expired request id: {id}");
            return;
        };
        let outcome = match response.payload {
            acp_schema::JsonRpcResponsePayload::Success { result } => Ok(result),
            acp_schema::JsonRpcResponsePayload::Error { error } => Err(error),
        };
        let _ = waiter.send(outcome);
    }

    fn terminate(&self) {
        *self.state.lock().expect("connection state mutex poisoned") = ConnectionState::Terminated;
        let mut pending = self.pending.lock().expect("pending table mutex poisoned");
        for (_, waiter) in pending.drain() {
            let _ = waiter.send(Err(JsonRpcError::new(
                error_codes::INTERNAL_ERROR,
                "connection closed while request was pending",
            )));
        }
    }
}

fn acp_error_from_wire(error: JsonRpcError) -> AcpError {
    match error.code {
        error_codes::METHOD_NOT_FOUND => AcpError::MethodNotFound(error.message),
        error_codes::INVALID_PARAMS => AcpError::InvalidParams(error.message),
        error_codes::RESOURCE_NOT_FOUND => AcpError::ResourceNotFound(error.message),
        error_codes::PERMISSION_DENIED => AcpError::PermissionDenied(error.message),
        error_codes::INVALID_STATE => AcpError::InvalidState(error.message),
        error_codes::CAPABILITY_NOT_SUPPORTED => AcpError::CapabilityNotSupported(error.message),
        _ => AcpError::Internal(error.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acp_transport::{ClosedReason, TransportResult};
    use std::sync::atomic::AtomicBool;
    use tokio::sync::Mutex as TokioMutex;

    /// An in-memory transport pairing two ends of an mpsc channel, for
    /// exercising the connection without a real subprocess.
    struct ChannelTransport {
        outbound: tokio::sync::mpsc::Sender<String>,
        inbound: TokioMutex<tokio::sync::mpsc::Receiver<String>>,
        closed: AtomicBool,
    }

    #[async_trait]
    impl Transport for ChannelTransport {
        async fn send_line(&self, line: String) -> TransportResult<()> {
            self.outbound
                .send(line)
                .await
                .map_err(|_| acp_transport::TransportError::Closed(ClosedReason::Eof))
        }

        async fn recv_line(&self) -> TransportResult<Option<String>> {
            Ok(self.inbound.lock().await.recv().await)
        }

        fn closed_reason(&self) -> Option<ClosedReason> {
            if self.closed.load(Ordering::Relaxed) {
                Some(ClosedReason::Eof)
            } else {
                None
            }
        }
    }

    fn paired_transports() -> (Arc<ChannelTransport>, Arc<ChannelTransport>) {
        let (a_tx, b_rx) = tokio::sync::mpsc::channel(32);
        let (b_tx, a_rx) = tokio::sync::mpsc::channel(32);
        let a = Arc::new(ChannelTransport {
            outbound: a_tx,
            inbound: TokioMutex::new(a_rx),
            closed: AtomicBool::new(false),
        });
        let b = Arc::new(ChannelTransport {
            outbound: b_tx,
            inbound: TokioMutex::new(b_rx),
            closed: AtomicBool::new(false),
        });
        (a, b)
    }

    struct EchoDispatcher;

    #[async_trait]
    impl Dispatcher for EchoDispatcher {
        async fn dispatch_request(&self, method: &str, params: Option<Value>) -> AcpResult<Value> {
            if method == "echo" {
                Ok(params.unwrap_or(Value::Null))
            } else {
                Err(AcpError::MethodNotFound(method.to_string()))
            }
        }

        async fn dispatch_notification(&self, _method: &str, _params: Option<Value>) {}
    }

    #[tokio::test]
    async fn request_reply_roundtrip_over_paired_transports() {
        let (client_transport, server_transport) = paired_transports();
        let _server = Connection::spawn(server_transport, Arc::new(EchoDispatcher));
        let client = Connection::spawn(client_transport, Arc::new(EchoDispatcher));

        let result: Value = client
            .send_request("echo", serde_json::json!({"hello": "world"}), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!({"hello": "world"}));
    }

    #[tokio::test]
    async fn unknown_method_surfaces_method_not_found() {
        let (client_transport, server_transport) = paired_transports();
        let _server = Connection::spawn(server_transport, Arc::new(EchoDispatcher));
        let client = Connection::spawn(client_transport, Arc::new(EchoDispatcher));

        let result: AcpResult<Value> = client
            .send_request("foo/bar", serde_json::json!({}), Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(AcpError::MethodNotFound(m)) if m.contains("foo/bar")));
    }

    #[tokio::test]
    async fn pending_requests_fail_once_the_transport_closes() {
        let (client_transport, server_transport) = paired_transports();
        // Drop the server side immediately so nothing ever answers.
        drop(server_transport);
        let client = Connection::spawn(client_transport, Arc::new(EchoDispatcher));

        let result: AcpResult<Value> = client
            .send_request("echo", serde_json::json!({}), Duration::from_millis(200))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn drain_moves_state_without_severing_in_flight_requests() {
        let (client_transport, server_transport) = paired_transports();
        let _server = Connection::spawn(server_transport, Arc::new(EchoDispatcher));
        let client = Connection::spawn(client_transport, Arc::new(EchoDispatcher));

        client.drain();
        assert_eq!(client.state(), ConnectionState::Draining);

        let result: Value = client
            .send_request("echo", serde_json::json!(1), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!(1));
    }
}
