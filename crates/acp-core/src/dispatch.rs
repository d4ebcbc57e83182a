//! Wires the wire method names onto [`Agent`]/[`Client`] callbacks and the
//! per-session job queues in [`SessionRegistry`].

use crate::agent::Agent;
use crate::client::Client;
use crate::connection::Dispatcher;
use crate::error::{AcpError, AcpResult};
use crate::session::SessionRegistry;
use acp_schema::{
    AuthenticateRequest, CancelNotification, CreateTerminalRequest, InitializeRequest,
    LoadSessionRequest, NewSessionRequest, PromptRequest, PromptResponse, ReadTextFileRequest,
    SessionId, SessionUpdateNotification, TerminalIdRequest, WriteTextFileRequest,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

fn require_params<T: for<'de> serde::Deserialize<'de>>(params: Option<Value>) -> AcpResult<T> {
    let value = params.ok_or_else(|| AcpError::InvalidParams("missing params".into()))?;
    serde_json::from_value(value).map_err(|e| AcpError::InvalidParams(e.to_string()))
}

fn to_value<T: serde::Serialize>(value: T) -> AcpResult<Value> {
    serde_json::to_value(value).map_err(|e| AcpError::Internal(e.to_string()))
}

/// One unit of work for a session's dedicated worker task, in the order the
/// connection received it.
enum SessionJob {
    Prompt(PromptRequest, oneshot::Sender<AcpResult<PromptResponse>>),
    Cancel(CancelNotification),
}

/// Dispatcher installed on an agent-role [`crate::connection::Connection`]:
/// routes inbound requests/notifications from the peer to an [`Agent`].
pub struct AgentDispatcher<A: Agent + 'static> {
    agent: Arc<A>,
    sessions: SessionRegistry<SessionJob>,
}

impl<A: Agent + 'static> AgentDispatcher<A> {
    pub fn new(agent: Arc<A>) -> Self {
        Self {
            agent,
            sessions: SessionRegistry::new(),
        }
    }

    fn worker_for(&self, id: SessionId) -> mpsc::Sender<SessionJob> {
        let agent = self.agent.clone();
        self.sessions.sender_for(id, move |mut rx: mpsc::Receiver<SessionJob>| {
            tokio::spawn(async move {
                while let Some(job) = rx.recv().await {
                    match job {
                        SessionJob::Prompt(request, reply) => {
                            let result = agent.handle_session_prompt(request).await;
                            let _ = reply.send(result);
                        }
                        SessionJob::Cancel(notification) => {
                            agent.handle_session_cancel(notification).await;
                        }
                    }
                }
            });
        })
    }
}

#[async_trait]
impl<A: Agent + 'static> Dispatcher for AgentDispatcher<A> {
    async fn dispatch_request(&self, method: &str, params: Option<Value>) -> AcpResult<Value> {
        match method {
            "initialize" => {
                let request: InitializeRequest = require_params(params)?;
                to_value(self.agent.handle_initialize(request).await?)
            }
            "authenticate" => {
                let request: AuthenticateRequest = require_params(params)?;
                self.agent.handle_authenticate(request).await?;
                Ok(Value::Null)
            }
            "session/new" => {
                let request: NewSessionRequest = require_params(params)?;
                let response = self.agent.handle_session_new(request).await?;
                self.worker_for(response.session_id.clone());
                to_value(response)
            }
            "session/load" => {
                let request: LoadSessionRequest = require_params(params)?;
                let session_id = request.session_id.clone();
                self.agent.handle_session_load(request).await?;
                self.worker_for(session_id);
                Ok(Value::Null)
            }
            "session/prompt" => {
                let request: PromptRequest = require_params(params)?;
                let worker = self.worker_for(request.session_id.clone());
                let (tx, rx) = oneshot::channel();
                worker
                    .send(SessionJob::Prompt(request, tx))
                    .await
                    .map_err(|_| AcpError::Internal("session worker unavailable".into()))?;
                let response = rx
                    .await
                    .map_err(|_| AcpError::Internal("session worker dropped the reply".into()))??;
                to_value(response)
            }
            other => Err(AcpError::MethodNotFound(other.to_string())),
        }
    }

    async fn dispatch_notification(&self, method: &str, params: Option<Value>) {
        if method != "session/cancel" {
            tracing::debug!("agent received unhandled notification: {method}");
            return;
        }
        let notification: CancelNotification = match require_params(params) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("malformed session/cancel notification: {e}");
                return;
            }
        };
        if !self.sessions.contains(&notification.session_id) {
            tracing::warn!(
                "session/cancel for unknown session {}",
                notification.session_id
            );
            return;
        }
        let worker = self.worker_for(notification.session_id.clone());
        if worker.send(SessionJob::Cancel(notification)).await.is_err() {
            tracing::warn!("session worker unavailable for cancel notification");
        }
    }
}

/// Dispatcher installed on a client-role [`crate::connection::Connection`]:
/// routes inbound requests/notifications from the agent to a [`Client`].
pub struct ClientDispatcher<C: Client + 'static> {
    client: Arc<C>,
    updates: SessionRegistry<SessionUpdateNotification>,
}

impl<C: Client + 'static> ClientDispatcher<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            updates: SessionRegistry::new(),
        }
    }

    fn update_worker(&self, id: SessionId) -> mpsc::Sender<SessionUpdateNotification> {
        let client = self.client.clone();
        self.updates.sender_for(id, move |mut rx: mpsc::Receiver<SessionUpdateNotification>| {
            tokio::spawn(async move {
                while let Some(notification) = rx.recv().await {
                    client.handle_session_update(notification).await;
                }
            });
        })
    }
}

#[async_trait]
impl<C: Client + 'static> Dispatcher for ClientDispatcher<C> {
    async fn dispatch_request(&self, method: &str, params: Option<Value>) -> AcpResult<Value> {
        match method {
            "fs/read_text_file" => {
                let request: ReadTextFileRequest = require_params(params)?;
                to_value(self.client.handle_fs_read_text_file(request).await?)
            }
            "fs/write_text_file" => {
                let request: WriteTextFileRequest = require_params(params)?;
                self.client.handle_fs_write_text_file(request).await?;
                Ok(Value::Null)
            }
            "terminal/create" => {
                let request: CreateTerminalRequest = require_params(params)?;
                to_value(self.client.handle_terminal_create(request).await?)
            }
            "terminal/output" => {
                let request: TerminalIdRequest = require_params(params)?;
                to_value(self.client.handle_terminal_output(request).await?)
            }
            "terminal/wait_for_exit" => {
                let request: TerminalIdRequest = require_params(params)?;
                to_value(self.client.handle_terminal_wait_for_exit(request).await?)
            }
            "terminal/kill" => {
                let request: TerminalIdRequest = require_params(params)?;
                self.client.handle_terminal_kill(request).await?;
                Ok(Value::Null)
            }
            "terminal/release" => {
                let request: TerminalIdRequest = require_params(params)?;
                self.client.handle_terminal_release(request).await?;
                Ok(Value::Null)
            }
            other => Err(AcpError::MethodNotFound(other.to_string())),
        }
    }

    async fn dispatch_notification(&self, method: &str, params: Option<Value>) {
        if method != "session/update" {
            tracing::debug!("client received unhandled notification: {method}");
            return;
        }
        let notification: SessionUpdateNotification = match require_params(params) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("malformed session/update notification: {e}");
                return;
            }
        };
        let worker = self.update_worker(notification.session_id.clone());
        if worker.send(notification).await.is_err() {
            tracing::warn!("session update worker unavailable");
        }
    }
}
