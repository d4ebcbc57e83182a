//! Method-specific request/response payloads (spec §6).
//!
//! These are the `params`/`result` bodies that ride inside the generic
//! [`crate::jsonrpc`] envelope; nothing here knows about request ids or
//! dispatch.

use crate::capabilities::{AgentCapabilities, ClientCapabilities, SessionCapabilities};
use crate::content::ContentBlock;
use crate::session_id::SessionId;
use crate::session_update::SessionUpdate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Highest protocol version this crate speaks.
pub const PROTOCOL_VERSION: u32 = 1;

// ---------------------------------------------------------------- initialize

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitializeRequest {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: u32,
    #[serde(rename = "clientCapabilities", default)]
    pub client_capabilities: ClientCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitializeResponse {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: u32,
    #[serde(rename = "agentCapabilities", default)]
    pub agent_capabilities: AgentCapabilities,
    #[serde(rename = "authMethods", default)]
    pub auth_methods: Vec<AuthMethod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthMethod {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticateRequest {
    #[serde(rename = "methodId")]
    pub method_id: String,
}

// ------------------------------------------------------------- session/new

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSessionRequest {
    pub cwd: String,
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: Vec<McpServerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct McpServerConfig {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<SessionCapabilities>,
}

// ------------------------------------------------------------ session/load

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadSessionRequest {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub cwd: String,
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: Vec<McpServerConfig>,
}

// ---------------------------------------------------------- session/prompt

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptRequest {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub prompt: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    Refusal,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptResponse {
    #[serde(rename = "stopReason")]
    pub stop_reason: StopReason,
}

// --------------------------------------------------------- session/cancel

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancelNotification {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
}

// --------------------------------------------------------- session/update

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUpdateNotification {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub update: SessionUpdate,
}

// ----------------------------------------------------------------- fs/*

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadTextFileRequest {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadTextFileResponse {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteTextFileRequest {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub path: String,
    pub content: String,
}

// ------------------------------------------------------------- terminal/*

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTerminalRequest {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(rename = "outputByteLimit", default, skip_serializing_if = "Option::is_none")]
    pub output_byte_limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTerminalResponse {
    #[serde(rename = "terminalId")]
    pub terminal_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerminalIdRequest {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    #[serde(rename = "terminalId")]
    pub terminal_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerminalOutputResponse {
    pub output: String,
    pub truncated: bool,
    #[serde(rename = "exitStatus", default, skip_serializing_if = "Option::is_none")]
    pub exit_status: Option<ExitStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitForExitResponse {
    #[serde(rename = "exitStatus")]
    pub exit_status: ExitStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExitStatus {
    #[serde(rename = "exitCode", default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::FsCapabilities;
    use pretty_assertions::assert_eq;

    #[test]
    fn initialize_request_roundtrip() {
        let req = InitializeRequest {
            protocol_version: PROTOCOL_VERSION,
            client_capabilities: ClientCapabilities {
                fs: Some(FsCapabilities {
                    read_text_file: true,
                    write_text_file: true,
                }),
                terminal: false,
            },
        };
        let encoded = serde_json::to_string(&req).unwrap();
        let decoded: InitializeRequest = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn session_update_notification_nests_update_under_its_own_key() {
        let notif = SessionUpdateNotification {
            session_id: SessionId::generate(),
            update: SessionUpdate::CurrentModeUpdate {
                current_mode_id: "ask".into(),
            },
        };
        let encoded = serde_json::to_value(&notif).unwrap();
        assert_eq!(encoded["update"]["sessionUpdate"], "current_mode_update");
        assert!(encoded.get("sessionId").is_some());
        let decoded: SessionUpdateNotification = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, notif);
    }

    #[test]
    fn prompt_response_stop_reason_is_snake_case_on_wire() {
        let resp = PromptResponse {
            stop_reason: StopReason::MaxTokens,
        };
        let encoded = serde_json::to_string(&resp).unwrap();
        assert_eq!(encoded, r#"{"stopReason":"max_tokens"}"#);
    }

    #[test]
    fn exit_status_allows_either_code_or_signal() {
        let signalled = ExitStatus {
            exit_code: None,
            signal: Some("SIGKILL".into()),
        };
        let encoded = serde_json::to_string(&signalled).unwrap();
        assert_eq!(encoded, r#"{"signal":"SIGKILL"}"#);
    }
}
