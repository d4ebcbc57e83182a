//! Capability negotiation payloads exchanged during `initialize` (spec §5).

use serde::{Deserialize, Serialize};

/// Capabilities the client advertises to the agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsCapabilities>,
    #[serde(default)]
    pub terminal: bool,
}

/// Filesystem operations the client is willing to perform on the agent's
/// behalf (spec §6.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FsCapabilities {
    #[serde(rename = "readTextFile", default)]
    pub read_text_file: bool,
    #[serde(rename = "writeTextFile", default)]
    pub write_text_file: bool,
}

/// Capabilities the agent advertises back to the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentCapabilities {
    #[serde(rename = "loadSession", default)]
    pub load_session: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp: Option<McpCapabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptCapabilities>,
}

/// Which MCP server transports the agent can connect to on a session's
/// behalf.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct McpCapabilities {
    #[serde(default)]
    pub http: bool,
    #[serde(default)]
    pub sse: bool,
}

/// Which prompt content block kinds the agent accepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PromptCapabilities {
    #[serde(default)]
    pub image: bool,
    #[serde(default)]
    pub audio: bool,
    #[serde(rename = "embeddedContext", default)]
    pub embedded_context: bool,
}

/// Per-session capability subset the agent may report alongside a
/// `session/new` response (spec §6.2), distinct from the connection-wide
/// [`AgentCapabilities`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp: Option<McpCapabilities>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn client_capabilities_default_omits_fs() {
        let caps = ClientCapabilities::default();
        let encoded = serde_json::to_string(&caps).unwrap();
        assert_eq!(encoded, r#"{"terminal":false}"#);
    }

    #[test]
    fn fs_capabilities_roundtrip() {
        let caps = ClientCapabilities {
            fs: Some(FsCapabilities {
                read_text_file: true,
                write_text_file: false,
            }),
            terminal: true,
        };
        let encoded = serde_json::to_string(&caps).unwrap();
        let decoded: ClientCapabilities = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, caps);
        assert!(encoded.contains("\"readTextFile\":true"));
    }

    #[test]
    fn agent_capabilities_missing_fields_default_false() {
        let decoded: AgentCapabilities = serde_json::from_str("{}").unwrap();
        assert_eq!(decoded, AgentCapabilities::default());
    }
}
