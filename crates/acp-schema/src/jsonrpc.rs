//! JSON-RPC 2.0 envelope types shared by every ACP message.
//!
//! Request/response correlation, tagged-union dispatch and the reserved
//! error codes all live here; protocol-specific payloads live in
//! [`crate::messages`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// JSON-RPC version constant mandated by the protocol.
pub const JSONRPC_VERSION: &str = "2.0";

/// Zero-sized type that only (de)serializes as the literal `"2.0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let version = String::deserialize(deserializer)?;
        if version == JSONRPC_VERSION {
            Ok(JsonRpcVersion)
        } else {
            Err(serde::de::Error::custom(format!(
                "invalid jsonrpc version: expected '{JSONRPC_VERSION}', got '{version}'"
            )))
        }
    }
}

/// A JSON-RPC request id: either an integer or a string (never both, per spec).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Integer id, used by the connection's outbound allocator.
    Number(i64),
    /// String id, used by peers that mint their own ids.
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// A JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: JsonRpcVersion,
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Build a request, serializing `params` through `serde_json::to_value`.
    pub fn new<P: Serialize>(
        id: RequestId,
        method: impl Into<String>,
        params: P,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            jsonrpc: JsonRpcVersion,
            id,
            method: method.into(),
            params: Some(serde_json::to_value(params)?),
        })
    }

    /// Build a request with no parameters.
    pub fn without_params(id: RequestId, method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id,
            method: method.into(),
            params: None,
        }
    }
}

/// A JSON-RPC notification (no `id`, no reply expected).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: JsonRpcVersion,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    pub fn new<P: Serialize>(
        method: impl Into<String>,
        params: P,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            jsonrpc: JsonRpcVersion,
            method: method.into(),
            params: Some(serde_json::to_value(params)?),
        })
    }

    pub fn without_params(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            method: method.into(),
            params: None,
        }
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The response id: `None` only for a parse-error response (§7, invariant 8).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub Option<RequestId>);

impl ResponseId {
    pub fn from_request(id: RequestId) -> Self {
        Self(Some(id))
    }

    pub fn null() -> Self {
        Self(None)
    }

    pub fn as_request_id(&self) -> Option<&RequestId> {
        self.0.as_ref()
    }
}

/// Mutually-exclusive response payload (`result` xor `error`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcResponsePayload {
    Success { result: Value },
    Error { error: JsonRpcError },
}

/// A JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: JsonRpcVersion,
    pub id: ResponseId,
    #[serde(flatten)]
    pub payload: JsonRpcResponsePayload,
}

impl JsonRpcResponse {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id: ResponseId::from_request(id),
            payload: JsonRpcResponsePayload::Success { result },
        }
    }

    pub fn error(id: RequestId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id: ResponseId::from_request(id),
            payload: JsonRpcResponsePayload::Error { error },
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id: ResponseId::null(),
            payload: JsonRpcResponsePayload::Error {
                error: JsonRpcError::new(error_codes::PARSE_ERROR, message),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.payload, JsonRpcResponsePayload::Success { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            JsonRpcResponsePayload::Success { result } => Some(result),
            JsonRpcResponsePayload::Error { .. } => None,
        }
    }

    pub fn error_payload(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            JsonRpcResponsePayload::Success { .. } => None,
            JsonRpcResponsePayload::Error { error } => Some(error),
        }
    }
}

/// The three message shapes that can appear on the wire, discriminated
/// structurally (presence of `id`/`method`/`result`/`error`) rather than by
/// an explicit tag field, matching the JSON-RPC 2.0 envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Notification(JsonRpcNotification),
}

impl JsonRpcMessage {
    /// Parse a single ndjson line into a message.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Serialize a message to a single line (without the trailing `\n`).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Reserved JSON-RPC and ACP-specific error codes (spec §3, §6).
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub const RESOURCE_NOT_FOUND: i32 = -32001;
    pub const PERMISSION_DENIED: i32 = -32002;
    pub const INVALID_STATE: i32 = -32003;
    pub const CAPABILITY_NOT_SUPPORTED: i32 = -32004;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn version_roundtrips_as_literal_string() {
        let json = serde_json::to_string(&JsonRpcVersion).unwrap();
        assert_eq!(json, "\"2.0\"");
        let parsed: JsonRpcVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, JsonRpcVersion);
    }

    #[test]
    fn version_rejects_other_values() {
        let result: Result<JsonRpcVersion, _> = serde_json::from_str("\"1.0\"");
        assert!(result.is_err());
    }

    #[test]
    fn request_roundtrip_with_params() {
        let req = JsonRpcRequest::new(
            RequestId::Number(1),
            "initialize",
            json!({"protocolVersion": 1}),
        )
        .unwrap();
        let encoded = serde_json::to_string(&req).unwrap();
        assert!(encoded.contains("\"method\":\"initialize\""));
        let decoded: JsonRpcRequest = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, RequestId::Number(1));
        assert_eq!(decoded.method, "initialize");
    }

    #[test]
    fn request_without_params_omits_field() {
        let req = JsonRpcRequest::without_params(RequestId::String("a".into()), "session/cancel");
        let encoded = serde_json::to_string(&req).unwrap();
        assert!(!encoded.contains("params"));
    }

    #[test]
    fn response_success_and_error_are_mutually_exclusive() {
        let ok = JsonRpcResponse::success(RequestId::Number(2), json!({"stopReason":"done"}));
        assert!(ok.is_success());
        assert!(ok.error_payload().is_none());

        let err = JsonRpcResponse::error(
            RequestId::Number(2),
            JsonRpcError::new(error_codes::METHOD_NOT_FOUND, "Method not found: foo/bar"),
        );
        assert!(!err.is_success());
        assert_eq!(err.error_payload().unwrap().code, -32601);
    }

    #[test]
    fn parse_error_response_has_null_id() {
        let resp = JsonRpcResponse::parse_error("bad json");
        assert_eq!(resp.id, ResponseId::null());
        assert_eq!(resp.id.as_request_id(), None);
    }

    #[test]
    fn message_envelope_distinguishes_shapes() {
        let req_line = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#;
        let notif_line = r#"{"jsonrpc":"2.0","method":"session/cancel","params":{"sessionId":"ab"}}"#;
        let resp_line = r#"{"jsonrpc":"2.0","id":1,"result":{}}"#;

        assert!(matches!(
            JsonRpcMessage::parse(req_line).unwrap(),
            JsonRpcMessage::Request(_)
        ));
        assert!(matches!(
            JsonRpcMessage::parse(notif_line).unwrap(),
            JsonRpcMessage::Notification(_)
        ));
        assert!(matches!(
            JsonRpcMessage::parse(resp_line).unwrap(),
            JsonRpcMessage::Response(_)
        ));
    }
}
