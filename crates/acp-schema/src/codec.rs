//! Line codec: the boundary between ndjson bytes and [`JsonRpcMessage`]
//! values, adapted from `turbomcp-protocol`'s `ProtocolCodec`/`StreamingEncoder`
//! split (encode and decode are separate, stateless operations; framing
//! itself is `acp-transport`'s job).

use crate::jsonrpc::JsonRpcMessage;
use thiserror::Error;

/// Errors raised while decoding or encoding a single ndjson line.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("line is not valid JSON-RPC: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("line contains an embedded newline, which would corrupt ndjson framing")]
    EmbeddedNewline,
}

/// Decode one ndjson line (without its trailing `\n`) into a message.
///
/// Decode failures are per-line and recoverable: the caller logs and drops
/// the line rather than tearing down the connection (spec §4.1, edge case
/// "malformed line").
pub fn decode_line(line: &str) -> Result<JsonRpcMessage, CodecError> {
    JsonRpcMessage::parse(line).map_err(CodecError::from)
}

/// Encode a message into a single ndjson line, without the trailing `\n`.
///
/// Returns [`CodecError::EmbeddedNewline`] rather than silently splitting
/// the line if the serialized payload somehow contains one (it shouldn't;
/// `serde_json` escapes string content), since writing it as-is would
/// desynchronize the reader's line framing.
pub fn encode_line(message: &JsonRpcMessage) -> Result<String, CodecError> {
    let line = message.to_line()?;
    if line.contains('\n') {
        return Err(CodecError::EmbeddedNewline);
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonrpc::{JsonRpcRequest, RequestId};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn malformed_line_is_recoverable_error_not_panic() {
        let result = decode_line("{not json");
        assert!(matches!(result, Err(CodecError::Malformed(_))));
    }

    #[test]
    fn encode_then_decode_preserves_method_and_id() {
        let req = JsonRpcRequest::new(RequestId::Number(7), "session/prompt", serde_json::json!({}))
            .unwrap();
        let message = JsonRpcMessage::Request(req);
        let line = encode_line(&message).unwrap();
        assert!(!line.contains('\n'));
        let decoded = decode_line(&line).unwrap();
        match decoded {
            JsonRpcMessage::Request(r) => {
                assert_eq!(r.id, RequestId::Number(7));
                assert_eq!(r.method, "session/prompt");
            }
            other => panic!("expected a request, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn arbitrary_method_names_roundtrip(method in "[a-z/]{1,40}", id in 0i64..1_000_000) {
            let req = JsonRpcRequest::without_params(RequestId::Number(id), method.clone());
            let line = encode_line(&JsonRpcMessage::Request(req)).unwrap();
            let decoded = decode_line(&line).unwrap();
            match decoded {
                JsonRpcMessage::Request(r) => {
                    prop_assert_eq!(r.method, method);
                    prop_assert_eq!(r.id, RequestId::Number(id));
                }
                other => prop_assert!(false, "expected request, got {:?}", other),
            }
        }
    }
}
