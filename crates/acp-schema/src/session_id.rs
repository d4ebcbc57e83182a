//! Session identifiers: 128 bits of entropy, rendered as lowercase hex.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated session id.
///
/// The agent role mints these (`acp-core`'s session multiplexer); the
/// client role only ever adopts ids the agent issued. Construction from a
/// wire string is fallible so a malformed `sessionId` is rejected at the
/// schema boundary rather than threaded through routing as an opaque
/// string (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

/// Error returned when a wire string is not a well-formed session id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid session id: {0:?}")]
pub struct InvalidSessionId(String);

impl SessionId {
    /// Wrap a 32-character lowercase-hex string, validating its shape.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidSessionId> {
        let raw = raw.into();
        let is_valid = raw.len() == 32 && raw.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase());
        if is_valid {
            Ok(Self(raw))
        } else {
            Err(InvalidSessionId(raw))
        }
    }

    /// Generate a fresh id from 128 bits of randomness (agent role only).
    pub fn generate() -> Self {
        let bytes: [u8; 16] = rand::random();
        let hex = bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generated_ids_are_32_lowercase_hex_chars() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_uppercase_hex() {
        assert!(SessionId::parse("A".repeat(32)).is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(SessionId::parse("abc").is_err());
    }

    #[test]
    fn wire_roundtrip() {
        let id = SessionId::generate();
        let encoded = serde_json::to_string(&id).unwrap();
        let decoded: SessionId = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, id);
    }
}
