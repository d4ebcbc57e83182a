//! Session Update: the tagged-union payload of a `session/update` notification.
//!
//! The discriminator field has drifted across protocol revisions
//! (`sessionUpdate`, `kind`, `type`). Decoding accepts any of the three;
//! encoding always emits the canonical `sessionUpdate` spelling (spec §4.2,
//! §9).

use crate::content::ContentBlock;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One tool-call entry in a [`SessionUpdate::Plan`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanEntry {
    pub content: String,
    pub priority: PlanEntryPriority,
    pub status: PlanEntryStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanEntryPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanEntryStatus {
    Pending,
    InProgress,
    Completed,
}

/// A slash-command the agent currently accepts, surfaced to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailableCommand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A tool call's lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Fields shared by `tool_call` and `tool_call_update`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallUpdate {
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolCallStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<ContentBlock>>,
    #[serde(rename = "rawInput", skip_serializing_if = "Option::is_none")]
    pub raw_input: Option<Value>,
}

/// A complete, still-mutable Session Update value.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    UserMessageChunk { content: ContentBlock },
    AgentMessageChunk { content: ContentBlock },
    AgentThoughtChunk { content: ContentBlock },
    ToolCall(ToolCallUpdate),
    ToolCallUpdate(ToolCallUpdate),
    Plan { entries: Vec<PlanEntry> },
    AvailableCommandsUpdate { available_commands: Vec<AvailableCommand> },
    CurrentModeUpdate { current_mode_id: String },
}

impl SessionUpdate {
    fn discriminator(&self) -> &'static str {
        match self {
            Self::UserMessageChunk { .. } => "user_message_chunk",
            Self::AgentMessageChunk { .. } => "agent_message_chunk",
            Self::AgentThoughtChunk { .. } => "agent_thought_chunk",
            Self::ToolCall(_) => "tool_call",
            Self::ToolCallUpdate(_) => "tool_call_update",
            Self::Plan { .. } => "plan",
            Self::AvailableCommandsUpdate { .. } => "available_commands_update",
            Self::CurrentModeUpdate { .. } => "current_mode_update",
        }
    }
}

impl Serialize for SessionUpdate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut value = match self {
            Self::UserMessageChunk { content } | Self::AgentMessageChunk { content } | Self::AgentThoughtChunk { content } => {
                serde_json::json!({ "content": content })
            }
            Self::ToolCall(update) | Self::ToolCallUpdate(update) => {
                serde_json::to_value(update).map_err(serde::ser::Error::custom)?
            }
            Self::Plan { entries } => serde_json::json!({ "entries": entries }),
            Self::AvailableCommandsUpdate { available_commands } => {
                serde_json::json!({ "availableCommands": available_commands })
            }
            Self::CurrentModeUpdate { current_mode_id } => {
                serde_json::json!({ "currentModeId": current_mode_id })
            }
        };
        value["sessionUpdate"] = Value::String(self.discriminator().to_string());
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SessionUpdate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = Value::deserialize(deserializer)?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| DeError::custom("session update must be a JSON object"))?;

        let discriminator = ["sessionUpdate", "kind", "type"]
            .iter()
            .find_map(|key| object.remove(*key))
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| {
                DeError::custom("session update is missing a sessionUpdate/kind/type discriminator")
            })?;

        match discriminator.as_str() {
            "user_message_chunk" => Ok(Self::UserMessageChunk {
                content: field(object, "content").map_err(DeError::custom)?,
            }),
            "agent_message_chunk" => Ok(Self::AgentMessageChunk {
                content: field(object, "content").map_err(DeError::custom)?,
            }),
            "agent_thought_chunk" => Ok(Self::AgentThoughtChunk {
                content: field(object, "content").map_err(DeError::custom)?,
            }),
            "tool_call" => Ok(Self::ToolCall(
                serde_json::from_value(Value::Object(object.clone())).map_err(DeError::custom)?,
            )),
            "tool_call_update" => Ok(Self::ToolCallUpdate(
                serde_json::from_value(Value::Object(object.clone())).map_err(DeError::custom)?,
            )),
            "plan" => Ok(Self::Plan {
                entries: field(object, "entries").map_err(DeError::custom)?,
            }),
            "available_commands_update" => Ok(Self::AvailableCommandsUpdate {
                available_commands: field(object, "availableCommands").map_err(DeError::custom)?,
            }),
            "current_mode_update" => Ok(Self::CurrentModeUpdate {
                current_mode_id: field(object, "currentModeId").map_err(DeError::custom)?,
            }),
            other => Err(DeError::custom(format!(
                "unknown session update discriminator: {other}"
            ))),
        }
    }
}

fn field<T: for<'de> Deserialize<'de>>(
    object: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<T, serde_json::Error> {
    let value = object
        .get(key)
        .cloned()
        .ok_or_else(|| serde::de::Error::custom(format!("missing required field `{key}`")))?;
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextContent;
    use pretty_assertions::assert_eq;

    fn sample_chunk() -> SessionUpdate {
        SessionUpdate::AgentMessageChunk {
            content: ContentBlock::Text(TextContent {
                text: "hello".into(),
                meta: None,
            }),
        }
    }

    #[test]
    fn encodes_canonical_discriminator() {
        let encoded = serde_json::to_value(sample_chunk()).unwrap();
        assert_eq!(encoded["sessionUpdate"], "agent_message_chunk");
    }

    #[test]
    fn decodes_session_update_spelling() {
        let line = r#"{"sessionUpdate":"agent_message_chunk","content":{"type":"text","text":"hello"}}"#;
        let decoded: SessionUpdate = serde_json::from_str(line).unwrap();
        assert_eq!(decoded, sample_chunk());
    }

    #[test]
    fn decodes_kind_spelling() {
        let line = r#"{"kind":"agent_message_chunk","content":{"type":"text","text":"hello"}}"#;
        let decoded: SessionUpdate = serde_json::from_str(line).unwrap();
        assert_eq!(decoded, sample_chunk());
    }

    #[test]
    fn decodes_type_spelling() {
        let line = r#"{"type":"agent_message_chunk","content":{"type":"text","text":"hello"}}"#;
        let decoded: SessionUpdate = serde_json::from_str(line).unwrap();
        assert_eq!(decoded, sample_chunk());
    }

    #[test]
    fn unknown_discriminator_is_a_hard_error() {
        let line = r#"{"sessionUpdate":"mystery_chunk"}"#;
        assert!(serde_json::from_str::<SessionUpdate>(line).is_err());
    }

    #[test]
    fn plan_roundtrips() {
        let update = SessionUpdate::Plan {
            entries: vec![PlanEntry {
                content: "write tests".into(),
                priority: PlanEntryPriority::High,
                status: PlanEntryStatus::InProgress,
            }],
        };
        let encoded = serde_json::to_string(&update).unwrap();
        let decoded: SessionUpdate = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, update);
    }

    #[test]
    fn tool_call_update_roundtrips() {
        let update = SessionUpdate::ToolCallUpdate(ToolCallUpdate {
            tool_call_id: "tc-1".into(),
            title: Some("Read file".into()),
            status: Some(ToolCallStatus::Completed),
            content: None,
            raw_input: None,
        });
        let encoded = serde_json::to_string(&update).unwrap();
        assert!(encoded.contains("\"toolCallId\":\"tc-1\""));
        let decoded: SessionUpdate = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, update);
    }
}
