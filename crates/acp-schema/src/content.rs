//! Content Block: the tagged-union payload carried in prompts and responses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single content block, discriminated on the wire by `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text(TextContent),
    #[serde(rename = "image")]
    Image(ImageContent),
    #[serde(rename = "audio")]
    Audio(AudioContent),
    #[serde(rename = "resource_link")]
    ResourceLink(ResourceLink),
    #[serde(rename = "resource")]
    Resource(EmbeddedResource),
}

/// Plain text content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextContent {
    pub text: String,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

/// Base64-encoded image content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageContent {
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

/// Base64-encoded audio content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioContent {
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

/// A reference to an external resource, without embedding its content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceLink {
    pub uri: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

/// A resource embedded inline (text or base64 binary).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedResource {
    pub resource: EmbeddedResourceContents,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

/// The inline payload of an [`EmbeddedResource`], tagged by which of
/// `text`/`blob` is present rather than by an explicit discriminator field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EmbeddedResourceContents {
    Text {
        uri: String,
        text: String,
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
    Blob {
        uri: String,
        blob: String,
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_block_decodes_and_tags_on_encode() {
        let block = ContentBlock::Text(TextContent {
            text: "hi".into(),
            meta: None,
        });
        let encoded = serde_json::to_string(&block).unwrap();
        assert_eq!(encoded, r#"{"type":"text","text":"hi"}"#);
        let decoded: ContentBlock = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn image_block_requires_mime_type() {
        let line = r#"{"type":"image","data":"Zm9v"}"#;
        let result: Result<ContentBlock, _> = serde_json::from_str(line);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_discriminator_is_a_descriptive_error() {
        let line = r#"{"type":"video","data":"x"}"#;
        let err = serde_json::from_str::<ContentBlock>(line).unwrap_err();
        assert!(err.to_string().contains("video") || err.to_string().contains("unknown variant"));
    }

    #[test]
    fn unknown_extra_fields_are_tolerated() {
        let line = r#"{"type":"text","text":"hi","extra":"ignored"}"#;
        let decoded: ContentBlock = serde_json::from_str(line).unwrap();
        assert_eq!(
            decoded,
            ContentBlock::Text(TextContent {
                text: "hi".into(),
                meta: None
            })
        );
    }
}
