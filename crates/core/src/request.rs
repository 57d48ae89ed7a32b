//! The outbound generation request.

use crate::FunctionDecl;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A one-shot generation request.
///
/// This is the narrow contract handed to a [`Generate`](crate::Generate)
/// provider: system instruction apart from the turns, an ordered sequence
/// of content parts, and an optional tool set. `tools: None` and
/// `tools: Some(vec![])` are distinct on purpose — absence is the signal
/// that no tools are offered at all.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerateRequest {
    /// The standing system instruction, never folded into the parts
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_instruction: String,

    /// The ordered content parts of the user turn
    pub contents: Vec<Part>,

    /// The tools offered to the model, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<FunctionDecl>>,
}

/// One part of a request's content sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Part {
    /// A plain text part
    Text {
        /// The text payload
        text: String,
    },
    /// An inline binary part
    Inline {
        /// The mime type of the payload
        mime: CompactString,
        /// The base64-encoded payload
        data: String,
    },
}

impl GenerateRequest {
    /// Create a text-only request with no tools
    pub fn text(system_instruction: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            contents: vec![Part::Text { text: text.into() }],
            tools: None,
        }
    }

    /// Set the tools for this request
    pub fn with_tools(mut self, tools: Vec<FunctionDecl>) -> Self {
        self.tools = Some(tools);
        self
    }
}
