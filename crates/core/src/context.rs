//! Context items attached to outbound requests.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A single piece of auxiliary material that may augment one request.
///
/// At most one item is active at a time; the selection is tracked by id
/// in the session, not here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContextItem {
    /// The id of the item
    pub id: Ulid,

    /// The display name of the item
    pub name: String,

    /// The payload
    pub body: ContextBody,
}

/// The payload of a context item.
///
/// Text and file payloads are disjoint: the request builder matches on
/// this exhaustively, so a file item can never leak through the text
/// template path or vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContextBody {
    /// Raw pasted text
    Text {
        /// The text content
        content: String,
    },
    /// An uploaded file, read fully into memory and base64-encoded
    /// before it reaches this type
    File {
        /// The original file name
        file_name: String,
        /// The mime type of the file
        mime: CompactString,
        /// The size of the decoded file in bytes
        size: u64,
        /// The base64-encoded file content
        data: String,
    },
}

impl ContextItem {
    /// Create a new text context item
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            body: ContextBody::Text {
                content: content.into(),
            },
        }
    }

    /// Create a new file context item from an already-encoded payload
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<CompactString>,
        size: u64,
        data: impl Into<String>,
    ) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            body: ContextBody::File {
                file_name: file_name.into(),
                mime: mime.into(),
                size,
                data: data.into(),
            },
        }
    }

    /// Whether this item carries a file payload
    pub fn is_file(&self) -> bool {
        matches!(self.body, ContextBody::File { .. })
    }
}
