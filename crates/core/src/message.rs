//! Chat message log entries.

use serde::{Deserialize, Serialize};

/// A message in the conversation log.
///
/// Messages are append-only: once created they are never mutated, and the
/// log is only ever cleared wholesale by an explicit reset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Message {
    /// The role of the message
    pub role: Role,

    /// The content of the message
    pub text: String,
}

impl Message {
    /// Create a new user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a new model message
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// The role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub enum Role {
    /// The operator side of the conversation
    #[serde(rename = "user")]
    #[default]
    User,
    /// The model side of the conversation
    #[serde(rename = "model")]
    Model,
}
