//! Operator actions that may issue model calls.

use crate::CallToken;
use dcore::GenerateReply;

/// An action fed through [`Session::apply`](crate::Session::apply).
///
/// Local CRUD over contexts and tools happens through plain session
/// methods; actions cover the effectful pipeline where a state transition
/// may hand back an external call to issue.
#[derive(Debug)]
pub enum Action {
    /// Send a chat message
    SendChat {
        /// The user message text
        text: String,
    },

    /// A chat generation call resolved
    ChatResolved {
        /// The token handed out with the effect
        token: CallToken,
        /// The call outcome
        outcome: anyhow::Result<GenerateReply>,
    },

    /// Apply the pending prompt instruction to the system prompt
    ApplyInstruction,

    /// A prompt-rewrite call resolved
    RewriteResolved {
        /// The token handed out with the effect
        token: CallToken,
        /// The call outcome
        outcome: anyhow::Result<GenerateReply>,
    },
}
