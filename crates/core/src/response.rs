//! The generation reply.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

/// The outcome of one generation call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct GenerateReply {
    /// The concatenated text of the reply
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Function calls requested by the model, in reply order
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub function_calls: SmallVec<[FunctionCall; 4]>,
}

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionCall {
    /// The name of the function to call
    pub name: CompactString,

    /// The arguments of the call
    #[serde(default)]
    pub args: Value,
}

impl GenerateReply {
    /// Create a text-only reply
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            function_calls: SmallVec::new(),
        }
    }

    /// Whether the model requested one or more function calls
    pub fn wants_function_call(&self) -> bool {
        !self.function_calls.is_empty()
    }
}
