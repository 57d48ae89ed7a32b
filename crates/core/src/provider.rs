//! Provider abstraction for the generation backend.

use crate::{GenerateRequest, GenerateReply};
use anyhow::Result;

/// A trait for generation providers.
///
/// Providers perform exactly one one-shot call per invocation; there is no
/// streaming and no tool-execution loop. The console never calls a tool —
/// a function-call reply is a terminal display state for that turn.
pub trait Generate: Clone {
    /// Send one generation request to the model
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<GenerateReply>> + Send;
}
