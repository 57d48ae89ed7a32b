//! No-op generation provider for testing.
//!
//! Implements [`Generate`] but panics on `generate`. Intended for unit
//! tests that exercise session state and request assembly without making
//! real model calls.

use crate::{Generate, GenerateReply, GenerateRequest};
use anyhow::Result;

/// A no-op provider that panics on any actual model call.
///
/// # Panics
///
/// `generate` panics if called. Only use this provider in tests that
/// never reach the network boundary.
#[derive(Clone, Copy)]
pub struct NoopModel;

impl Generate for NoopModel {
    async fn generate(&self, _request: &GenerateRequest) -> Result<GenerateReply> {
        panic!("NoopModel::generate called — not intended for real model calls");
    }
}
