//! Core types for the promptdeck agent console.
//!
//! This crate provides the shared types used across the console and the
//! model provider: `Message`, `ContextItem`, `ToolDef`, the canonical
//! `FunctionDecl` wire record, the `GenerateRequest`/`GenerateReply` call
//! contract, and the `Generate` provider trait.

pub use context::{ContextBody, ContextItem};
pub use message::{Message, Role};
pub use noop::NoopModel;
pub use provider::Generate;
pub use request::{GenerateRequest, Part};
pub use response::{FunctionCall, GenerateReply};
pub use tool::{
    FunctionDecl, HttpMethod, ParamKind, RawTool, ToolDef, ToolError, ToolParameter, WebhookTool,
};

mod context;
mod message;
mod noop;
mod provider;
mod request;
mod response;
mod tool;
