//! Session state machine and request assembly.
//!
//! The console owns all view state: the conversation log, the editable
//! system prompt, the context collection with its at-most-one active item,
//! and the tool registry. Operator intents that need a model call go
//! through [`Session::apply`], which performs a pure state transition and
//! returns an [`Effect`] describing the external call (if any) to issue
//! next. Call completions re-enter as actions carrying the [`CallToken`]
//! that was handed out, so a stale completion can never corrupt state.

pub use action::Action;
pub use assemble::{CONTEXT_SECTION, QUERY_SECTION, assemble, rewrite_prompt};
pub use effect::{CallToken, Effect, drive};
pub use interpret::{TRANSPORT_ERROR_TEXT, interpret};
pub use session::Session;

mod action;
mod assemble;
mod effect;
mod interpret;
mod session;
