//! Effects, call tokens, and the effect driver.

use crate::{Action, Session};
use dcore::{Generate, GenerateRequest};
use std::fmt::{Display, Formatter};
use ulid::Ulid;

/// A token identifying one outstanding model call.
///
/// Each effect that issues a call carries a fresh token, and the matching
/// completion action must return it. The session holds one slot per action
/// kind (chat send, prompt rewrite); while a slot is occupied the trigger
/// is rejected at the reducer, not just by a disabled control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallToken(Ulid);

impl CallToken {
    /// Mint a fresh token
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for CallToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CallToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The external call a state transition asks the driver to issue.
///
/// The session performs no network I/O itself; the driver executes the
/// effect and feeds the outcome back through [`Action::ChatResolved`]
/// or [`Action::RewriteResolved`](crate::Action).
#[derive(Debug)]
pub enum Effect {
    /// Nothing to do
    None,

    /// Issue a chat generation call
    Generate {
        /// The token to return with the completion
        token: CallToken,
        /// The assembled request
        request: GenerateRequest,
    },

    /// Issue a prompt-rewrite call
    Rewrite {
        /// The token to return with the completion
        token: CallToken,
        /// The assembled request
        request: GenerateRequest,
    },
}

impl Effect {
    /// Whether this effect issues no call
    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }
}

/// Execute one effect against a provider and feed the outcome back.
///
/// [`Effect::None`] never touches the provider, so driving a rejected or
/// aborted transition through a [`NoopModel`](dcore::NoopModel) is a safe
/// way to assert that no call was made.
pub async fn drive<M: Generate>(session: &mut Session, model: &M, effect: Effect) {
    match effect {
        Effect::None => {}
        Effect::Generate { token, request } => {
            let outcome = model.generate(&request).await;
            session.apply(Action::ChatResolved { token, outcome });
        }
        Effect::Rewrite { token, request } => {
            let outcome = model.generate(&request).await;
            session.apply(Action::RewriteResolved { token, outcome });
        }
    }
}
