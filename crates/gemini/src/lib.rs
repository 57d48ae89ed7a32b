//! Gemini generateContent provider.
//!
//! Talks to the `generativelanguage.googleapis.com` REST API. The API key
//! is read once from the `GEMINI_API_KEY` environment variable at startup;
//! its absence is a warning, not a hard failure — calls made without a key
//! fail at call time instead.

pub use reqwest::{self, Client};
pub use wire::{Candidate, Content, WirePart, WireReply, WireRequest};

mod provider;
mod wire;

/// Environment variable holding the API key.
pub const KEY_ENV: &str = "GEMINI_API_KEY";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini endpoint URLs.
pub mod endpoint {
    /// Base URL of the generateContent API family.
    pub const GENERATE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
}

/// Gemini provider.
#[derive(Clone)]
pub struct Gemini {
    /// The HTTP client.
    pub client: Client,
    /// The API key, empty when unset.
    key: String,
    /// The model identifier.
    model: String,
    /// Base endpoint URL.
    base: String,
}

impl Gemini {
    /// Create a provider targeting the Gemini API.
    pub fn api(client: Client, key: &str, model: &str) -> Self {
        Self::custom(client, key, model, endpoint::GENERATE)
    }

    /// Create a provider targeting a custom Gemini-compatible endpoint.
    pub fn custom(client: Client, key: &str, model: &str, base: &str) -> Self {
        Self {
            client,
            key: key.to_owned(),
            model: model.to_owned(),
            base: base.to_owned(),
        }
    }

    /// The full request URL for this provider's model.
    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base, self.model, self.key
        )
    }
}
