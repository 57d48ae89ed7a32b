//! The Generate implementation.

use crate::{Gemini, wire::WireRequest};
use anyhow::Result;
use dcore::{Generate, GenerateReply, GenerateRequest};

impl Generate for Gemini {
    /// Send one generateContent request.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateReply> {
        let body = WireRequest::from(request);
        tracing::debug!("request: {}", serde_json::to_string(&body)?);

        let response = self.client.post(self.url()).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("response ({status}): {text}");

        if !status.is_success() {
            anyhow::bail!("generateContent returned {status}: {text}");
        }

        serde_json::from_str::<crate::WireReply>(&text)?.into_reply()
    }
}
