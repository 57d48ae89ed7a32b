//! Wire types for the generateContent API.
//!
//! The request body mirrors the REST shape: camelCase fields, an ordered
//! `parts` sequence per content, `systemInstruction` apart from the turns,
//! and tools wrapped as a single `functionDeclarations` group. `tools` is
//! omitted entirely when no tools are offered — an empty list and absence
//! are not the same thing to the API.

use dcore::{FunctionCall, FunctionDecl, GenerateReply, GenerateRequest, Part};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The request body for generateContent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRequest {
    /// The conversation contents.
    pub contents: Vec<Content>,

    /// The system instruction, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// The tool groups offered to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolGroup>>,
}

/// One content entry: a role plus ordered parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The role of the content ("user" or "model").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,

    /// The ordered parts.
    pub parts: Vec<WirePart>,
}

/// One part of a content entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WirePart {
    /// Inline binary data.
    InlineData {
        /// The payload.
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// A function call (response side only).
    FunctionCall {
        /// The requested call.
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    /// Plain text.
    Text {
        /// The text payload.
        text: String,
    },
}

/// An inline binary payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// The mime type of the payload.
    pub mime_type: String,

    /// The base64-encoded payload.
    pub data: String,
}

/// A group of function declarations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolGroup {
    /// The declarations in registry order.
    pub function_declarations: Vec<FunctionDecl>,
}

impl From<&GenerateRequest> for WireRequest {
    fn from(request: &GenerateRequest) -> Self {
        let parts = request
            .contents
            .iter()
            .map(|part| match part {
                Part::Text { text } => WirePart::Text { text: text.clone() },
                Part::Inline { mime, data } => WirePart::InlineData {
                    inline_data: InlineData {
                        mime_type: mime.to_string(),
                        data: data.clone(),
                    },
                },
            })
            .collect();

        Self {
            contents: vec![Content {
                role: "user".into(),
                parts,
            }],
            system_instruction: if request.system_instruction.is_empty() {
                None
            } else {
                Some(Content {
                    role: String::new(),
                    parts: vec![WirePart::Text {
                        text: request.system_instruction.clone(),
                    }],
                })
            },
            tools: request.tools.as_ref().map(|decls| {
                vec![ToolGroup {
                    function_declarations: decls.clone(),
                }]
            }),
        }
    }
}

/// The response body of generateContent.
#[derive(Debug, Clone, Deserialize)]
pub struct WireReply {
    /// The reply candidates.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// An API-level error, if the call failed.
    #[serde(default)]
    pub error: Option<WireError>,
}

/// One reply candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// The candidate content.
    pub content: Content,
}

/// An API-level error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WireError {
    /// The error message.
    pub message: String,
}

impl WireReply {
    /// Flatten the first candidate into the narrow reply contract.
    ///
    /// Text parts concatenate in order; function-call parts collect in
    /// order. An API-level error becomes an `Err` so the caller's single
    /// degrade path handles it like any transport failure.
    pub fn into_reply(self) -> anyhow::Result<GenerateReply> {
        if let Some(error) = self.error {
            anyhow::bail!("generateContent error: {}", error.message);
        }

        let mut text = String::new();
        let mut function_calls = SmallVec::new();
        for candidate in self.candidates.into_iter().take(1) {
            for part in candidate.content.parts {
                match part {
                    WirePart::Text { text: t } => text.push_str(&t),
                    WirePart::FunctionCall { function_call } => function_calls.push(function_call),
                    WirePart::InlineData { .. } => {}
                }
            }
        }

        Ok(GenerateReply {
            text,
            function_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{WireReply, WireRequest};
    use dcore::{FunctionDecl, GenerateRequest, Part};
    use serde_json::json;

    #[test]
    fn text_request_serializes_to_camel_case() {
        let request = GenerateRequest::text("be brief", "hello");
        let wire = WireRequest::from(&request);
        let value = serde_json::to_value(&wire).expect("serialize");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            "be brief"
        );
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn inline_part_precedes_text_part() {
        let request = GenerateRequest {
            system_instruction: String::new(),
            contents: vec![
                Part::Inline {
                    mime: "image/png".into(),
                    data: "aGVsbG8=".into(),
                },
                Part::Text {
                    text: "what is this?".into(),
                },
            ],
            tools: None,
        };
        let value = serde_json::to_value(WireRequest::from(&request)).expect("serialize");
        let parts = value["contents"][0]["parts"].as_array().expect("parts");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert_eq!(parts[1]["text"], "what is this?");
    }

    #[test]
    fn tools_wrap_as_one_declaration_group() {
        let decl = FunctionDecl {
            name: "get_weather".into(),
            description: "forecast".into(),
            parameters: json!({"type": "OBJECT", "properties": {}}),
        };
        let request = GenerateRequest::text("", "q").with_tools(vec![decl]);
        let value = serde_json::to_value(WireRequest::from(&request)).expect("serialize");
        let groups = value["tools"].as_array().expect("tools");
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0]["functionDeclarations"][0]["name"],
            "get_weather"
        );
    }

    #[test]
    fn reply_concatenates_text_parts() {
        let reply: WireReply = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"text": "hel"}, {"text": "lo"}
            ]}}]
        }))
        .expect("deserialize");
        let reply = reply.into_reply().expect("reply");
        assert_eq!(reply.text, "hello");
        assert!(!reply.wants_function_call());
    }

    #[test]
    fn reply_collects_function_calls() {
        let reply: WireReply = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"functionCall": {"name": "f", "args": {"x": 1}}}
            ]}}]
        }))
        .expect("deserialize");
        let reply = reply.into_reply().expect("reply");
        assert!(reply.wants_function_call());
        assert_eq!(reply.function_calls[0].name, "f");
        assert_eq!(reply.function_calls[0].args["x"], 1);
    }

    #[test]
    fn api_error_becomes_err() {
        let reply: WireReply = serde_json::from_value(json!({
            "error": {"message": "API key not valid"}
        }))
        .expect("deserialize");
        let err = reply.into_reply().expect_err("must fail");
        assert!(err.to_string().contains("API key not valid"));
    }
}
