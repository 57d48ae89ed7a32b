//! Tool definitions and their canonical wire form.
//!
//! Tools are authored in one of two shapes: an opaque raw JSON function
//! declaration ([`RawTool`]), or a structured webhook descriptor
//! ([`WebhookTool`]) with typed parameters. Both normalize into the one
//! canonical [`FunctionDecl`] record before anything downstream sees them,
//! so the two authoring shapes are never special-cased past this module.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use ulid::Ulid;

/// Default schema seeded into a freshly added raw tool, opened for editing.
pub const RAW_TEMPLATE: &str = r#"{
  "name": "new_tool",
  "description": "Describe what this tool does.",
  "parameters": {
    "type": "OBJECT",
    "properties": {
      "input": {
        "type": "STRING",
        "description": "Describe this parameter."
      }
    },
    "required": []
  }
}"#;

/// A user-defined tool, in either authoring shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ToolDef {
    /// An opaque JSON-encoded function declaration
    Raw(RawTool),
    /// A structured webhook descriptor with typed parameters
    Webhook(WebhookTool),
}

/// A tool authored as a raw JSON blob.
///
/// `json_config` is allowed to be invalid JSON while being edited; it is
/// validated at save time and again at send time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawTool {
    /// The id of the tool
    pub id: Ulid,

    /// The display name of the tool
    pub name: String,

    /// The JSON-encoded function declaration
    pub json_config: String,
}

/// A tool authored as a structured webhook descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookTool {
    /// The id of the tool
    pub id: Ulid,

    /// The function name offered to the model
    pub name: String,

    /// The description of the tool
    pub description: String,

    /// The webhook endpoint (never called by this system)
    pub webhook_url: String,

    /// The HTTP method of the webhook
    pub http_method: HttpMethod,

    /// The typed parameters of the tool
    pub parameters: Vec<ToolParameter>,
}

/// A single typed parameter of a webhook tool.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolParameter {
    /// The id of the parameter
    pub id: Ulid,

    /// The parameter name
    pub name: String,

    /// The parameter type
    pub kind: ParamKind,

    /// The description of the parameter
    pub description: String,

    /// Whether the parameter is required
    pub required: bool,
}

/// The wire type of a webhook tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamKind {
    /// A string parameter
    #[default]
    String,
    /// A number parameter
    Number,
    /// A boolean parameter
    Boolean,
}

impl ParamKind {
    /// The uppercase wire name of this type
    pub fn wire_name(&self) -> &'static str {
        match self {
            ParamKind::String => "STRING",
            ParamKind::Number => "NUMBER",
            ParamKind::Boolean => "BOOLEAN",
        }
    }
}

/// The HTTP method of a webhook tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

/// The canonical function-declaration record both tool shapes compile into.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionDecl {
    /// The function name
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub name: CompactString,

    /// The description of the function
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// The JSON-schema-like parameters block
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub parameters: Value,
}

/// Tool normalization errors.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The raw JSON config of a tool failed to parse
    #[error("tool {name:?} has invalid JSON config: {source}")]
    InvalidJson {
        /// The display name of the offending tool
        name: String,
        /// The underlying parse error
        source: serde_json::Error,
    },
}

impl ToolError {
    /// The display name of the tool that failed to normalize
    pub fn tool_name(&self) -> &str {
        match self {
            ToolError::InvalidJson { name, .. } => name,
        }
    }
}

impl ToolDef {
    /// Create a raw tool seeded with the template schema
    pub fn raw_template(name: impl Into<String>) -> Self {
        ToolDef::Raw(RawTool {
            id: Ulid::new(),
            name: name.into(),
            json_config: RAW_TEMPLATE.into(),
        })
    }

    /// The id of the tool
    pub fn id(&self) -> Ulid {
        match self {
            ToolDef::Raw(tool) => tool.id,
            ToolDef::Webhook(tool) => tool.id,
        }
    }

    /// The display name of the tool
    pub fn name(&self) -> &str {
        match self {
            ToolDef::Raw(tool) => &tool.name,
            ToolDef::Webhook(tool) => &tool.name,
        }
    }

    /// Validate the definition as required at save time.
    ///
    /// Raw tools must carry parseable JSON; webhook tools are always
    /// saveable (an empty parameter list is allowed).
    pub fn validate(&self) -> Result<(), ToolError> {
        match self {
            ToolDef::Raw(tool) => {
                serde_json::from_str::<Value>(&tool.json_config).map_err(|source| {
                    ToolError::InvalidJson {
                        name: tool.name.clone(),
                        source,
                    }
                })?;
                Ok(())
            }
            ToolDef::Webhook(_) => Ok(()),
        }
    }

    /// Normalize into the canonical function-declaration record.
    pub fn declaration(&self) -> Result<FunctionDecl, ToolError> {
        match self {
            ToolDef::Raw(tool) => raw_declaration(tool),
            ToolDef::Webhook(tool) => Ok(webhook_declaration(tool)),
        }
    }
}

/// Parse a raw tool's JSON config into a declaration.
fn raw_declaration(tool: &RawTool) -> Result<FunctionDecl, ToolError> {
    serde_json::from_str(&tool.json_config).map_err(|source| ToolError::InvalidJson {
        name: tool.name.clone(),
        source,
    })
}

/// Map a webhook descriptor onto the declaration wire shape.
fn webhook_declaration(tool: &WebhookTool) -> FunctionDecl {
    let mut properties = Map::new();
    for param in &tool.parameters {
        properties.insert(
            param.name.clone(),
            json!({
                "type": param.kind.wire_name(),
                "description": param.description,
            }),
        );
    }
    let required = tool
        .parameters
        .iter()
        .filter(|p| p.required)
        .map(|p| Value::String(p.name.clone()))
        .collect::<Vec<_>>();

    FunctionDecl {
        name: tool.name.as_str().into(),
        description: tool.description.clone(),
        parameters: json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        }),
    }
}
