//! The operator session.

use crate::{Action, CallToken, Effect, assemble, interpret, rewrite_prompt};
use dcore::{ContextBody, ContextItem, FunctionDecl, GenerateRequest, Message, ToolDef, ToolError};
use ulid::Ulid;

/// All view state of the console.
///
/// The conversation log is append-only and only ever cleared wholesale;
/// contexts and tools are small owned collections; the two call slots
/// (chat send, prompt rewrite) are independent and may overlap, but each
/// admits at most one outstanding call.
#[derive(Default)]
pub struct Session {
    /// The standing system prompt
    system_prompt: String,
    /// The pending rewrite instruction input
    instruction: String,
    /// The conversation log
    messages: Vec<Message>,
    /// The context candidates
    contexts: Vec<ContextItem>,
    /// The id of the active context, if any
    active_context: Option<Ulid>,
    /// The tool registry, in registration order
    tools: Vec<ToolDef>,
    /// The outstanding chat call, if any
    chat_call: Option<CallToken>,
    /// The outstanding rewrite call, if any
    rewrite_call: Option<CallToken>,
}

impl Session {
    /// Create a session with the given system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            ..Default::default()
        }
    }

    /// The conversation log
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The current system prompt
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Replace the system prompt
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = prompt.into();
    }

    /// The pending rewrite instruction input
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Replace the rewrite instruction input
    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
    }

    /// Whether a chat call is outstanding
    pub fn chat_busy(&self) -> bool {
        self.chat_call.is_some()
    }

    /// Whether a rewrite call is outstanding
    pub fn rewrite_busy(&self) -> bool {
        self.rewrite_call.is_some()
    }

    /// Clear the conversation log, leaving tools and contexts untouched
    pub fn reset_conversation(&mut self) {
        self.messages.clear();
    }

    /// Apply one action, returning the external call to issue next.
    pub fn apply(&mut self, action: Action) -> Effect {
        match action {
            Action::SendChat { text } => self.send_chat(text),
            Action::ChatResolved { token, outcome } => self.chat_resolved(token, outcome),
            Action::ApplyInstruction => self.apply_instruction(),
            Action::RewriteResolved { token, outcome } => self.rewrite_resolved(token, outcome),
        }
    }

    fn send_chat(&mut self, text: String) -> Effect {
        if let Some(token) = self.chat_call {
            tracing::warn!(%token, "chat send rejected, a call is already in flight");
            return Effect::None;
        }

        // Validate the whole registry before any network call is made.
        let declarations = match self.function_declarations() {
            Ok(declarations) => declarations,
            Err(error) => {
                tracing::warn!("send aborted: {error}");
                self.messages.push(Message::user(text));
                self.messages.push(Message::model(format!(
                    "Tool \"{}\" has an invalid JSON configuration. Fix the tool and try again.",
                    error.tool_name()
                )));
                return Effect::None;
            }
        };

        let tools = (!declarations.is_empty()).then_some(declarations);
        let request = assemble(&self.system_prompt, &text, self.active_context(), tools);
        self.messages.push(Message::user(text));

        let token = CallToken::new();
        self.chat_call = Some(token);
        Effect::Generate { token, request }
    }

    fn chat_resolved(
        &mut self,
        token: CallToken,
        outcome: anyhow::Result<dcore::GenerateReply>,
    ) -> Effect {
        if self.chat_call != Some(token) {
            tracing::warn!(%token, "ignoring chat completion with stale token");
            return Effect::None;
        }
        self.chat_call = None;
        self.messages.push(interpret(outcome));
        Effect::None
    }

    fn apply_instruction(&mut self) -> Effect {
        if let Some(token) = self.rewrite_call {
            tracing::warn!(%token, "rewrite rejected, a call is already in flight");
            return Effect::None;
        }
        let instruction = self.instruction.trim();
        if instruction.is_empty() {
            return Effect::None;
        }

        let request =
            GenerateRequest::text("", rewrite_prompt(&self.system_prompt, instruction));
        let token = CallToken::new();
        self.rewrite_call = Some(token);
        Effect::Rewrite { token, request }
    }

    fn rewrite_resolved(
        &mut self,
        token: CallToken,
        outcome: anyhow::Result<dcore::GenerateReply>,
    ) -> Effect {
        if self.rewrite_call != Some(token) {
            tracing::warn!(%token, "ignoring rewrite completion with stale token");
            return Effect::None;
        }
        self.rewrite_call = None;

        match outcome {
            Ok(reply) => {
                self.system_prompt = reply.text.trim().to_owned();
                self.instruction.clear();
            }
            // Prompt and instruction input stay untouched on failure.
            Err(error) => tracing::error!("prompt rewrite failed: {error:?}"),
        }
        Effect::None
    }

    // --- context selector ---

    /// The context candidates
    pub fn contexts(&self) -> &[ContextItem] {
        &self.contexts
    }

    /// The active context item, if any
    pub fn active_context(&self) -> Option<&ContextItem> {
        let id = self.active_context?;
        self.contexts.iter().find(|item| item.id == id)
    }

    /// The id of the active context, if any
    pub fn active_context_id(&self) -> Option<Ulid> {
        self.active_context
    }

    /// Create and activate a new text context item
    pub fn add_text_context(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Ulid {
        let item = ContextItem::text(name, content);
        let id = item.id;
        self.contexts.push(item);
        self.active_context = Some(id);
        id
    }

    /// Create and activate a new file context item.
    ///
    /// The file has already been read and base64-encoded by the caller.
    pub fn add_file_context(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<compact_str::CompactString>,
        size: u64,
        data: impl Into<String>,
    ) -> Ulid {
        let item = ContextItem::file(name, file_name, mime, size, data);
        let id = item.id;
        self.contexts.push(item);
        self.active_context = Some(id);
        id
    }

    /// Select the active context item.
    ///
    /// Selecting a new item deselects the previous one; an id that does
    /// not resolve to an existing item is ignored so the active reference
    /// always stays valid.
    pub fn set_active_context(&mut self, id: Option<Ulid>) {
        match id {
            None => self.active_context = None,
            Some(id) if self.contexts.iter().any(|item| item.id == id) => {
                self.active_context = Some(id);
            }
            Some(id) => tracing::warn!(%id, "ignoring activation of unknown context"),
        }
    }

    /// Replace name and/or content of an existing item; no-op on unknown id.
    ///
    /// Content replacement applies to text items only: a file payload is
    /// bound to its mime type and size, so file items can only be renamed.
    pub fn update_context(&mut self, id: Ulid, name: Option<&str>, content: Option<&str>) {
        let Some(item) = self.contexts.iter_mut().find(|item| item.id == id) else {
            return;
        };
        if let Some(name) = name {
            item.name = name.to_owned();
        }
        if let Some(content) = content
            && let ContextBody::Text { content: text } = &mut item.body
        {
            *text = content.to_owned();
        }
    }

    /// Delete a context item, clearing the active reference if it pointed there
    pub fn remove_context(&mut self, id: Ulid) {
        self.contexts.retain(|item| item.id != id);
        if self.active_context == Some(id) {
            self.active_context = None;
        }
    }

    // --- tool registry ---

    /// The tool registry, in registration order
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Create a tool seeded with the raw template schema
    pub fn add_tool(&mut self) -> Ulid {
        let tool = ToolDef::raw_template("new_tool");
        let id = tool.id();
        self.tools.push(tool);
        id
    }

    /// Validate and upsert a tool by id
    pub fn save_tool(&mut self, tool: ToolDef) -> Result<(), ToolError> {
        tool.validate()?;
        match self.tools.iter_mut().find(|t| t.id() == tool.id()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
        Ok(())
    }

    /// Overwrite a raw tool's JSON config without validating it.
    ///
    /// This is the live-editing path: a config may be invalid while it is
    /// being edited, and is only required to parse at send time. Unknown
    /// ids and webhook tools are left untouched.
    pub fn edit_tool_config(&mut self, id: Ulid, json_config: impl Into<String>) {
        if let Some(ToolDef::Raw(tool)) = self.tools.iter_mut().find(|t| t.id() == id) {
            tool.json_config = json_config.into();
        }
    }

    /// Delete a tool by id
    pub fn remove_tool(&mut self, id: Ulid) {
        self.tools.retain(|tool| tool.id() != id);
    }

    /// Normalize the whole registry, in registration order.
    ///
    /// Fails on the first tool whose raw JSON does not parse; the caller
    /// aborts the send in that case.
    pub fn function_declarations(&self) -> Result<Vec<FunctionDecl>, ToolError> {
        self.tools.iter().map(ToolDef::declaration).collect()
    }
}
