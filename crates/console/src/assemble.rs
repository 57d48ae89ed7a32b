//! Request assembly.
//!
//! Pure functions of the session state: they merge system prompt, user
//! message, the active context item and the registry's declarations into
//! one [`GenerateRequest`], and compose the rewrite meta-prompt.

use dcore::{ContextBody, ContextItem, FunctionDecl, GenerateRequest, Part};

/// Header of the context section in the two-section text template.
pub const CONTEXT_SECTION: &str = "[CONTEXT PROVIDED]";

/// Header of the query section in the two-section text template.
pub const QUERY_SECTION: &str = "[USER QUERY]";

/// Assemble one outbound generation request.
///
/// A text context folds into the message through the two-section template;
/// a file context becomes an inline part placed ahead of the raw message
/// text. The two augmentations are mutually exclusive by construction —
/// the match on [`ContextBody`] is exhaustive. `tools` must already be
/// `None` when the registry is empty: absence, not an empty list, tells
/// the model layer that no tools are offered.
pub fn assemble(
    system_prompt: &str,
    message: &str,
    context: Option<&ContextItem>,
    tools: Option<Vec<FunctionDecl>>,
) -> GenerateRequest {
    let contents = match context.map(|item| &item.body) {
        Some(ContextBody::Text { content }) => vec![Part::Text {
            text: format!("{CONTEXT_SECTION}\n{content}\n\n{QUERY_SECTION}\n{message}"),
        }],
        Some(ContextBody::File { mime, data, .. }) => vec![
            Part::Inline {
                mime: mime.clone(),
                data: data.clone(),
            },
            Part::Text {
                text: message.to_owned(),
            },
        ],
        None => vec![Part::Text {
            text: message.to_owned(),
        }],
    };

    GenerateRequest {
        system_instruction: system_prompt.to_owned(),
        contents,
        tools,
    }
}

/// Compose the meta-prompt for the prompt-instruction rewriter.
///
/// The reply is expected to be the full rewritten prompt and nothing
/// else; the caller trims it before replacing the live system prompt.
pub fn rewrite_prompt(current: &str, instruction: &str) -> String {
    format!(
        "You are an AI assistant that expertly rewrites system prompts based on user instructions.\n\
         Given the current system prompt and a modification instruction, rewrite the prompt to incorporate the instruction.\n\
         Only return the full, rewritten prompt text. Do not add any extra commentary, formatting, or markdown.\n\
         \n\
         [CURRENT PROMPT]\n\
         {current}\n\
         \n\
         [INSTRUCTION]\n\
         {instruction}\n\
         \n\
         [REWRITTEN PROMPT]"
    )
}
