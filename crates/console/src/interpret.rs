//! Response interpretation.

use dcore::{GenerateReply, Message};

/// The single generic message shown for any transport or remote failure.
pub const TRANSPORT_ERROR_TEXT: &str =
    "Sorry, I encountered an error while processing your request. Please check the logs for details.";

/// Turn one call outcome into exactly one model message.
///
/// A function-call reply is a terminal display state: the calls are
/// rendered as a fenced pretty-printed JSON block and never executed.
/// Failures degrade to the generic message; the detail goes to the
/// diagnostic log, and nothing is retried.
pub fn interpret(outcome: anyhow::Result<GenerateReply>) -> Message {
    let reply = match outcome {
        Ok(reply) => reply,
        Err(error) => {
            tracing::error!("model call failed: {error:?}");
            return Message::model(TRANSPORT_ERROR_TEXT);
        }
    };

    if reply.wants_function_call() {
        return match serde_json::to_string_pretty(&reply.function_calls) {
            Ok(calls) => Message::model(format!("Function Call Requested:\n```json\n{calls}\n```")),
            Err(error) => {
                tracing::error!("failed to render function calls: {error}");
                Message::model(TRANSPORT_ERROR_TEXT)
            }
        };
    }

    Message::model(reply.text)
}

#[cfg(test)]
mod tests {
    use super::{TRANSPORT_ERROR_TEXT, interpret};
    use dcore::{FunctionCall, GenerateReply, Role};
    use serde_json::json;

    #[test]
    fn plain_text_passes_through() {
        let message = interpret(Ok(GenerateReply::text("hi")));
        assert_eq!(message.role, Role::Model);
        assert_eq!(message.text, "hi");
    }

    #[test]
    fn function_calls_render_as_json_block() {
        let mut reply = GenerateReply::text("ignored");
        reply.function_calls.push(FunctionCall {
            name: "f".into(),
            args: json!({}),
        });
        let message = interpret(Ok(reply));
        assert!(message.text.starts_with("Function Call Requested:\n```json\n"));
        assert!(message.text.ends_with("\n```"));
        assert!(message.text.contains("\"name\": \"f\""));
    }

    #[test]
    fn failure_degrades_to_generic_message() {
        let message = interpret(Err(anyhow::anyhow!("connection refused")));
        assert_eq!(message.role, Role::Model);
        assert_eq!(message.text, TRANSPORT_ERROR_TEXT);
    }
}
