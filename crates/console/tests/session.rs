//! Session state machine tests.

use console::{Action, CONTEXT_SECTION, CallToken, Effect, QUERY_SECTION, Session, drive};
use dcore::{ContextBody, FunctionCall, GenerateReply, NoopModel, Part, RawTool, Role, ToolDef};
use serde_json::json;
use ulid::Ulid;

fn raw_tool(name: &str, json_config: &str) -> ToolDef {
    ToolDef::Raw(RawTool {
        id: Ulid::new(),
        name: name.into(),
        json_config: json_config.into(),
    })
}

fn valid_config(name: &str) -> String {
    format!(r#"{{"name":"{name}","description":"d","parameters":{{"type":"OBJECT","properties":{{}}}}}}"#)
}

#[test]
fn active_reference_stays_valid_across_add_and_remove() {
    let mut session = Session::default();
    let a = session.add_text_context("a", "1");
    let b = session.add_text_context("b", "2");
    assert_eq!(session.active_context_id(), Some(b));

    session.remove_context(b);
    assert_eq!(session.active_context_id(), None);

    session.set_active_context(Some(a));
    session.remove_context(a);
    assert_eq!(session.active_context_id(), None);
    assert!(session.contexts().is_empty());
}

#[test]
fn activating_b_deselects_a() {
    let mut session = Session::default();
    let a = session.add_text_context("a", "1");
    let b = session.add_text_context("b", "2");

    session.set_active_context(Some(a));
    assert_eq!(session.active_context_id(), Some(a));
    session.set_active_context(Some(b));
    assert_eq!(session.active_context_id(), Some(b));
}

#[test]
fn unknown_activation_is_ignored() {
    let mut session = Session::default();
    let a = session.add_text_context("a", "1");
    session.set_active_context(Some(Ulid::new()));
    assert_eq!(session.active_context_id(), Some(a));
}

#[test]
fn update_context_is_silent_on_unknown_id() {
    let mut session = Session::default();
    let a = session.add_text_context("a", "1");
    session.update_context(Ulid::new(), Some("renamed"), None);
    assert_eq!(session.contexts()[0].name, "a");

    session.update_context(a, Some("renamed"), Some("2"));
    assert_eq!(session.contexts()[0].name, "renamed");
}

#[test]
fn file_context_content_is_not_editable() {
    let mut session = Session::default();
    let id = session.add_file_context("diagram", "a.png", "image/png", 4, "YWJjZA==");

    session.update_context(id, Some("renamed"), Some("Zm9v"));
    let item = &session.contexts()[0];
    assert_eq!(item.name, "renamed");
    // the payload and its size/mime stay consistent
    let ContextBody::File { mime, size, data, .. } = &item.body else {
        panic!("expected file body");
    };
    assert_eq!(mime, "image/png");
    assert_eq!(*size, 4);
    assert_eq!(data, "YWJjZA==");
}

#[test]
fn declarations_preserve_registration_order() {
    let mut session = Session::default();
    session.save_tool(raw_tool("first", &valid_config("first"))).unwrap();
    session.save_tool(raw_tool("second", &valid_config("second"))).unwrap();
    session.save_tool(raw_tool("third", &valid_config("third"))).unwrap();

    let declarations = session.function_declarations().expect("declarations");
    assert_eq!(declarations.len(), session.tools().len());
    let names = declarations.iter().map(|d| d.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["first", "second", "third"]);
}

#[test]
fn save_rejects_invalid_raw_json() {
    let mut session = Session::default();
    let err = session
        .save_tool(raw_tool("broken", "{not json"))
        .expect_err("must reject");
    assert_eq!(err.tool_name(), "broken");
    assert!(session.tools().is_empty());
}

#[test]
fn invalid_tool_aborts_send_before_any_call() {
    let mut session = Session::new("prompt");
    session.save_tool(raw_tool("good", &valid_config("good"))).unwrap();
    // a config may be invalid while being edited; only send validates
    let id = session.add_tool();
    session.edit_tool_config(id, "{broken");
    session.add_text_context("notes", "C");

    let effect = session.apply(Action::SendChat { text: "Q".into() });
    assert!(effect.is_none());

    let model_messages = session
        .messages()
        .iter()
        .filter(|m| m.role == Role::Model)
        .collect::<Vec<_>>();
    assert_eq!(model_messages.len(), 1);
    assert!(model_messages[0].text.contains("new_tool"));

    // registry and contexts are unchanged, no call slot is held
    assert_eq!(session.tools().len(), 2);
    assert_eq!(session.contexts().len(), 1);
    assert!(!session.chat_busy());
}

#[tokio::test]
async fn aborted_send_never_reaches_the_model() {
    let mut session = Session::default();
    let id = session.add_tool();
    session.edit_tool_config(id, "{broken");

    // NoopModel panics on any call, so driving the abort through it
    // shows the send stopped before the provider boundary
    let effect = session.apply(Action::SendChat { text: "Q".into() });
    drive(&mut session, &NoopModel, effect).await;

    let model_messages = session
        .messages()
        .iter()
        .filter(|m| m.role == Role::Model)
        .count();
    assert_eq!(model_messages, 1);
    assert!(!session.chat_busy());
}

#[tokio::test]
async fn rejected_duplicate_send_never_reaches_the_model() {
    let mut session = Session::default();
    let first = session.apply(Action::SendChat { text: "Q1".into() });
    assert!(matches!(first, Effect::Generate { .. }));

    let second = session.apply(Action::SendChat { text: "Q2".into() });
    drive(&mut session, &NoopModel, second).await;
    assert_eq!(session.messages().len(), 1);
    assert!(session.chat_busy());
}

#[test]
fn text_context_send_uses_template_and_omits_tools() {
    let mut session = Session::new("S");
    session.add_text_context("notes", "C");

    let Effect::Generate { request, .. } = session.apply(Action::SendChat { text: "Q".into() })
    else {
        panic!("expected a generate effect");
    };

    assert_eq!(request.system_instruction, "S");
    assert!(request.tools.is_none());
    assert_eq!(
        request.contents,
        vec![Part::Text {
            text: format!("{CONTEXT_SECTION}\nC\n\n{QUERY_SECTION}\nQ"),
        }]
    );
    assert!(session.chat_busy());
}

#[test]
fn file_context_send_puts_binary_part_first() {
    let mut session = Session::default();
    session.add_file_context("diagram", "a.png", "image/png", 4, "YWJjZA==");

    let Effect::Generate { request, .. } = session.apply(Action::SendChat { text: "Q".into() })
    else {
        panic!("expected a generate effect");
    };

    assert_eq!(request.contents.len(), 2);
    assert_eq!(
        request.contents[0],
        Part::Inline {
            mime: "image/png".into(),
            data: "YWJjZA==".into(),
        }
    );
    assert_eq!(request.contents[1], Part::Text { text: "Q".into() });
}

#[test]
fn registered_tools_attach_in_order() {
    let mut session = Session::default();
    session.save_tool(raw_tool("one", &valid_config("one"))).unwrap();
    session.save_tool(raw_tool("two", &valid_config("two"))).unwrap();

    let Effect::Generate { request, .. } = session.apply(Action::SendChat { text: "Q".into() })
    else {
        panic!("expected a generate effect");
    };
    let tools = request.tools.expect("tools attached");
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].name, "one");
    assert_eq!(tools[1].name, "two");
}

#[test]
fn duplicate_send_is_rejected_while_in_flight() {
    let mut session = Session::default();
    let first = session.apply(Action::SendChat { text: "Q1".into() });
    assert!(matches!(first, Effect::Generate { .. }));

    let second = session.apply(Action::SendChat { text: "Q2".into() });
    assert!(second.is_none());
    // the rejected send left no trace in the log
    assert_eq!(session.messages().len(), 1);
}

#[test]
fn stale_chat_completion_is_ignored() {
    let mut session = Session::default();
    let Effect::Generate { token, .. } = session.apply(Action::SendChat { text: "Q".into() })
    else {
        panic!("expected a generate effect");
    };

    session.apply(Action::ChatResolved {
        token: CallToken::new(),
        outcome: Ok(GenerateReply::text("stale")),
    });
    assert!(session.chat_busy());
    assert_eq!(session.messages().len(), 1);

    session.apply(Action::ChatResolved {
        token,
        outcome: Ok(GenerateReply::text("hi")),
    });
    assert!(!session.chat_busy());
    assert_eq!(session.messages().last().unwrap().text, "hi");
}

#[test]
fn function_call_reply_renders_as_json_block() {
    let mut session = Session::default();
    let Effect::Generate { token, .. } = session.apply(Action::SendChat { text: "Q".into() })
    else {
        panic!("expected a generate effect");
    };

    let mut reply = GenerateReply::default();
    reply.function_calls.push(FunctionCall {
        name: "f".into(),
        args: json!({"location": "Berlin"}),
    });
    session.apply(Action::ChatResolved {
        token,
        outcome: Ok(reply),
    });

    let last = session.messages().last().unwrap();
    assert_eq!(last.role, Role::Model);
    assert!(last.text.starts_with("Function Call Requested:\n```json"));
    assert!(last.text.contains("\"name\": \"f\""));
    assert!(last.text.contains("\"location\": \"Berlin\""));
}

#[test]
fn transport_failure_degrades_to_one_generic_message() {
    let mut session = Session::default();
    let Effect::Generate { token, .. } = session.apply(Action::SendChat { text: "Q".into() })
    else {
        panic!("expected a generate effect");
    };

    session.apply(Action::ChatResolved {
        token,
        outcome: Err(anyhow::anyhow!("boom")),
    });
    assert_eq!(session.messages().len(), 2);
    assert_eq!(
        session.messages()[1].text,
        console::TRANSPORT_ERROR_TEXT
    );
    assert!(!session.chat_busy());
}

#[test]
fn rewrite_success_replaces_prompt_and_clears_instruction() {
    let mut session = Session::new("old prompt");
    session.set_instruction("make it formal");

    let Effect::Rewrite { token, request } = session.apply(Action::ApplyInstruction) else {
        panic!("expected a rewrite effect");
    };
    assert!(request.system_instruction.is_empty());
    assert!(request.tools.is_none());
    assert!(session.rewrite_busy());

    session.apply(Action::RewriteResolved {
        token,
        outcome: Ok(GenerateReply::text("  new prompt  ")),
    });
    assert_eq!(session.system_prompt(), "new prompt");
    assert!(session.instruction().is_empty());
    assert!(!session.rewrite_busy());
}

#[test]
fn rewrite_failure_leaves_prompt_and_instruction_untouched() {
    let mut session = Session::new("old prompt");
    session.set_instruction("make it formal");

    let Effect::Rewrite { token, .. } = session.apply(Action::ApplyInstruction) else {
        panic!("expected a rewrite effect");
    };
    session.apply(Action::RewriteResolved {
        token,
        outcome: Err(anyhow::anyhow!("boom")),
    });

    assert_eq!(session.system_prompt(), "old prompt");
    assert_eq!(session.instruction(), "make it formal");
    assert!(!session.rewrite_busy());
}

#[test]
fn empty_instruction_issues_no_call() {
    let mut session = Session::new("prompt");
    session.set_instruction("   ");
    assert!(session.apply(Action::ApplyInstruction).is_none());
    assert!(!session.rewrite_busy());
}

#[test]
fn chat_and_rewrite_calls_may_overlap() {
    let mut session = Session::new("prompt");
    session.set_instruction("shorter");

    let chat = session.apply(Action::SendChat { text: "Q".into() });
    let rewrite = session.apply(Action::ApplyInstruction);
    assert!(matches!(chat, Effect::Generate { .. }));
    assert!(matches!(rewrite, Effect::Rewrite { .. }));
    assert!(session.chat_busy() && session.rewrite_busy());
}

#[test]
fn reset_clears_messages_only() {
    let mut session = Session::new("prompt");
    session.add_text_context("notes", "C");
    session.save_tool(raw_tool("t", &valid_config("t"))).unwrap();
    let Effect::Generate { token, .. } = session.apply(Action::SendChat { text: "Q".into() })
    else {
        panic!("expected a generate effect");
    };
    session.apply(Action::ChatResolved {
        token,
        outcome: Ok(GenerateReply::text("hi")),
    });
    assert_eq!(session.messages().len(), 2);

    session.reset_conversation();
    assert!(session.messages().is_empty());
    assert_eq!(session.contexts().len(), 1);
    assert_eq!(session.tools().len(), 1);
}
