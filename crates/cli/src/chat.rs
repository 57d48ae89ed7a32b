//! Chat command

use crate::Config;
use anyhow::Result;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::Args;
use console::{Action, Session, drive};
use dcore::{HttpMethod, ParamKind, ToolDef, ToolParameter, WebhookTool};
use gemini::{Client, Gemini};
use std::{
    io::{BufRead, Write},
    path::Path,
};
use ulid::Ulid;

const HELP: &str = "\
commands:
  /help                      show this help
  /quit, /exit               leave the console
  /reset                     clear the conversation (tools and contexts stay)
  /system [text]             show or replace the system prompt
  /rewrite <instruction>     rewrite the system prompt per the instruction
  /context                   list context items
  /context text <name> <content>   add and activate a text context
  /context file <path>       add and activate a file context
  /context use <n|none>      select the active context
  /context rename <n> <name> rename a context item
  /context set <n> <content> replace a context item's content
  /context rm <n>            delete a context item
  /tools                     list registered tools
  /tool add                  add a tool seeded with the template schema
  /tool json <n> <json>      replace a raw tool's JSON config (validated at send)
  /tool rm <n>               delete a tool";

/// Chat command arguments
#[derive(Debug, Args)]
pub struct ChatCmd {
    /// Override the initial system prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Start with an empty tool registry instead of the example tool
    #[arg(long)]
    pub no_starter_tools: bool,

    /// The message to send (if empty, starts interactive mode)
    pub message: Option<String>,
}

impl ChatCmd {
    /// Run the chat command
    pub async fn run(&self) -> Result<()> {
        let config = Config::load()?;
        let provider = Gemini::api(Client::new(), &config.resolve_key(), &config.model);

        let prompt = self.system.clone().unwrap_or(config.system_prompt);
        let mut session = Session::new(prompt);
        if !self.no_starter_tools {
            session.save_tool(starter_tool())?;
        }

        let mut printed = 0;
        if let Some(message) = &self.message {
            send(&mut session, &provider, message).await;
            show_new(&session, &mut printed);
            return Ok(());
        }

        println!("promptdeck console — /help for commands");
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("> ");
            stdout.flush()?;

            let mut input = String::new();
            if stdin.lock().read_line(&mut input)? == 0 {
                break;
            }

            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            if let Some(command) = input.strip_prefix('/') {
                if matches!(command, "quit" | "exit") {
                    break;
                }
                self.command(&mut session, &provider, command).await;
            } else {
                send(&mut session, &provider, input).await;
            }
            show_new(&session, &mut printed);
        }

        Ok(())
    }

    async fn command(&self, session: &mut Session, provider: &Gemini, command: &str) {
        let mut words = command.split_whitespace();
        match words.next() {
            Some("help") => println!("{HELP}"),
            Some("reset") => {
                session.reset_conversation();
                println!("conversation cleared");
            }
            Some("system") => {
                let rest = rest_of(command, "system");
                if rest.is_empty() {
                    println!("system prompt: {}", session.system_prompt());
                } else {
                    session.set_system_prompt(rest);
                    println!("system prompt replaced");
                }
            }
            Some("rewrite") => {
                let instruction = rest_of(command, "rewrite");
                if instruction.is_empty() {
                    println!("usage: /rewrite <instruction>");
                    return;
                }
                let before = session.system_prompt().to_owned();
                session.set_instruction(instruction);
                let effect = session.apply(Action::ApplyInstruction);
                drive(session, provider, effect).await;
                if session.system_prompt() == before {
                    println!("prompt unchanged (rewrite failed, see logs)");
                } else {
                    println!("system prompt: {}", session.system_prompt());
                }
            }
            Some("context") => self.context(session, words.collect::<Vec<_>>(), command),
            Some("tools") => list_tools(session),
            Some("tool") => self.tool(session, words.collect::<Vec<_>>(), command),
            Some(other) => println!("unknown command /{other}, try /help"),
            None => {}
        }
    }

    fn context(&self, session: &mut Session, args: Vec<&str>, raw: &str) {
        match args.first().copied() {
            None => {
                if session.contexts().is_empty() {
                    println!("no context items");
                }
                for (index, item) in session.contexts().iter().enumerate() {
                    let marker = if session.active_context_id() == Some(item.id) {
                        "*"
                    } else {
                        " "
                    };
                    let kind = if item.is_file() { "file" } else { "text" };
                    println!("{marker} [{index}] {} ({kind})", item.name);
                }
            }
            Some("text") => {
                let mut rest = rest_of(raw, "context text").splitn(2, char::is_whitespace);
                match (rest.next().filter(|s| !s.is_empty()), rest.next()) {
                    (Some(name), Some(content)) => {
                        session.add_text_context(name, content);
                        println!("added and activated context {name:?}");
                    }
                    _ => println!("usage: /context text <name> <content>"),
                }
            }
            Some("file") => {
                let path = rest_of(raw, "context file");
                if path.is_empty() {
                    println!("usage: /context file <path>");
                    return;
                }
                match upload(session, Path::new(&path)) {
                    Ok(name) => println!("added and activated context {name:?}"),
                    Err(error) => println!("failed to read {path:?}: {error}"),
                }
            }
            Some("use") => match args.get(1).copied() {
                Some("none") => {
                    session.set_active_context(None);
                    println!("no context active");
                }
                Some(index) => {
                    if let Some(id) = nth_context(session, index) {
                        session.set_active_context(Some(id));
                    }
                }
                None => println!("usage: /context use <n|none>"),
            },
            Some("rename") => {
                if let (Some(index), name) = (args.get(1), args.get(2..).unwrap_or_default().join(" "))
                    && !name.is_empty()
                    && let Some(id) = nth_context(session, index)
                {
                    session.update_context(id, Some(&name), None);
                } else {
                    println!("usage: /context rename <n> <name>");
                }
            }
            Some("set") => {
                let mut rest = rest_of(raw, "context set").splitn(2, char::is_whitespace);
                if let (Some(index), Some(content)) = (rest.next(), rest.next())
                    && let Some(id) = nth_context(session, index)
                {
                    session.update_context(id, None, Some(content));
                } else {
                    println!("usage: /context set <n> <content>");
                }
            }
            Some("rm") => match args.get(1).and_then(|index| nth_context(session, index)) {
                Some(id) => session.remove_context(id),
                None => println!("usage: /context rm <n>"),
            },
            Some(other) => println!("unknown context command {other:?}, try /help"),
        }
    }

    fn tool(&self, session: &mut Session, args: Vec<&str>, raw: &str) {
        match args.first().copied() {
            Some("add") => {
                session.add_tool();
                let index = session.tools().len() - 1;
                println!(
                    "added tool [{index}] with the template schema; \
                     edit it with /tool json {index} <json>"
                );
            }
            Some("json") => {
                let mut rest = rest_of(raw, "tool json").splitn(2, char::is_whitespace);
                if let (Some(index), Some(json)) = (rest.next(), rest.next())
                    && let Some(id) = nth_tool(session, index)
                {
                    session.edit_tool_config(id, json);
                    println!("config replaced (validated when you next send)");
                } else {
                    println!("usage: /tool json <n> <json>");
                }
            }
            Some("rm") => match args.get(1).and_then(|index| nth_tool(session, index)) {
                Some(id) => session.remove_tool(id),
                None => println!("usage: /tool rm <n>"),
            },
            _ => println!("usage: /tool add | /tool json <n> <json> | /tool rm <n>"),
        }
    }
}

/// Send one chat message and resolve its effect.
async fn send(session: &mut Session, provider: &Gemini, text: &str) {
    let effect = session.apply(Action::SendChat { text: text.into() });
    drive(session, provider, effect).await;
}

/// Print any messages appended since the last call.
fn show_new(session: &Session, printed: &mut usize) {
    for message in &session.messages()[*printed..] {
        match message.role {
            dcore::Role::User => println!("you> {}", message.text),
            dcore::Role::Model => println!("model> {}", message.text),
        }
    }
    *printed = session.messages().len();
}

fn list_tools(session: &Session) {
    if session.tools().is_empty() {
        println!("no tools registered");
    }
    for (index, tool) in session.tools().iter().enumerate() {
        let kind = match tool {
            ToolDef::Raw(_) => "raw",
            ToolDef::Webhook(_) => "webhook",
        };
        println!("[{index}] {} ({kind})", tool.name());
    }
}

fn nth_context(session: &Session, index: &str) -> Option<Ulid> {
    let id = index
        .parse::<usize>()
        .ok()
        .and_then(|n| session.contexts().get(n))
        .map(|item| item.id);
    if id.is_none() {
        println!("no context item [{index}]");
    }
    id
}

fn nth_tool(session: &Session, index: &str) -> Option<Ulid> {
    let id = index
        .parse::<usize>()
        .ok()
        .and_then(|n| session.tools().get(n))
        .map(ToolDef::id);
    if id.is_none() {
        println!("no tool [{index}]");
    }
    id
}

/// Everything after the given command prefix, trimmed.
fn rest_of<'a>(command: &'a str, prefix: &str) -> &'a str {
    command.strip_prefix(prefix).unwrap_or_default().trim()
}

/// Read a local file fully, base64-encode it, and attach it as context.
fn upload(session: &mut Session, path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".into());
    let mime = guess_mime(path);
    let size = bytes.len() as u64;
    session.add_file_context(&name, &name, mime, size, STANDARD.encode(bytes));
    Ok(name)
}

/// Best-effort mime type from the file extension.
fn guess_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        Some("txt" | "md") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// The example webhook tool seeded into a fresh registry.
fn starter_tool() -> ToolDef {
    ToolDef::Webhook(WebhookTool {
        id: Ulid::new(),
        name: "get_weather_forecast".into(),
        description: "Fetches the 5-day weather forecast for a specified location.".into(),
        webhook_url: "https://api.example-weather.com/v1/forecast".into(),
        http_method: HttpMethod::Get,
        parameters: vec![
            ToolParameter {
                id: Ulid::new(),
                name: "location".into(),
                kind: ParamKind::String,
                description: "The city and state, e.g., San Francisco, CA".into(),
                required: true,
            },
            ToolParameter {
                id: Ulid::new(),
                name: "units".into(),
                kind: ParamKind::String,
                description: "'celsius' or 'fahrenheit'".into(),
                required: false,
            },
        ],
    })
}
