//! Headless editor driver.
//!
//! Reads one request per line from stdin and writes one JSON response per
//! line to stdout. Lines starting with `{` or `[` are agent protocol
//! commands; anything else is treated as chat text.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use conceivin_studio_lib::command::{execute_json, execute_json_batch};
use conceivin_studio_lib::dispatch::DispatchOutcome;
use conceivin_studio_lib::state::{ChatRole, EditorState};
use serde_json::{json, Value};

struct Args {
    scene: Option<String>,
    assistant: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conceivin_studio=info".into()),
        )
        .init();

    let args = parse_args();
    let mut state = EditorState::load();

    if let Some(path) = &args.scene {
        load_scene(&mut state, path);
    }
    tracing::info!(
        "Editor ready ({} objects, assistant {})",
        state.scene.len(),
        if args.assistant { "on" } else { "off" }
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_line(&mut state, line, args.assistant);
        if writeln!(stdout, "{response}").and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }
}

fn handle_line(state: &mut EditorState, line: &str, assistant: bool) -> Value {
    let result = if line.starts_with('[') {
        execute_json_batch(state, line).map(|r| json!(r))
    } else if line.starts_with('{') {
        execute_json(state, line).map(|r| json!(r))
    } else if assistant {
        Ok(chat_round_trip(state, line))
    } else {
        Ok(json!(state.submit_text(line)))
    };
    result.unwrap_or_else(|e| json!({ "success": false, "error": e }))
}

/// Send text through the chat path and wait for the assistant, if consulted
fn chat_round_trip(state: &mut EditorState, text: &str) -> Value {
    if let Some(outcome) = state.send_chat(text) {
        return json!({ "outcomes": [outcome] });
    }

    let deadline = Instant::now() + Duration::from_secs(state.settings.assistant.timeout_secs + 1);
    let mut outcomes: Vec<DispatchOutcome> = Vec::new();
    loop {
        outcomes.extend(state.poll_chat());
        if !state.chat.is_loading || Instant::now() >= deadline {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    if state.chat.is_loading {
        tracing::warn!("Assistant did not answer in time");
        state.chat.cancel();
    }

    let reply = state
        .chat
        .messages
        .last()
        .filter(|m| m.role == ChatRole::Assistant)
        .map(|m| json!({ "text": m.text, "is_error": m.is_error }));
    json!({ "reply": reply, "outcomes": outcomes })
}

fn parse_args() -> Args {
    let mut args = Args {
        scene: None,
        assistant: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scene" => args.scene = iter.next(),
            "--assistant" => args.assistant = true,
            other => tracing::warn!("Ignoring unknown argument {other}"),
        }
    }
    args
}

fn load_scene(state: &mut EditorState, path: &str) {
    match std::fs::read_to_string(path) {
        Ok(json) => match state.scene.load_json(&json) {
            Ok(count) => {
                // The file is where editing starts, not an undoable step
                state.scene.reset_history();
                tracing::info!("Loaded scene from {path} ({count} objects)");
            }
            Err(e) => tracing::error!("Failed to load scene from {path}: {e}"),
        },
        Err(e) => tracing::error!("Failed to read {path}: {e}"),
    }
}
