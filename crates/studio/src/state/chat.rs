//! AI chat assistant boundary
//!
//! Requests run on a private tokio runtime; replies come back over an
//! unbounded channel and are drained by [`ChatState::poll_responses`] on the
//! editor's own thread. Each request carries a generation number and only
//! the newest generation is accepted, so starting a new request abandons
//! any older one still in flight.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::Command;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::settings::AssistantSettings;
use crate::parser;

/// App identifier sent with every request
const APP_NAME: &str = "conceivin3d-studio";

/// Failures talking to the assistant endpoint
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("could not reach the assistant: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("assistant returned HTTP {0}")]
    Status(u16),
    #[error("assistant reported an error: {0}")]
    Remote(String),
    #[error("assistant reply was empty")]
    EmptyReply,
    #[error("could not start the chat runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: ChatRole,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    messages: Vec<WireMessage<'a>>,
    user_id: &'a str,
    app: &'a str,
}

/// Response body of the assistant endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub command: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

pub(crate) struct ChatReply {
    generation: u64,
    result: Result<AssistantPayload, ChatError>,
}

/// Chat log plus the in-flight request, if any
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub is_loading: bool,
    pub last_failed_input: Option<String>,
    config: AssistantSettings,
    generation: u64,
    pending_input: Option<String>,
    tx: UnboundedSender<ChatReply>,
    rx: UnboundedReceiver<ChatReply>,
    runtime: Option<tokio::runtime::Runtime>,
    client: Option<reqwest::Client>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(AssistantSettings::default())
    }
}

impl ChatState {
    pub fn new(config: AssistantSettings) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            messages: Vec::new(),
            input: String::new(),
            is_loading: false,
            last_failed_input: None,
            config,
            generation: 0,
            pending_input: None,
            tx,
            rx,
            runtime: None,
            client: None,
        }
    }

    pub fn config(&self) -> &AssistantSettings {
        &self.config
    }

    /// Send the current input box contents
    pub fn send_message(&mut self) {
        let text = std::mem::take(&mut self.input);
        self.submit(&text);
    }

    /// Send `text` to the assistant, superseding any request in flight
    pub fn submit(&mut self, text: &str) {
        let Some(generation) = self.begin_request(text) else {
            return;
        };
        if let Err(e) = self.ensure_client() {
            tracing::error!("Chat unavailable: {e}");
            self.deliver(generation, Err(e));
            return;
        }
        let (Some(runtime), Some(client)) = (&self.runtime, &self.client) else {
            return;
        };

        let body = self.request_body();
        let endpoint = self.config.endpoint.clone();
        let timeout = Duration::from_secs(self.config.timeout_secs.max(1));
        let client = client.clone();
        let tx = self.tx.clone();

        runtime.spawn(async move {
            let result = post_chat(&client, &endpoint, timeout, body).await;
            if let Err(e) = &result {
                tracing::error!("Assistant request failed: {e}");
            }
            // Receiver gone means the editor closed; nothing to report to
            let _ = tx.send(ChatReply { generation, result });
        });
    }

    /// Record the user message and open a new generation
    pub(crate) fn begin_request(&mut self, text: &str) -> Option<u64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.is_loading {
            tracing::debug!("Abandoning assistant request {}", self.generation);
        }
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.to_string(),
            is_error: false,
        });
        self.generation += 1;
        self.is_loading = true;
        self.pending_input = Some(text.to_string());
        Some(self.generation)
    }

    pub(crate) fn deliver(&self, generation: u64, result: Result<AssistantPayload, ChatError>) {
        let _ = self.tx.send(ChatReply { generation, result });
    }

    fn ensure_client(&mut self) -> Result<(), ChatError> {
        if self.runtime.is_none() {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("chat")
                .enable_all()
                .build()?;
            self.runtime = Some(runtime);
        }
        if self.client.is_none() {
            self.client = Some(reqwest::Client::builder().build()?);
        }
        Ok(())
    }

    /// Trailing context window, newest last, errors excluded
    fn request_body(&self) -> Value {
        let window = self.config.context_messages.max(1);
        let history: Vec<&ChatMessage> = self.messages.iter().filter(|m| !m.is_error).collect();
        let start = history.len().saturating_sub(window);
        let request = ChatRequest {
            messages: history[start..]
                .iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: &m.text,
                })
                .collect(),
            user_id: &self.config.user_id,
            app: APP_NAME,
        };
        serde_json::to_value(request).unwrap_or(Value::Null)
    }

    /// Drain finished requests.
    ///
    /// Appends assistant text (or a visible error) to the log and returns
    /// the commands carried by accepted replies, in arrival order.
    pub fn poll_responses(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            if reply.generation != self.generation {
                tracing::debug!("Discarding stale assistant reply {}", reply.generation);
                continue;
            }
            self.is_loading = false;
            let input = self.pending_input.take();
            match reply.result.and_then(interpret_payload) {
                Ok(reply) => {
                    if !reply.text.is_empty() {
                        self.messages.push(ChatMessage {
                            role: ChatRole::Assistant,
                            text: reply.text,
                            is_error: false,
                        });
                    }
                    self.last_failed_input = None;
                    commands.extend(reply.command);
                }
                Err(e) => {
                    tracing::warn!("Assistant reply rejected: {e}");
                    self.messages.push(ChatMessage {
                        role: ChatRole::Assistant,
                        text: format!("Sorry, I couldn't process that request. {e}"),
                        is_error: true,
                    });
                    self.last_failed_input = input;
                }
            }
        }
        commands
    }

    /// Resend the last failed input
    pub fn retry(&mut self) -> bool {
        match self.last_failed_input.take() {
            Some(text) => {
                self.submit(&text);
                true
            }
            None => false,
        }
    }

    /// Abandon the request in flight, if any
    pub fn cancel(&mut self) {
        if self.is_loading {
            self.generation += 1;
            self.is_loading = false;
            self.pending_input = None;
        }
    }

    pub fn clear(&mut self) {
        self.cancel();
        self.messages.clear();
        self.input.clear();
        self.last_failed_input = None;
    }
}

fn interpret_payload(payload: AssistantPayload) -> Result<parser::AssistantReply, ChatError> {
    if let Some(err) = payload.error {
        return Err(ChatError::Remote(err));
    }
    let command = payload.command.as_ref().and_then(parser::extract_command);
    match payload.message {
        Some(message) if command.is_some() => Ok(parser::AssistantReply {
            text: message.trim().to_string(),
            command,
        }),
        Some(message) => Ok(parser::parse_reply(&message)),
        None if command.is_some() => Ok(parser::AssistantReply {
            text: String::new(),
            command,
        }),
        None => Err(ChatError::EmptyReply),
    }
}

async fn post_chat(
    client: &reqwest::Client,
    endpoint: &str,
    timeout: Duration,
    body: Value,
) -> Result<AssistantPayload, ChatError> {
    let response = client
        .post(endpoint)
        .timeout(timeout)
        .json(&body)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ChatError::Status(status.as_u16()));
    }
    Ok(response.json::<AssistantPayload>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{ObjectType, ToolName};

    fn payload(message: Option<&str>, command: Option<Value>) -> AssistantPayload {
        AssistantPayload {
            message: message.map(String::from),
            command,
            error: None,
        }
    }

    #[test]
    fn test_reply_with_command() {
        let mut chat = ChatState::default();
        let generation = chat.begin_request("add a cone please").unwrap();
        assert!(chat.is_loading);
        chat.deliver(
            generation,
            Ok(payload(Some("Adding a cone."), Some(json!({"action": "add-cone"})))),
        );

        let commands = chat.poll_responses();
        assert!(!chat.is_loading);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].tool_name(), ToolName::AddCone);
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[1].text, "Adding a cone.");
    }

    #[test]
    fn test_command_in_message_body() {
        let mut chat = ChatState::default();
        let generation = chat.begin_request("sphere").unwrap();
        chat.deliver(
            generation,
            Ok(payload(Some(r#"{"name": "add-sphere", "arguments": "{\"color\": \"blue\"}"}"#), None)),
        );
        let commands = chat.poll_responses();
        assert_eq!(
            commands,
            vec![Command::Add {
                shape: ObjectType::Sphere,
                color: Some("#3b82f6".into()),
                position: None
            }]
        );
        // Pure command replies add no chat text
        assert_eq!(chat.messages.len(), 1);
    }

    #[test]
    fn test_stale_reply_discarded() {
        let mut chat = ChatState::default();
        let first = chat.begin_request("first").unwrap();
        let second = chat.begin_request("second").unwrap();
        chat.deliver(first, Ok(payload(Some("old answer"), None)));
        assert!(chat.poll_responses().is_empty());
        assert!(chat.is_loading);

        chat.deliver(second, Ok(payload(Some("new answer"), None)));
        chat.poll_responses();
        assert!(!chat.is_loading);
        assert_eq!(chat.messages.last().map(|m| m.text.as_str()), Some("new answer"));
        assert!(!chat.messages.iter().any(|m| m.text == "old answer"));
    }

    #[test]
    fn test_cancel_discards_reply() {
        let mut chat = ChatState::default();
        let generation = chat.begin_request("slow").unwrap();
        chat.cancel();
        assert!(!chat.is_loading);
        chat.deliver(generation, Ok(payload(Some("late"), None)));
        chat.poll_responses();
        assert_eq!(chat.messages.len(), 1);
    }

    #[test]
    fn test_failure_is_visible_and_retryable() {
        let mut chat = ChatState::default();
        let generation = chat.begin_request("make a torus").unwrap();
        chat.deliver(generation, Err(ChatError::Status(502)));
        assert!(chat.poll_responses().is_empty());

        let last = chat.messages.last().unwrap();
        assert!(last.is_error);
        assert!(last.text.contains("502"));
        assert_eq!(chat.last_failed_input.as_deref(), Some("make a torus"));
    }

    #[test]
    fn test_remote_error_and_empty_reply() {
        let mut chat = ChatState::default();
        let g = chat.begin_request("x").unwrap();
        chat.deliver(
            g,
            Ok(AssistantPayload {
                error: Some("quota".into()),
                ..Default::default()
            }),
        );
        chat.poll_responses();
        assert!(chat.messages.last().unwrap().is_error);

        let g = chat.begin_request("y").unwrap();
        chat.deliver(g, Ok(AssistantPayload::default()));
        chat.poll_responses();
        assert!(chat.messages.last().unwrap().text.contains("empty"));
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut chat = ChatState::default();
        chat.input = "   ".into();
        chat.send_message();
        assert!(chat.messages.is_empty());
        assert!(!chat.is_loading);
        assert!(!chat.retry());
    }

    #[test]
    fn test_request_body_window() {
        let mut chat = ChatState::new(AssistantSettings {
            context_messages: 2,
            user_id: "u1".into(),
            ..AssistantSettings::default()
        });
        for text in ["one", "two", "three"] {
            chat.begin_request(text);
        }
        let body = chat.request_body();
        assert_eq!(body["userId"], "u1");
        assert_eq!(body["app"], APP_NAME);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["content"], "two");
        assert_eq!(messages[1]["role"], "user");
    }
}
