pub mod chat;
pub mod scene;
pub mod selection;
pub mod settings;
pub mod view;

use serde::Serialize;
use serde_json::{Map, Value};
use shared::Command;

use crate::dispatch::{self, DispatchOutcome};
use crate::parser;
use crate::registry::ToolRegistry;

pub use chat::{ChatError, ChatMessage, ChatRole, ChatState};
pub use scene::{object_display_name, object_icon, short_id, SceneLoadError, SceneStore};
pub use settings::{AssistantSettings, EditorSettings, SettingsError};
pub use view::{ShadingMode, ViewState};

/// Result of submitting free text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    /// The text was recognized as a command and dispatched
    Command { outcome: DispatchOutcome },
    /// Nothing recognized; the text is conversation
    Conversation { text: String },
}

/// One editor session: scene store, view, chat and tool catalogue
pub struct EditorState {
    pub scene: SceneStore,
    pub view: ViewState,
    pub chat: ChatState,
    pub registry: ToolRegistry,
    pub settings: EditorSettings,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// Session with default settings (nothing read from disk)
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    /// Session with settings loaded from the config dir and environment
    pub fn load() -> Self {
        Self::with_settings(EditorSettings::load())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let registry = ToolRegistry::new();
        let missing = registry.missing_tools();
        if !missing.is_empty() {
            tracing::warn!("Tool registry is missing entries for {missing:?}");
        }
        Self {
            scene: SceneStore::with_settings(&settings.default_color, settings.history_limit),
            view: ViewState::default(),
            chat: ChatState::new(settings.assistant.clone()),
            registry,
            settings,
        }
    }

    /// Dispatch a named tool action
    pub fn execute_tool_action(
        &mut self,
        name: &str,
        params: Option<&Map<String, Value>>,
    ) -> DispatchOutcome {
        dispatch::execute_tool_action(self, name, params)
    }

    pub fn execute(&mut self, cmd: &Command) -> DispatchOutcome {
        dispatch::execute(self, cmd)
    }

    /// Parse free text locally and dispatch it if it names a command
    pub fn submit_text(&mut self, text: &str) -> Feedback {
        match parser::parse_command(text) {
            Some(cmd) => Feedback::Command {
                outcome: self.execute(&cmd),
            },
            None => Feedback::Conversation {
                text: text.trim().to_string(),
            },
        }
    }

    /// Chat entry point: local commands run immediately, anything else goes
    /// to the assistant
    pub fn send_chat(&mut self, text: &str) -> Option<DispatchOutcome> {
        let Some(cmd) = parser::parse_command(text) else {
            self.chat.submit(text);
            return None;
        };
        let outcome = self.execute(&cmd);
        self.chat.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.trim().to_string(),
            is_error: false,
        });
        self.chat.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text: outcome.describe(),
            is_error: outcome.is_rejected(),
        });
        Some(outcome)
    }

    /// Drain assistant replies and dispatch the commands they carry
    pub fn poll_chat(&mut self) -> Vec<DispatchOutcome> {
        let commands = self.chat.poll_responses();
        commands.iter().map(|cmd| self.execute(cmd)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ToolName;

    #[test]
    fn test_with_settings_applies_store_config() {
        let mut settings = EditorSettings::default();
        settings.default_color = "#00FF00".into();
        settings.history_limit = 3;
        let state = EditorState::with_settings(settings);
        assert_eq!(state.scene.objects()[0].color, "#00ff00");
        assert_eq!(state.scene.history_limit(), 3);
    }

    #[test]
    fn test_submit_text_dispatches() {
        let mut state = EditorState::new();
        match state.submit_text("add a red box") {
            Feedback::Command { outcome } => assert!(outcome.mutated()),
            other => panic!("Expected Command, got {other:?}"),
        }
        assert_eq!(state.scene.selected().map(|o| o.color.as_str()), Some("#ef4444"));
        assert_eq!(
            state.submit_text("  how are you  "),
            Feedback::Conversation {
                text: "how are you".into()
            }
        );
    }

    #[test]
    fn test_send_chat_local_command_logs_exchange() {
        let mut state = EditorState::new();
        let outcome = state.send_chat("add a torus").unwrap();
        assert!(matches!(outcome, DispatchOutcome::Applied { tool: ToolName::AddTorus, .. }));
        assert_eq!(state.chat.messages.len(), 2);
        assert_eq!(state.chat.messages[1].role, ChatRole::Assistant);
        assert!(!state.chat.is_loading);
    }

    #[test]
    fn test_poll_chat_dispatches_reply_commands() {
        let mut state = EditorState::new();
        let generation = state.chat.begin_request("add a wedge").unwrap();
        state.chat.deliver(
            generation,
            Ok(chat::AssistantPayload {
                message: Some("Here you go".into()),
                command: Some(serde_json::json!({"action": "add-wedge"})),
                error: None,
            }),
        );
        let outcomes = state.poll_chat();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].mutated());
        assert_eq!(state.scene.len(), 2);
    }
}
