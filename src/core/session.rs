//! The chat session driven by the REPL and the HTTP server.

use tracing::{debug, info, warn};

use crate::api::{ApiError, ChatBackend};
use crate::commands::{ChatHost, HostResult};
use crate::core::config::Paths;
use crate::core::message::Message;
use crate::core::store::BlobStore;
use crate::utils::logging::LoggingState;

/// Mutable state of one conversation with the backend.
///
/// `history[0]` is always the system message carrying the active directive.
pub struct ChatSession {
    model: String,
    persona: String,
    directive: String,
    history: Vec<Message>,
    personas: BlobStore,
    conversations: BlobStore,
    backend: Box<dyn ChatBackend>,
    logging: LoggingState,
}

impl ChatSession {
    pub fn new(
        paths: &Paths,
        model: impl Into<String>,
        directive: impl Into<String>,
        backend: Box<dyn ChatBackend>,
    ) -> Self {
        let directive = directive.into();
        Self {
            model: model.into(),
            persona: String::new(),
            history: vec![Message::system(directive.clone())],
            directive,
            personas: BlobStore::new("persona", &paths.personas),
            conversations: BlobStore::new("conversation", &paths.conversations),
            backend,
            logging: LoggingState::disabled(),
        }
    }

    pub fn with_logging(mut self, logging: LoggingState) -> Self {
        self.logging = logging;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Load the persona configured for startup. A missing persona is not an
    /// error; the session keeps its default directive.
    pub fn load_startup_persona(&mut self, name: &str) {
        match self.load_persona(name) {
            Ok(()) => info!(persona = name, "loaded startup persona"),
            Err(err) => warn!(persona = name, error = %err, "startup persona not loaded"),
        }
    }

    /// Send `input` as a user message and return the assistant's reply.
    ///
    /// The user message stays in the history even when the backend fails.
    pub fn chat(&mut self, input: &str) -> Result<String, ApiError> {
        self.history.push(Message::user(input));
        let reply = self.backend.complete(&self.model, &self.history)?;
        let content = reply.content.clone();
        self.history.push(reply);

        if let Err(err) = self.logging.log_exchange(input, &content) {
            warn!(error = %err, "failed to write transcript");
        }
        Ok(content)
    }

    fn replace_directive(&mut self, directive: String) {
        match self.history.first_mut() {
            Some(system) if system.is_system() => system.content = directive.clone(),
            _ => self.history.insert(0, Message::system(directive.clone())),
        }
        self.directive = directive;
    }
}

impl ChatHost for ChatSession {
    fn list_personas(&self) -> HostResult<Vec<String>> {
        Ok(self.personas.list()?)
    }

    fn save_persona(&mut self, name: &str, directive: &str) -> HostResult<()> {
        self.personas.write(name, directive)?;
        self.persona = name.to_string();
        Ok(())
    }

    fn show_persona(&self) -> String {
        self.directive.clone()
    }

    fn load_persona(&mut self, name: &str) -> HostResult<()> {
        let directive = self.personas.read(name)?;
        self.replace_directive(directive);
        self.persona = name.to_string();
        debug!(persona = name, "persona loaded");
        Ok(())
    }

    fn set_directive(&mut self, directive: &str) -> HostResult<()> {
        self.replace_directive(directive.to_string());
        Ok(())
    }

    fn clear_history(&mut self) {
        self.history = vec![Message::system(self.directive.clone())];
    }

    fn history(&self) -> &[Message] {
        &self.history
    }

    fn list_models(&self) -> HostResult<Vec<String>> {
        Ok(self.backend.list_models()?)
    }

    fn set_model(&mut self, model: &str) {
        debug!(from = %self.model, to = model, "model changed");
        self.model = model.to_string();
    }

    fn save_conversation(&mut self, name: &str) -> HostResult<()> {
        let contents = serde_json::to_string_pretty(&self.history)?;
        self.conversations.write(name, &contents)?;
        Ok(())
    }

    fn list_conversations(&self) -> HostResult<Vec<String>> {
        Ok(self.conversations.list()?)
    }

    fn load_conversation(&mut self, name: &str) -> HostResult<()> {
        let contents = self.conversations.read(name)?;
        let mut messages: Vec<Message> = serde_json::from_str(&contents)
            .map_err(|err| format!("conversation '{name}' is not valid: {err}"))?;
        if messages.is_empty() {
            return Err(format!("conversation '{name}' is empty").into());
        }

        match messages.first() {
            Some(first) if first.is_system() => self.directive = first.content.clone(),
            _ => messages.insert(0, Message::system(self.directive.clone())),
        }
        self.history = messages;
        debug!(conversation = name, messages = self.history.len(), "conversation loaded");
        Ok(())
    }

    fn current_persona(&self) -> &str {
        &self.persona
    }
}
