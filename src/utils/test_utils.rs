use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ChatBackend};
use crate::core::config::Paths;
use crate::core::message::{Message, ROLE_ASSISTANT};
use crate::core::session::ChatSession;

type SeenRequests = Arc<Mutex<Vec<(String, Vec<Message>)>>>;

/// Backend that replays canned replies and records what it was sent.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, String>>>,
    models: Result<Vec<String>, String>,
    seen: SeenRequests,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            models: Ok(Vec::new()),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reply(self, content: &str) -> Self {
        self.push(Ok(content.to_string()))
    }

    pub fn fail(self, summary: &str) -> Self {
        self.push(Err(summary.to_string()))
    }

    pub fn models(mut self, models: &[&str]) -> Self {
        self.models = Ok(models.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn models_error(mut self, summary: &str) -> Self {
        self.models = Err(summary.to_string());
        self
    }

    /// Handle to the (model, messages) pairs sent so far.
    pub fn seen(&self) -> SeenRequests {
        Arc::clone(&self.seen)
    }

    fn push(self, reply: Result<String, String>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }
}

fn server_error(summary: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        summary: summary.to_string(),
    }
}

impl ChatBackend for ScriptedBackend {
    fn complete(&self, model: &str, messages: &[Message]) -> Result<Message, ApiError> {
        self.seen
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(Message::new(ROLE_ASSISTANT, content)),
            Some(Err(summary)) => Err(server_error(&summary)),
            None => Err(ApiError::EmptyResponse("choices")),
        }
    }

    fn list_models(&self) -> Result<Vec<String>, ApiError> {
        self.models.clone().map_err(|summary| server_error(&summary))
    }
}

/// Session rooted at `root` with model "test-model" and directive "test directive".
pub fn create_test_session(root: &Path, backend: ScriptedBackend) -> ChatSession {
    ChatSession::new(
        &Paths::under(root),
        "test-model",
        "test directive",
        Box::new(backend),
    )
}
