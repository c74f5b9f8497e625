//! The surface the command registry needs from a chat session.
//!
//! The registry never holds a host; each dispatch borrows one. This keeps the
//! command table reusable across sessions and lets tests drive it with an
//! in-memory host.

use crate::core::message::Message;

pub type HostError = Box<dyn std::error::Error + Send + Sync>;
pub type HostResult<T> = Result<T, HostError>;

/// Operations a host must provide to be driven by slash commands.
///
/// Every fallible operation is a single attempt. Implementations must not
/// retry or block indefinitely.
pub trait ChatHost {
    /// Names of the saved personas, in a stable order.
    fn list_personas(&self) -> HostResult<Vec<String>>;

    /// Persist `directive` under `name` and make it the current persona.
    fn save_persona(&mut self, name: &str, directive: &str) -> HostResult<()>;

    /// The active system directive.
    fn show_persona(&self) -> String;

    /// Replace the active directive with the one saved under `name`.
    fn load_persona(&mut self, name: &str) -> HostResult<()>;

    fn set_directive(&mut self, directive: &str) -> HostResult<()>;

    /// Drop everything but the system message.
    fn clear_history(&mut self);

    fn history(&self) -> &[Message];

    fn list_models(&self) -> HostResult<Vec<String>>;

    fn set_model(&mut self, model: &str);

    fn save_conversation(&mut self, name: &str) -> HostResult<()>;

    fn list_conversations(&self) -> HostResult<Vec<String>>;

    fn load_conversation(&mut self, name: &str) -> HostResult<()>;

    /// Name of the persona last saved or loaded, empty when none.
    fn current_persona(&self) -> &str;
}
