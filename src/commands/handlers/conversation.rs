use crate::commands::error::CommandError;
use crate::commands::host::ChatHost;
use crate::commands::registry::CommandInvocation;

use super::required_arg;

pub(crate) fn list(
    host: &mut dyn ChatHost,
    _invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let conversations = host
        .list_conversations()
        .map_err(CommandError::host("list conversations"))?;
    Ok(conversations.join("\n"))
}

pub(crate) fn save(
    host: &mut dyn ChatHost,
    invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let name = required_arg(&invocation, 0, "/conversation save <name>")?;
    host.save_conversation(name)
        .map_err(CommandError::host("save conversation"))?;
    Ok("Conversation saved successfully".to_string())
}

pub(crate) fn load(
    host: &mut dyn ChatHost,
    invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let name = required_arg(&invocation, 0, "/conversation load <name>")?;
    host.load_conversation(name)
        .map_err(CommandError::host("load conversation"))?;
    Ok("Conversation loaded successfully".to_string())
}
