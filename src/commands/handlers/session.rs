use crate::commands::error::CommandError;
use crate::commands::host::ChatHost;
use crate::commands::registry::CommandInvocation;

use super::required_arg;

pub(crate) fn set_directive(
    host: &mut dyn ChatHost,
    invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    required_arg(&invocation, 0, "/system directive <text>")?;
    let directive = invocation.args_text();
    host.set_directive(&directive)
        .map_err(CommandError::host("set directive"))?;
    Ok("Directive set successfully".to_string())
}

pub(crate) fn show_history(
    host: &mut dyn ChatHost,
    _invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let lines: Vec<String> = host
        .history()
        .iter()
        .map(|message| format!("{}: {}", message.role, message.content))
        .collect();
    Ok(lines.join("\n"))
}

pub(crate) fn clear_history(
    host: &mut dyn ChatHost,
    _invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    host.clear_history();
    Ok("History cleared".to_string())
}
