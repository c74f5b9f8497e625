use crate::commands::error::CommandError;
use crate::commands::host::ChatHost;
use crate::commands::registry::CommandInvocation;

use super::required_arg;

pub(crate) fn list(
    host: &mut dyn ChatHost,
    _invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let personas = host
        .list_personas()
        .map_err(CommandError::host("list personas"))?;
    let current = host.current_persona();
    let marked: Vec<String> = personas
        .into_iter()
        .map(|name| {
            if !current.is_empty() && name == current {
                format!("{name}*")
            } else {
                name
            }
        })
        .collect();
    Ok(marked.join("\n"))
}

pub(crate) fn show(
    host: &mut dyn ChatHost,
    _invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    Ok(host.show_persona())
}

pub(crate) fn save(
    host: &mut dyn ChatHost,
    invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let name = required_arg(&invocation, 0, "/persona save <name>")?;
    let directive = host.show_persona();
    host.save_persona(name, &directive)
        .map_err(CommandError::host("save persona"))?;
    Ok("Persona saved successfully".to_string())
}

pub(crate) fn load(
    host: &mut dyn ChatHost,
    invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let name = required_arg(&invocation, 0, "/persona load <name>")?;
    host.load_persona(name)
        .map_err(CommandError::host("load persona"))?;
    Ok("Persona loaded successfully".to_string())
}
