use crate::commands::error::CommandError;
use crate::commands::host::ChatHost;
use crate::commands::registry::CommandInvocation;

use super::required_arg;

pub(crate) fn list(
    host: &mut dyn ChatHost,
    _invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let models = host.list_models().map_err(CommandError::host("list models"))?;
    Ok(models.join("\n"))
}

pub(crate) fn set(
    host: &mut dyn ChatHost,
    invocation: CommandInvocation<'_>,
) -> Result<String, CommandError> {
    let model = required_arg(&invocation, 0, "/model set <name>")?;
    host.set_model(model);
    Ok(format!("Model set to {model}"))
}
