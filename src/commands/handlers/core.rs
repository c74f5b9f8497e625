use crate::commands::error::CommandError;
use crate::commands::CommandRegistry;

pub(crate) const GOODBYE: &str = "Goodbye!";

/// Render `/help` output: the visible command summaries, or one command's
/// full help text.
pub(crate) fn help(
    registry: &CommandRegistry,
    command: Option<&str>,
) -> Result<String, CommandError> {
    let Some(name) = command else {
        let mut lines = vec!["Available commands:".to_string()];
        lines.extend(
            registry
                .visible_commands()
                .map(|command| format!("{} - {}", command.name, command.summary())),
        );
        return Ok(lines.join("\n"));
    };

    let name = if name.starts_with(crate::commands::COMMAND_PREFIX) {
        name.to_string()
    } else {
        format!("{}{name}", crate::commands::COMMAND_PREFIX)
    };

    let command = registry
        .find(&name)
        .ok_or_else(|| CommandError::NoHelp(name.clone()))?;
    if !registry.tier().allows(command.min_tier) {
        return Err(CommandError::CommandNotAvailable(name));
    }
    Ok(command.help.to_string())
}
