use std::error::Error as StdError;
use std::fmt;

use super::host::HostError;

/// Failures produced while resolving or running a slash command.
#[derive(Debug)]
pub enum CommandError {
    /// No top-level command with this name.
    UnknownCommand(String),
    /// The command exists but is gated above the configured tier.
    CommandNotAvailable(String),
    /// A command that requires a subcommand was invoked bare.
    MissingSubcommand {
        /// Help text of the parent command.
        help: &'static str,
    },
    UnknownSubcommand {
        name: String,
        /// Help text of the parent command.
        help: &'static str,
    },
    /// The subcommand exists but is gated above the configured tier.
    SubcommandNotAvailable(String),
    /// `/help <name>` for a command that does not exist.
    NoHelp(String),
    /// Handler-detected argument error.
    Usage(&'static str),
    /// A host operation failed.
    Host {
        /// What was being attempted, e.g. "load persona".
        action: &'static str,
        source: HostError,
    },
}

impl CommandError {
    pub fn host(action: &'static str) -> impl FnOnce(HostError) -> CommandError {
        move |source| CommandError::Host { action, source }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(name) => {
                write!(f, "unknown command: {name} (try /help)")
            }
            CommandError::CommandNotAvailable(name) => {
                write!(f, "command {name} is not available in current mode")
            }
            CommandError::MissingSubcommand { help } => write!(f, "missing subcommand\n{help}"),
            CommandError::UnknownSubcommand { name, help } => {
                write!(f, "unknown subcommand: {name}\n{help}")
            }
            CommandError::SubcommandNotAvailable(name) => {
                write!(f, "subcommand {name} is not available in current mode")
            }
            CommandError::NoHelp(name) => write!(f, "no help available for: {name}"),
            CommandError::Usage(usage) => write!(f, "usage: {usage}"),
            CommandError::Host { action, source } => write!(f, "failed to {action}: {source}"),
        }
    }
}

impl StdError for CommandError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CommandError::Host { source, .. } => {
                let source: &(dyn StdError + 'static) = &**source;
                Some(source)
            }
            _ => None,
        }
    }
}
