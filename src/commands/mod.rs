//! Slash-command registry and dispatcher.
//!
//! A [`CommandRegistry`] owns an immutable table of top-level commands, some
//! of which route to subcommands, and an [`AccessTier`] that decides which
//! entries are reachable. [`CommandRegistry::execute`] turns a raw input line
//! into a [`CommandResult`]: either "not a command" (the caller should treat
//! the line as chat input) or a [`CommandResponse`] envelope.
//!
//! The registry holds no host. Every call borrows a [`ChatHost`], so one
//! registry can serve any number of sessions and tests can drive it with an
//! in-memory host.

mod access;
mod error;
mod handlers;
mod host;
mod registry;
mod response;


use std::collections::BTreeMap;

use tracing::debug;

pub use access::AccessTier;
pub use error::CommandError;
pub use host::{ChatHost, HostError, HostResult};
pub use registry::{Command, CommandInvocation, CommandKind, Handler};
pub use response::CommandResponse;

/// Marks a line of input as a command rather than chat content.
pub const COMMAND_PREFIX: char = '/';

/// Outcome of [`CommandRegistry::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The line is not a slash command; no handler ran.
    NotACommand,
    Reply(CommandResponse),
    /// The quit command ran. The driver decides how to end the session; the
    /// registry never exits the process.
    Quit(CommandResponse),
}

impl CommandResult {
    pub fn response(&self) -> Option<&CommandResponse> {
        match self {
            CommandResult::NotACommand => None,
            CommandResult::Reply(response) | CommandResult::Quit(response) => Some(response),
        }
    }

    /// JSON envelope, or `None` for the not-a-command sentinel.
    pub fn serialized(&self) -> Option<String> {
        self.response().map(CommandResponse::to_json)
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, CommandResult::Quit(_))
    }
}

enum Outcome {
    Reply(String),
    Quit(String),
}

pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Command>,
    tier: AccessTier,
}

impl CommandRegistry {
    /// Build a registry exposing the commands visible at `tier`.
    pub fn new(tier: AccessTier) -> Self {
        Self {
            commands: registry::build_table(),
            tier,
        }
    }

    pub fn tier(&self) -> AccessTier {
        self.tier
    }

    /// Top-level commands reachable at the configured tier, sorted by name.
    pub fn visible_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands
            .values()
            .filter(move |command| self.tier.allows(command.min_tier))
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Parse and run one input line against `host`.
    pub fn execute(&self, host: &mut dyn ChatHost, input: &str) -> CommandResult {
        // The prefix must be the very first character; leading whitespace
        // makes the line chat content.
        if !input.starts_with(COMMAND_PREFIX) {
            return CommandResult::NotACommand;
        }

        let tokens: Vec<&str> = input.split_ascii_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return CommandResult::NotACommand;
        };

        debug!(command = name, args = args.len(), tier = %self.tier, "dispatching command");
        match self.dispatch(host, name, args) {
            Ok(Outcome::Reply(message)) => CommandResult::Reply(CommandResponse::ok(message)),
            Ok(Outcome::Quit(message)) => CommandResult::Quit(CommandResponse::ok(message)),
            Err(err) => {
                debug!(command = name, error = %err, "command failed");
                CommandResult::Reply(CommandResponse::failure(err.to_string()))
            }
        }
    }

    /// `/help` output wrapped in the response envelope.
    pub fn help(&self, command: Option<&str>) -> CommandResponse {
        match handlers::core::help(self, command) {
            Ok(text) => CommandResponse::ok(text),
            Err(err) => CommandResponse::failure(err.to_string()),
        }
    }

    fn dispatch(
        &self,
        host: &mut dyn ChatHost,
        name: &str,
        args: &[&str],
    ) -> Result<Outcome, CommandError> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        if !self.tier.allows(command.min_tier) {
            return Err(CommandError::CommandNotAvailable(name.to_string()));
        }

        let mut command = command;
        let mut args = args;
        loop {
            match &command.kind {
                CommandKind::Leaf(handler) => {
                    let invocation = CommandInvocation {
                        name: command.name,
                        args,
                    };
                    return self.run(*handler, host, invocation);
                }
                CommandKind::Group(subcommands) => {
                    let (&sub_name, rest) =
                        args.split_first().ok_or(CommandError::MissingSubcommand {
                            help: command.help,
                        })?;
                    let subcommand = subcommands.get(sub_name).ok_or_else(|| {
                        CommandError::UnknownSubcommand {
                            name: sub_name.to_string(),
                            help: command.help,
                        }
                    })?;
                    if !self.tier.allows(subcommand.min_tier) {
                        return Err(CommandError::SubcommandNotAvailable(sub_name.to_string()));
                    }
                    command = subcommand;
                    args = rest;
                }
            }
        }
    }

    fn run(
        &self,
        handler: Handler,
        host: &mut dyn ChatHost,
        invocation: CommandInvocation<'_>,
    ) -> Result<Outcome, CommandError> {
        match handler {
            Handler::Host(handle) => handle(host, invocation).map(Outcome::Reply),
            Handler::Help => handlers::core::help(self, invocation.arg(0)).map(Outcome::Reply),
            Handler::EchoHelp(text) => Ok(Outcome::Reply(text.to_string())),
            Handler::Quit => Ok(Outcome::Quit(handlers::core::GOODBYE.to_string())),
        }
    }
}
