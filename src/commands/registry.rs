use std::collections::BTreeMap;

use super::access::AccessTier;
use super::error::CommandError;
use super::handlers;
use super::host::ChatHost;

pub type HostHandler =
    fn(&mut dyn ChatHost, CommandInvocation<'_>) -> Result<String, CommandError>;

/// What running a leaf command does.
#[derive(Clone, Copy)]
pub enum Handler {
    /// Operates on the host and returns the success payload.
    Host(HostHandler),
    /// `/help [command]`, answered from the registry itself.
    Help,
    /// Synthesized `help` subcommand echoing its parent's help text.
    EchoHelp(&'static str),
    /// Asks the driver to end the session.
    Quit,
}

pub enum CommandKind {
    Leaf(Handler),
    Group(BTreeMap<&'static str, Command>),
}

pub struct Command {
    pub name: &'static str,
    /// First line is the summary shown in `/help`; the rest is detail.
    pub help: &'static str,
    pub min_tier: AccessTier,
    pub kind: CommandKind,
}

impl Command {
    pub fn leaf(
        name: &'static str,
        help: &'static str,
        min_tier: AccessTier,
        handler: Handler,
    ) -> Self {
        Self {
            name,
            help,
            min_tier,
            kind: CommandKind::Leaf(handler),
        }
    }

    /// Build a command that routes to `subcommands`, adding a `help`
    /// subcommand that echoes `help` at the parent's tier.
    pub fn group(
        name: &'static str,
        help: &'static str,
        min_tier: AccessTier,
        subcommands: Vec<Command>,
    ) -> Self {
        let mut table = BTreeMap::new();
        table.insert(
            "help",
            Command::leaf(
                "help",
                "Show help for this command",
                min_tier,
                Handler::EchoHelp(help),
            ),
        );
        for subcommand in subcommands {
            table.insert(subcommand.name, subcommand);
        }
        Self {
            name,
            help,
            min_tier,
            kind: CommandKind::Group(table),
        }
    }

    pub fn summary(&self) -> &'static str {
        self.help.lines().next().unwrap_or_default()
    }

    pub fn subcommands(&self) -> Option<&BTreeMap<&'static str, Command>> {
        match &self.kind {
            CommandKind::Group(table) => Some(table),
            CommandKind::Leaf(_) => None,
        }
    }
}

/// Arguments handed to a leaf command: everything after the command (and
/// subcommand) tokens.
#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub name: &'a str,
    pub args: &'a [&'a str],
}

impl<'a> CommandInvocation<'a> {
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    pub fn args_text(&self) -> String {
        self.args.join(" ")
    }
}

const QUIT_HELP: &str = "Quit the application";

const HELP_HELP: &str =
    "Show help information. Use /help <command> for detailed help on a command.";

const SYSTEM_HELP: &str = "System Commands:
  directive <text> - Set the system directive
  help             - Show this help message";

const HISTORY_HELP: &str = "History Commands:
  show   - Show conversation history
  clear  - Clear conversation history
  help   - Show this help message";

const PERSONA_HELP: &str = "Persona Management Commands:
  list         - List all personas (* marks current)
  show         - Show current persona
  save <name>  - Save current system directive as a persona
  load <name>  - Load a persona by name
  help         - Show this help message";

const MODEL_HELP: &str = "Model Commands:
  list       - List available models
  set <name> - Set the current model
  help       - Show this help message";

const CONVERSATION_HELP: &str = "Conversation Commands:
  list        - List saved conversations
  save <name> - Save current conversation
  load <name> - Load a saved conversation
  help        - Show this help message";

/// Build the full command table. Called once per registry.
pub(super) fn build_table() -> BTreeMap<&'static str, Command> {
    use AccessTier::{Beta, Legacy};
    use Handler::Host;

    let commands = vec![
        Command::leaf("/q", QUIT_HELP, Legacy, Handler::Quit),
        Command::leaf("/help", HELP_HELP, Legacy, Handler::Help),
        Command::group(
            "/system",
            SYSTEM_HELP,
            Beta,
            vec![Command::leaf(
                "directive",
                "Sets the system directive",
                Beta,
                Host(handlers::session::set_directive),
            )],
        ),
        Command::group(
            "/history",
            HISTORY_HELP,
            Beta,
            vec![
                Command::leaf(
                    "show",
                    "Shows the conversation history",
                    Beta,
                    Host(handlers::session::show_history),
                ),
                Command::leaf(
                    "clear",
                    "Clears the conversation history",
                    Beta,
                    Host(handlers::session::clear_history),
                ),
            ],
        ),
        Command::group(
            "/persona",
            PERSONA_HELP,
            Beta,
            vec![
                Command::leaf(
                    "list",
                    "Lists all available personas",
                    Beta,
                    Host(handlers::persona::list),
                ),
                Command::leaf(
                    "show",
                    "Shows the current persona",
                    Beta,
                    Host(handlers::persona::show),
                ),
                Command::leaf(
                    "save",
                    "Saves the current system directive as a persona",
                    Beta,
                    Host(handlers::persona::save),
                ),
                Command::leaf(
                    "load",
                    "Loads a persona by name",
                    Beta,
                    Host(handlers::persona::load),
                ),
            ],
        ),
        Command::group(
            "/model",
            MODEL_HELP,
            Beta,
            vec![
                Command::leaf(
                    "list",
                    "Lists available models",
                    Beta,
                    Host(handlers::model::list),
                ),
                Command::leaf(
                    "set",
                    "Sets the current model",
                    Beta,
                    Host(handlers::model::set),
                ),
            ],
        ),
        Command::group(
            "/conversation",
            CONVERSATION_HELP,
            Beta,
            vec![
                Command::leaf(
                    "list",
                    "Lists saved conversations",
                    Beta,
                    Host(handlers::conversation::list),
                ),
                Command::leaf(
                    "save",
                    "Saves the current conversation",
                    Beta,
                    Host(handlers::conversation::save),
                ),
                Command::leaf(
                    "load",
                    "Loads a saved conversation",
                    Beta,
                    Host(handlers::conversation::load),
                ),
            ],
        ),
    ];

    commands
        .into_iter()
        .map(|command| (command.name, command))
        .collect()
}
