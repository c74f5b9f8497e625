//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, builds the chat session from
//! config and flags, and dispatches to the interactive loop, the HTTP server,
//! image generation, or the config subcommands.

pub mod image;
pub mod repl;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::{ChatBackend, OpenAiClient, UnconfiguredBackend};
use crate::commands::{AccessTier, CommandRegistry};
use crate::core::config::{Config, Paths};
use crate::core::keyring;
use crate::core::session::ChatSession;
use crate::core::token::resolve_token;
use crate::server::{self, AppState};
use crate::utils::logging::LoggingState;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

#[derive(Parser)]
#[command(name = "oai")]
#[command(version = VERSION)]
#[command(about = "Chat with OpenAI-compatible APIs from the terminal or over HTTP")]
#[command(
    long_about = "oai is a line-oriented chat client for OpenAI-compatible APIs. Lines starting \
with '/' are slash commands; everything else is sent to the model.\n\n\
Authentication:\n\
  OPENAI_API_TOKEN or OPENAI_API_KEY, a 'token' file in the config directory, or\n\
  a token stored in the system keyring with 'oai auth'.\n\n\
Commands inside the chat:\n\
  /help             List the commands available at the configured access tier\n\
  /q                Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to chat with
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Persona to load at startup
    #[arg(short = 'p', long, global = true)]
    pub persona: Option<String>,

    /// Access tier gating slash commands (legacy, beta, stable)
    #[arg(long = "access", global = true, value_name = "TIER")]
    pub access: Option<AccessTier>,

    /// Append the chat transcript to this file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<PathBuf>,

    /// Address for the HTTP server
    #[arg(long, global = true, value_name = "ADDR")]
    pub listen: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat {
        /// Also serve the HTTP API in the background
        #[arg(long)]
        serve: bool,
    },
    /// Serve slash commands and chat over HTTP
    Server,
    /// Generate images from a prompt
    Image {
        #[arg(long)]
        prompt: String,
        /// File to write; numbered when more than one image is requested
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "1024", value_parser = ["256", "512", "1024"])]
        size: String,
        #[arg(
            short = 'n',
            long = "num",
            default_value_t = 1,
            value_parser = clap::value_parser!(u8).range(1..=10)
        )]
        num: u8,
    },
    /// Set a configuration value, or print the configuration when no key is given
    Set {
        key: Option<String>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset { key: String },
    /// Store an API token in the system keyring
    Auth {
        /// Token to store; read from stdin when omitted
        #[arg(long)]
        token: Option<String>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Some(Commands::Set { ref key, ref value }) => set_config(key.as_deref(), value),
        Some(Commands::Unset { ref key }) => unset_config(key),
        Some(Commands::Auth { ref token }) => store_token(token.clone()),
        Some(Commands::Image {
            ref prompt,
            ref output,
            ref size,
            num,
        }) => {
            let (config, paths) = load_config()?;
            let token = resolve_token(&paths.token)?;
            let client = OpenAiClient::new(config.base_url(), &token, config.request_timeout())?;
            let written = image::generate(&client, prompt, size, num, output)?;
            for path in written {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
        Some(Commands::Server) => {
            let (config, paths) = load_config()?;
            let listen = args.listen.clone().unwrap_or_else(|| config.listen().to_string());
            let (session, registry) = build_session(&args, &config, &paths)?;
            // The session owns a blocking HTTP client, which must not be
            // dropped on a runtime thread; keep a handle outside the runtime.
            let state = AppState::new(Arc::clone(&session), registry);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(&listen, state))?;
            drop(runtime);
            drop(session);
            Ok(())
        }
        Some(Commands::Chat { serve }) => run_chat(&args, serve),
        None => run_chat(&args, false),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config() -> Result<(Config, Paths), Box<dyn Error>> {
    let paths = Paths::resolve()?;
    let config = Config::load_from_path(&paths.config_file)?;
    Ok((config, paths))
}

fn run_chat(args: &Args, serve: bool) -> Result<(), Box<dyn Error>> {
    let (config, paths) = load_config()?;
    let (session, registry) = build_session(args, &config, &paths)?;

    if serve {
        let listen = args.listen.clone().unwrap_or_else(|| config.listen().to_string());
        let state = AppState::new(Arc::clone(&session), Arc::clone(&registry));
        let runtime = tokio::runtime::Runtime::new()?;
        std::thread::spawn(move || {
            if let Err(err) = runtime.block_on(server::serve(&listen, state)) {
                warn!(error = %err, "HTTP server stopped");
            }
        });
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    repl::run(&session, &registry, stdin.lock(), stdout.lock())?;
    Ok(())
}

type SharedSession = (Arc<Mutex<ChatSession>>, Arc<CommandRegistry>);

/// Build the shared session and the registry for the configured tier.
fn build_session(
    args: &Args,
    config: &Config,
    paths: &Paths,
) -> Result<SharedSession, Box<dyn Error>> {
    paths.ensure_dirs()?;

    let backend: Box<dyn ChatBackend> = match resolve_token(&paths.token) {
        Ok(token) => Box::new(OpenAiClient::new(
            config.base_url(),
            &token,
            config.request_timeout(),
        )?),
        Err(err) => {
            warn!(error = %err, "starting without a chat backend");
            Box::new(UnconfiguredBackend::new(err.to_string()))
        }
    };

    let model = args.model.as_deref().unwrap_or(config.model());
    let mut session = ChatSession::new(paths, model, config.system_directive(), backend);
    if let Some(path) = &args.log {
        session = session.with_logging(LoggingState::to_file(path)?);
        info!(path = %path.display(), "logging transcript");
    }
    if let Some(persona) = args.persona.as_deref().or(config.persona.as_deref()) {
        session.load_startup_persona(persona);
    }

    let tier = args.access.unwrap_or_else(|| config.access_tier());
    Ok((
        Arc::new(Mutex::new(session)),
        Arc::new(CommandRegistry::new(tier)),
    ))
}

fn set_config(key: Option<&str>, value: &[String]) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let Some(key) = key else {
        config.print_all();
        return Ok(());
    };
    let value = value.join(" ");
    config.set_value(key, &value)?;
    config.save()?;
    println!("✅ Set {key} to: {value}");
    Ok(())
}

fn unset_config(key: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    config.unset_value(key)?;
    config.save()?;
    println!("✅ Unset {key}");
    Ok(())
}

fn store_token(token: Option<String>) -> Result<(), Box<dyn Error>> {
    let token = match token {
        Some(token) => token,
        None => {
            print!("Enter your API token: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };
    let token = token.trim();
    if token.is_empty() {
        return Err("no token given".into());
    }
    keyring::store_token(token)?;
    println!("✅ Token stored in the system keyring");
    Ok(())
}

#[cfg(test)]
mod tests;
