//! oai is a line-oriented chat client for OpenAI-compatible APIs.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`commands`] owns the slash-command registry: the tiered command table,
//!   the dispatcher, and the JSON response envelope.
//! - [`core`] holds the chat session, configuration, persona and
//!   conversation stores, and credential lookup.
//! - [`api`] defines the chat, model and image payloads and the blocking
//!   backend client.
//! - [`server`] exposes commands and chat over HTTP.
//! - [`cli`] parses arguments and runs the interactive loop.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod server;
pub mod utils;
