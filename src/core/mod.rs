pub mod config;
pub mod keyring;
pub mod message;
pub mod session;
pub mod store;
pub mod token;
