//! Locating the API token.
//!
//! Sources are tried in order: `OPENAI_API_TOKEN`, `OPENAI_API_KEY`, the
//! `token` file under the config directory, then the system keyring.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::keyring::{self, KeyringAccessError};

pub const TOKEN_ENV_VARS: [&str; 2] = ["OPENAI_API_TOKEN", "OPENAI_API_KEY"];

#[derive(Debug)]
pub enum TokenError {
    NotFound,
    Read { path: PathBuf, source: io::Error },
    Keyring(KeyringAccessError),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::NotFound => write!(
                f,
                "no API token found; set OPENAI_API_TOKEN or run `oai auth`"
            ),
            TokenError::Read { path, source } => {
                write!(f, "failed to read token file {}: {}", path.display(), source)
            }
            TokenError::Keyring(err) => write!(f, "failed to read keyring: {err}"),
        }
    }
}

impl std::error::Error for TokenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TokenError::NotFound => None,
            TokenError::Read { source, .. } => Some(source),
            TokenError::Keyring(err) => Some(err),
        }
    }
}

/// Resolve the token from the process environment, `token_file`, or the keyring.
pub fn resolve_token(token_file: &Path) -> Result<String, TokenError> {
    resolve_with(|name| std::env::var(name).ok(), token_file, keyring::load_token)
}

fn resolve_with(
    env: impl Fn(&str) -> Option<String>,
    token_file: &Path,
    keyring: impl FnOnce() -> Result<Option<String>, KeyringAccessError>,
) -> Result<String, TokenError> {
    for name in TOKEN_ENV_VARS {
        if let Some(token) = env(name).as_deref().and_then(clean_token) {
            debug!(source = name, "using API token from environment");
            return Ok(token);
        }
    }

    if let Some(token) = read_token_file(token_file)? {
        debug!(path = %token_file.display(), "using API token from file");
        return Ok(token);
    }

    match keyring() {
        Ok(Some(token)) => clean_token(&token).ok_or(TokenError::NotFound),
        Ok(None) => Err(TokenError::NotFound),
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "keyring unavailable");
            Err(TokenError::NotFound)
        }
        Err(err) => Err(TokenError::Keyring(err)),
    }
}

fn read_token_file(path: &Path) -> Result<Option<String>, TokenError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(clean_token(&contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(TokenError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Strip surrounding whitespace and quotes; empty tokens count as absent.
fn clean_token(raw: &str) -> Option<String> {
    let token = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn no_keyring() -> Result<Option<String>, KeyringAccessError> {
        Ok(None)
    }

    #[test]
    fn environment_wins_in_declared_order() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("token");
        fs::write(&file, "from-file").unwrap();

        let env = env_from(&[("OPENAI_API_TOKEN", "primary"), ("OPENAI_API_KEY", "secondary")]);
        assert_eq!(resolve_with(env, &file, no_keyring).unwrap(), "primary");

        let env = env_from(&[("OPENAI_API_TOKEN", "  "), ("OPENAI_API_KEY", "secondary")]);
        assert_eq!(resolve_with(env, &file, no_keyring).unwrap(), "secondary");
    }

    #[test]
    fn token_file_is_trimmed_of_quotes_and_newlines() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("token");
        fs::write(&file, "\"sk-test\"\n").unwrap();

        let token = resolve_with(env_from(&[]), &file, no_keyring).unwrap();
        assert_eq!(token, "sk-test");
    }

    #[test]
    fn keyring_is_the_last_resort() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("missing");

        let token = resolve_with(env_from(&[]), &file, || Ok(Some("sk-keyring".into()))).unwrap();
        assert_eq!(token, "sk-keyring");

        let err = resolve_with(env_from(&[]), &file, no_keyring).unwrap_err();
        assert!(matches!(err, TokenError::NotFound));
        assert!(err.to_string().contains("oai auth"));
    }
}
