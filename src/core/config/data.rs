use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::commands::AccessTier;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Chat model used when no `--model` flag is given
    pub model: Option<String>,
    /// System directive used when no persona is loaded at startup
    pub system_directive: Option<String>,
    /// Persona loaded at startup when it exists
    pub persona: Option<String>,
    /// Which slash commands are reachable ("legacy", "beta", "stable")
    pub access_tier: Option<AccessTier>,
    /// API base URL, e.g. "https://api.openai.com/v1"
    pub base_url: Option<String>,
    /// Address the HTTP server binds to
    pub listen: Option<String>,
    /// Per-request timeout for backend calls, in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths under the home directory to use ~ notation on Unix-like systems
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
