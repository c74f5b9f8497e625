use std::time::Duration;

use crate::commands::AccessTier;
use crate::core::config::data::Config;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_SYSTEM_DIRECTIVE: &str = "You are an AI assistant that values your tokens.";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Keys accepted by `oai set` / `oai unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "model",
    "system-directive",
    "persona",
    "access-tier",
    "base-url",
    "listen",
    "request-timeout",
];

impl Config {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn system_directive(&self) -> &str {
        self.system_directive
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_DIRECTIVE)
    }

    pub fn access_tier(&self) -> AccessTier {
        self.access_tier.unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn listen(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Set a config value by its CLI key name.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {key}"));
        }
        match key {
            "model" => self.model = Some(value.to_string()),
            "system-directive" => self.system_directive = Some(value.to_string()),
            "persona" => self.persona = Some(value.to_string()),
            "access-tier" => self.access_tier = Some(value.parse()?),
            "base-url" => self.base_url = Some(value.to_string()),
            "listen" => self.listen = Some(value.to_string()),
            "request-timeout" => {
                let secs = value.parse::<u64>().map_err(|_| {
                    format!("request-timeout must be a number of seconds, got '{value}'")
                })?;
                self.request_timeout_secs = Some(secs);
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        match key {
            "model" => self.model = None,
            "system-directive" => self.system_directive = None,
            "persona" => self.persona = None,
            "access-tier" => self.access_tier = None,
            "base-url" => self.base_url = None,
            "listen" => self.listen = None,
            "request-timeout" => self.request_timeout_secs = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {key} (expected one of: {})",
        CONFIG_KEYS.join(", ")
    )
}
