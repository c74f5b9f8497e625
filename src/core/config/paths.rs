use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::io::ConfigError;

/// Overrides the config root; used by scripts and tests.
pub const CONFIG_DIR_ENV: &str = "OAI_CONFIG_DIR";

/// On-disk layout under the config root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub personas: PathBuf,
    pub conversations: PathBuf,
    pub token: PathBuf,
}

impl Paths {
    /// Resolve the config root from `OAI_CONFIG_DIR` or the platform
    /// config directory.
    pub fn resolve() -> Result<Self, ConfigError> {
        if let Some(root) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::under(root));
        }
        let proj_dirs =
            ProjectDirs::from("org", "oai", "oai").ok_or(ConfigError::NoConfigDirectory)?;
        Ok(Self::under(proj_dirs.config_dir()))
    }

    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            config_file: root.join("config.toml"),
            personas: root.join("personas"),
            conversations: root.join("conversations"),
            token: root.join("token"),
            root,
        }
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [&self.root, &self.personas, &self.conversations] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn layout_is_rooted_under_the_config_dir() {
        let paths = Paths::under("/tmp/oai-test");
        assert_eq!(paths.config_file, PathBuf::from("/tmp/oai-test/config.toml"));
        assert_eq!(paths.personas, PathBuf::from("/tmp/oai-test/personas"));
        assert_eq!(
            paths.conversations,
            PathBuf::from("/tmp/oai-test/conversations")
        );
        assert_eq!(paths.token, PathBuf::from("/tmp/oai-test/token"));
    }

    #[test]
    fn ensure_dirs_creates_store_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let paths = Paths::under(temp_dir.path().join("nested"));
        paths.ensure_dirs().expect("Failed to create dirs");
        assert!(paths.personas.is_dir());
        assert!(paths.conversations.is_dir());
        // idempotent
        paths.ensure_dirs().expect("Failed to re-create dirs");
    }
}
