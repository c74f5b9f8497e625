use chrono::Local;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Plain-text transcript of the chat, appended as exchanges happen.
///
/// User lines are prefixed with `You:`; assistant replies are written as-is
/// with a blank line after each message, matching what the terminal shows.
pub struct LoggingState {
    file_path: Option<PathBuf>,
}

impl LoggingState {
    pub fn disabled() -> Self {
        Self { file_path: None }
    }

    /// Start logging to `path`, checking up front that it is writable.
    pub fn to_file(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.into();
        let logging = Self {
            file_path: Some(path),
        };
        logging.log_message(&format!(
            "## Logging started {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;
        Ok(logging)
    }

    pub fn log_exchange(
        &self,
        user: &str,
        assistant: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.log_message(&format!("You: {user}"))?;
        self.log_message(assistant)
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        // Write each line of content, preserving the exact formatting
        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn disabled_logging_writes_nothing() {
        let logging = LoggingState::disabled();
        logging.log_exchange("hi", "hello").unwrap();
    }

    #[test]
    fn exchanges_are_appended_with_spacing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat.log");
        let logging = LoggingState::to_file(&path).unwrap();

        logging.log_exchange("Hello", "Hi there!\nHow can I help?").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("## Logging started "));
        assert!(contents.contains("You: Hello\n\nHi there!\nHow can I help?\n\n"));
    }

    #[test]
    fn unwritable_path_fails_up_front() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing-dir").join("chat.log");
        assert!(LoggingState::to_file(path).is_err());
    }
}
