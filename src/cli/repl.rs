//! Line-oriented interactive chat loop.

use std::error::Error;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::sync::{Mutex, MutexGuard};

use ratatui::crossterm::style::Stylize;

use crate::commands::{ChatHost, CommandRegistry, CommandResult};
use crate::core::session::ChatSession;

/// Read lines from `input` until `/q` or EOF. Slash commands go to the
/// registry; everything else is sent to the model.
pub fn run<R: BufRead, W: Write>(
    session: &Mutex<ChatSession>,
    registry: &CommandRegistry,
    mut input: R,
    mut output: W,
) -> Result<(), Box<dyn Error>> {
    {
        let session = lock(session)?;
        let persona = match session.current_persona() {
            "" => "(none)",
            name => name,
        };
        writeln!(
            output,
            "Welcome to Chat with OpenAI\nModel: {}\nPersona: {}\nDirective: {}",
            session.model(),
            persona,
            session.directive()
        )?;
    }

    let mut line = String::new();
    loop {
        {
            let session = lock(session)?;
            write!(output, "{} > ", session.history().len())?;
        }
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        let text = line.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            continue;
        }

        let mut session = lock(session)?;
        match registry.execute(&mut *session, text) {
            CommandResult::NotACommand => match session.chat(text) {
                Ok(reply) => writeln!(output, "{reply}")?,
                Err(err) => print_error(&mut output, err)?,
            },
            CommandResult::Reply(response) if response.success => {
                if !response.message.is_empty() {
                    writeln!(output, "{}", response.message)?;
                }
            }
            CommandResult::Reply(response) => print_error(&mut output, response.text())?,
            CommandResult::Quit(response) => {
                writeln!(output, "{}", response.message)?;
                break;
            }
        }
    }
    Ok(())
}

fn lock(session: &Mutex<ChatSession>) -> Result<MutexGuard<'_, ChatSession>, Box<dyn Error>> {
    session
        .lock()
        .map_err(|_| "chat session is unavailable".into())
}

fn print_error<W: Write>(output: &mut W, err: impl Display) -> std::io::Result<()> {
    writeln!(output, "{}", format!("Error: {err}").red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::AccessTier;
    use crate::utils::test_utils::{create_test_session, ScriptedBackend};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(backend: ScriptedBackend, script: &str) -> (String, Mutex<ChatSession>) {
        let temp_dir = TempDir::new().unwrap();
        let session = Mutex::new(create_test_session(temp_dir.path(), backend));
        let registry = CommandRegistry::new(AccessTier::Beta);
        let mut output = Vec::new();
        run(&session, &registry, Cursor::new(script.to_string()), &mut output).unwrap();
        (String::from_utf8(output).unwrap(), session)
    }

    #[test]
    fn commands_and_chat_share_the_loop() {
        let backend = ScriptedBackend::new().reply("Hi there!");
        let seen = backend.seen();
        let (output, session) = run_script(backend, "/model set gpt-x\nhello\n/q\nnever sent\n");

        let banner = "Welcome to Chat with OpenAI\nModel: test-model\nPersona: (none)\n\
                      Directive: test directive\n";
        assert!(output.starts_with(banner));
        assert!(output.contains("1 > Model set to gpt-x\n"));
        assert!(output.contains("Hi there!\n"));
        assert!(output.contains("3 > Goodbye!\n"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "gpt-x");
        assert_eq!(session.lock().unwrap().history().len(), 3);
    }

    #[test]
    fn failures_are_reported_and_the_loop_continues() {
        let backend = ScriptedBackend::new().fail("upstream down");
        let (output, _) = run_script(backend, "/bogus\nhello\n/history clear\n");

        assert!(output.contains("Error: unknown command: /bogus (try /help)"));
        assert!(output.contains("Error: API request failed with status 500: upstream down"));
        assert!(output.contains("History cleared"));
    }

    #[test]
    fn indented_slash_lines_are_chat() {
        let backend = ScriptedBackend::new().reply("Sure.");
        let seen = backend.seen();
        let (output, session) = run_script(backend, " /model set gpt-x\n");

        assert!(output.contains("Sure.\n"));
        let session = session.lock().unwrap();
        assert_eq!(session.model(), "test-model");
        assert_eq!(session.history()[1].content, " /model set gpt-x");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn eof_ends_the_loop() {
        let (output, _) = run_script(ScriptedBackend::new(), "\n\n");
        assert!(output.ends_with("1 > \n"));
    }
}
