use anyhow::Result;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

use crate::chat::format::format_content;
use crate::chat::{ChatBackend, ChatView, Turn};
use crate::cli::{PlainCommand, help_text, parse_command};

fn print_turn<W: Write>(out: &mut W, turn: &Turn) -> Result<()> {
    writeln!(out, "{}:", turn.role.label())?;
    for block in format_content(&turn.content) {
        writeln!(out, "  {block}")?;
    }
    out.flush()?;
    Ok(())
}

/// Line mode: every input line is a draft, sent and answered one at a time.
pub async fn run_plain<R, W>(
    backend: Arc<dyn ChatBackend>,
    input: R,
    out: &mut W,
) -> Result<ChatView>
where
    R: BufRead,
    W: Write,
{
    let mut view = ChatView::new();
    writeln!(out, "Connected to {} - /help for commands", backend.endpoint())?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Some(PlainCommand::Quit) => break,
            Some(PlainCommand::Help) => {
                writeln!(out, "{}", help_text())?;
                continue;
            }
            None => {}
        }

        view.set_draft(line);
        let Some(submission) = view.submit() else {
            continue;
        };
        if let Some(turn) = view.history().last() {
            print_turn(out, turn)?;
        }
        let outcome = backend.send_prompt(&submission.prompt).await;
        if let Some(turn) = view.settle(submission.id, outcome) {
            print_turn(out, turn)?;
        }
    }

    info!(turns = view.history().len(), "plain session ended");
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testing::ScriptedBackend;
    use crate::chat::{CONNECT_ERROR_MESSAGE, Role};
    use std::io::Cursor;

    #[tokio::test]
    async fn answers_each_line_and_skips_blanks() {
        let backend = Arc::new(ScriptedBackend::replying(&["*Aries\nis bold"]));
        let mut out = Vec::new();
        let input = Cursor::new("Hello\n   \n/quit\nignored\n");
        let view = run_plain(backend.clone(), input, &mut out).await.unwrap();

        assert_eq!(
            view.history().turns(),
            &[Turn::user("Hello"), Turn::ai("*Aries\nis bold")]
        );
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("You:\n  Hello\n"));
        assert!(printed.contains("AI:\n   Aries\n  is bold\n"));
        assert_eq!(*backend.prompts.lock().unwrap(), vec!["Hello".to_string()]);
    }

    #[tokio::test]
    async fn failure_prints_fixed_error_and_continues() {
        let backend = Arc::new(ScriptedBackend::failing());
        let mut out = Vec::new();
        let input = Cursor::new("Test\n/help\n");
        let view = run_plain(backend, input, &mut out).await.unwrap();

        assert_eq!(view.history().count_role(Role::Error), 1);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains(CONNECT_ERROR_MESSAGE));
        assert!(printed.contains("/quit  Quit"));
    }
}
