//! Console surface
//!
//! Reads one line per turn, hands it to the router and prints the reply.
//! A turn always runs to completion before the next line is read.
//!
//! Stdin is read on a plain OS thread feeding a channel: a blocking read
//! cannot be cancelled, and the runtime must not wait for it on shutdown.

use std::borrow::Cow;
use std::future::Future;
use std::io::BufRead;
use std::thread;

use tokio::io::{self, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::config::prompts;
use crate::core::{TurnOutcome, TurnRouter};

const PROMPT: &str = "You: ";
const REPLY_PREFIX: &str = "Bot: ";
const INPUT_BUFFER: usize = 16;

/// Lines read from the console; the channel closes at end of input.
pub type InputLines = mpsc::Receiver<io::Result<String>>;

/// How a console session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed an exit keyword.
    Exit,
    /// Ctrl+C while waiting for input.
    Interrupted,
    /// The input stream reached end of file.
    InputClosed,
}

/// Start the stdin reader thread. It is never joined; process exit ends it.
pub fn spawn_stdin_reader() -> io::Result<InputLines> {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || forward_lines(std::io::stdin().lock(), tx))?;
    Ok(rx)
}

/// Forward every line of `reader` until end of input or until the receiver is gone.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the session.
fn forward_lines<R: BufRead>(mut reader: R, tx: mpsc::Sender<io::Result<String>>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }

                let line = String::from_utf8_lossy(&buf);
                if matches!(line, Cow::Owned(_)) {
                    tracing::warn!(bytes = buf.len(), "console input was not valid UTF-8, decoded lossily");
                }

                if tx.blocking_send(Ok(line.into_owned())).is_err() {
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        }
    }
}

/// Run the read/answer loop until the session ends.
///
/// `interrupt` resolves when the user presses Ctrl+C; it is only observed
/// while waiting for input, never in the middle of a turn.
pub async fn run<W, F>(
    router: &mut TurnRouter,
    mut input: InputLines,
    output: &mut W,
    interrupt: F,
) -> io::Result<SessionEnd>
where
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let line = tokio::select! {
            biased;
            _ = &mut interrupt => {
                output.write_all(b"\n[Interrupted by user]\n").await?;
                output.flush().await?;
                router.end_session(prompts::SESSION_INTERRUPTED);
                return Ok(SessionEnd::Interrupted);
            }
            line = input.recv() => line,
        };

        let line = match line {
            Some(Ok(line)) => line,
            None => {
                output.write_all(b"\n").await?;
                router.end_session(prompts::INPUT_CLOSED);
                return Ok(SessionEnd::InputClosed);
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "failed to read console input");
                router.end_session(prompts::INPUT_CLOSED);
                return Err(e);
            }
        };

        match router.handle_turn(&line).await {
            TurnOutcome::Ignored => continue,
            TurnOutcome::Reply(turn) => {
                output
                    .write_all(format!("{REPLY_PREFIX}{}\n", turn.reply).as_bytes())
                    .await?;
            }
            TurnOutcome::Exit { farewell } => {
                output
                    .write_all(format!("{REPLY_PREFIX}{farewell}\n").as_bytes())
                    .await?;
                output.flush().await?;
                return Ok(SessionEnd::Exit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::pending;
    use std::io::Cursor;
    use std::time::Duration;

    use chrono::Local;
    use tempfile::TempDir;

    use crate::conversation::Role;
    use crate::core::read_log;
    use crate::core::SessionLogger;
    use crate::knowledge::{FaqEntry, KnowledgeStore};
    use crate::providers::testing::ScriptedProvider;
    use crate::providers::Usage;

    fn router(dir: &TempDir, provider: ScriptedProvider) -> (TurnRouter, std::path::PathBuf) {
        let log = SessionLogger::open(dir.path(), Local::now()).unwrap();
        let path = log.path().to_path_buf();
        let store = KnowledgeStore::new(
            vec![FaqEntry::new("Do you have a store?", "Online only.")],
            vec![],
        );
        (
            TurnRouter::new(store, Box::new(provider), log, "sys", None),
            path,
        )
    }

    /// Feed `data` through the same reader thread stdin uses.
    fn lines_from(data: &[u8]) -> InputLines {
        let (tx, rx) = mpsc::channel(INPUT_BUFFER);
        let reader = Cursor::new(data.to_vec());
        thread::spawn(move || forward_lines(reader, tx));
        rx
    }

    #[test]
    fn test_forward_lines_strips_endings_and_replaces_bad_bytes() {
        let (tx, mut rx) = mpsc::channel(INPUT_BUFFER);
        forward_lines(Cursor::new(b"hello\r\n\xff\xfe\nlast".to_vec()), tx);

        assert_eq!(rx.blocking_recv().unwrap().unwrap(), "hello");
        assert_eq!(rx.blocking_recv().unwrap().unwrap(), "\u{FFFD}\u{FFFD}");
        assert_eq!(rx.blocking_recv().unwrap().unwrap(), "last");
        assert!(rx.blocking_recv().is_none());
    }

    #[tokio::test]
    async fn test_conversation_until_exit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut router, path) = router(
            &dir,
            ScriptedProvider::new(vec![ScriptedProvider::text("Hello there.", Usage::default())]),
        );

        let input = lines_from(b"do you have a store?\n\n   \nhi\nexit\nnever read\n");
        let mut output = Vec::new();
        let end = run(&mut router, input, &mut output, pending()).await.unwrap();
        router.close();

        assert_eq!(end, SessionEnd::Exit);
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Bot: Online only.\n"));
        assert!(printed.contains("Bot: Hello there.\n"));
        assert!(printed.ends_with("Bot: Goodbye!\n"));
        assert!(!printed.contains("never read"));

        let roles: Vec<Role> = read_log(&path).unwrap().iter().map(|r| r.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::System,
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_session() {
        let dir = tempfile::tempdir().unwrap();
        let (mut router, path) = router(
            &dir,
            ScriptedProvider::new(vec![ScriptedProvider::text("Could you rephrase?", Usage::default())]),
        );

        let input = lines_from(b"\xff\xfe\n/order 1\nexit\n");
        let mut output = Vec::new();
        let end = run(&mut router, input, &mut output, pending()).await.unwrap();
        router.close();

        assert_eq!(end, SessionEnd::Exit);
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Bot: Could you rephrase?\n"));
        assert!(printed.contains("Order 1 was not found"));
        assert!(printed.ends_with("Bot: Goodbye!\n"));

        let records = read_log(&path).unwrap();
        assert_eq!(records.len(), 1 + 2 * 2 + 1);
        assert_eq!(records[1].content, "\u{FFFD}\u{FFFD}");
        assert_eq!(records.last().unwrap().content, prompts::SESSION_ENDED);
    }

    #[tokio::test]
    async fn test_end_of_input_logs_notice() {
        let dir = tempfile::tempdir().unwrap();
        let (mut router, path) = router(&dir, ScriptedProvider::silent());

        let input = lines_from(b"/order 1\n");
        let mut output = Vec::new();
        let end = run(&mut router, input, &mut output, pending()).await.unwrap();
        router.close();

        assert_eq!(end, SessionEnd::InputClosed);
        let records = read_log(&path).unwrap();
        let last = records.last().unwrap();
        assert_eq!(last.role, Role::System);
        assert_eq!(last.content, prompts::INPUT_CLOSED);
    }

    #[tokio::test]
    async fn test_interrupt_while_input_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (mut router, path) = router(&dir, ScriptedProvider::silent());

        // The sender stays alive, so input never yields and never closes.
        let (_tx, input) = mpsc::channel::<io::Result<String>>(INPUT_BUFFER);
        let mut output = Vec::new();
        let interrupt = tokio::time::sleep(Duration::from_millis(50));

        let end = tokio::time::timeout(
            Duration::from_secs(5),
            run(&mut router, input, &mut output, interrupt),
        )
        .await
        .expect("session must end on interrupt")
        .unwrap();
        router.close();

        assert_eq!(end, SessionEnd::Interrupted);
        assert!(String::from_utf8(output).unwrap().contains("[Interrupted by user]"));

        let records = read_log(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].role, Role::System);
        assert_eq!(records[1].content, prompts::SESSION_INTERRUPTED);
    }

    #[tokio::test]
    async fn test_interrupt_wins_over_pending_input() {
        let dir = tempfile::tempdir().unwrap();
        let (mut router, path) = router(&dir, ScriptedProvider::silent());

        let input = lines_from(b"exit\n");
        let mut output = Vec::new();
        let end = run(&mut router, input, &mut output, async {}).await.unwrap();
        router.close();

        assert_eq!(end, SessionEnd::Interrupted);
        let records = read_log(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].content, prompts::SESSION_INTERRUPTED);
    }
}
