//! Line-oriented session loop.
//!
//! The loop owns the only `&mut Session` while it runs: it renders the
//! prompt, waits for one line, dispatches it, and only then reads the next.
//! A message line keeps the loop suspended until the model call settles.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::commands::{process_input, CommandResult};
use crate::core::session::Session;
use crate::utils::input::sanitize_text_input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    EndOfInput,
}

/// Drive `session` from `input` until `quit` or end of input.
///
/// Only console I/O errors end the loop early; every session error is
/// reported on `output` and the loop keeps going.
pub async fn run_chat<R, W>(
    session: &mut Session,
    mut input: R,
    output: &mut W,
) -> std::io::Result<ExitReason>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut raw = Vec::new();
    loop {
        flush_outbox(session, output).await?;
        output.write_all(session.prompt().as_bytes()).await?;
        output.flush().await?;

        raw.clear();
        if input.read_until(b'\n', &mut raw).await? == 0 {
            output.write_all(b"\nExiting the program.\n").await?;
            session.log_notice("Chat session ended (end of input)");
            flush_outbox(session, output).await?;
            tracing::info!("Console input closed");
            return Ok(ExitReason::EndOfInput);
        }

        // Invalid UTF-8 is replaced rather than treated as a console failure.
        let line = sanitize_text_input(&String::from_utf8_lossy(&raw));
        if line.trim().is_empty() {
            continue;
        }

        match process_input(session, &line) {
            CommandResult::Continue => {}
            CommandResult::Quit => {
                flush_outbox(session, output).await?;
                tracing::info!("Quit requested");
                return Ok(ExitReason::Quit);
            }
            CommandResult::ProcessAsMessage(text) => {
                if let Err(err) = session.send_message(&text).await {
                    session.emit(format!("❌ Error: {err}"));
                }
            }
        }
    }
}

async fn flush_outbox<W>(session: &mut Session, output: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for line in session.take_output() {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    output.flush().await
}
