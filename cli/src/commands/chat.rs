//! # Interactive Chat Command
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! `folio chat` is a read-eval-print loop over stdin. Each line goes through
//! the `ChatService`, so the LLM relay answers when configured and the rule
//! matcher otherwise. Typing `bye`, `exit` or `quit` (any case), or closing
//! stdin, ends the session.
//!
//! ## Examples
//!
//! ```bash
//! $ folio chat
//! Chat with Prajesh's assistant! Type 'bye' to quit.
//! You: where is he from?
//! Folio: Prajesh is currently in Vellore (for studies). His hometown is Kolkata, India.
//! You: bye
//! Folio: Goodbye!
//! ```
//!
use crate::chatbot::service::ChatService;
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const EXIT_WORDS: [&str; 3] = ["bye", "exit", "quit"];

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Show which backend (rules or llm) produced each answer.
    #[arg(long)]
    pub show_source: bool,
}

pub async fn handle_chat(args: ChatArgs, config: &Config) -> Result<()> {
    let service = ChatService::from_config(config)?;
    info!(
        "Starting chat session (LLM relay {}).",
        if service.llm_enabled() { "enabled" } else { "disabled" }
    );
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_session(&service, stdin, &mut stdout, args.show_source).await
}

fn is_exit(line: &str) -> bool {
    EXIT_WORDS.iter().any(|word| line.eq_ignore_ascii_case(word))
}

/// Runs the loop until an exit word or end of input. Generic over the streams
/// so tests can drive it with in-memory buffers.
pub async fn run_session<R, W>(
    service: &ChatService,
    input: R,
    out: &mut W,
    show_source: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let owner = service.matcher().knowledge().name.clone();
    writeln!(out, "Chat with {}'s assistant! Type 'bye' to quit.", owner)?;

    let mut lines = input.lines();
    loop {
        write!(out, "You: ")?;
        out.flush().context("Failed to flush output")?;

        let line = match lines.next_line().await.context("Failed to read input")? {
            Some(line) => line,
            None => {
                debug!("Input closed, ending chat session.");
                writeln!(out)?;
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_exit(trimmed) {
            writeln!(out, "Folio: Goodbye!")?;
            break;
        }

        let reply = service.reply(trimmed).await;
        if show_source {
            writeln!(out, "Folio [{}]: {}", reply.source, reply.text)?;
        } else {
            writeln!(out, "Folio: {}", reply.text)?;
        }
    }
    Ok(())
}
