//! # Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! ## Overview
//!
//! `folio ask <message...>` prints the rule matcher's reply to one message.
//! It never calls the LLM relay, so its output depends only on the knowledge
//! base. With `--explain` the matched intent is written to stderr first.
//!
//! ## Examples
//!
//! ```bash
//! folio ask what certifications does he have
//! folio ask --explain "tell me about your cybersecurity skills"
//! ```
//!
use crate::chatbot;
use crate::core::config::Config;
use crate::core::error::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    pub message: Vec<String>,

    /// Print the matched intent (topic key, `blocked` or `fallback`) to stderr.
    #[arg(long)]
    pub explain: bool,
}

pub async fn handle_ask(args: AskArgs, config: &Config) -> Result<()> {
    let matcher = chatbot::load_matcher(config)?;
    let message = args.message.join(" ");

    if args.explain {
        eprintln!("intent: {}", matcher.detect(&message));
    }
    println!("{}", matcher.classify(&message));
    Ok(())
}
