//! # Folio Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the `folio` CLI, the backend of a personal portfolio
//! site. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the layered configuration once
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each top-level command (`ask`, `chat`, `kb`, `srv`) is a variant of `Commands`
//! - Handlers live in `commands::*` and receive their args plus the `Config`
//! - All errors propagate here, are logged, and end the process with status 1
//!
//! ## Examples
//!
//! ```bash
//! folio ask where did he study
//! folio -v srv --site dist/public
//! folio --config ./portfolio.toml kb show
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod chatbot; // Knowledge base, rule matcher, LLM relay, chat service
mod commands; // Command handlers (ask, chat, kb, srv)
mod core; // Errors, configuration, templating

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    about = "💬 Folio: portfolio chatbot and site backend",
    long_about = "Answers visitor questions about the site owner from a knowledge base,\n\
                  relays contact messages, and serves the portfolio site.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Read configuration from this file only, instead of the user and project files.
    #[arg(long, global = true, value_name = "PATH", env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Answer one question with the rule matcher.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Start an interactive chat session.
    Chat(commands::chat::ChatArgs),
    /// Inspect the knowledge base and topic rules.
    Kb(commands::knowledge::KbArgs),
    /// Run the chat/contact API and serve the site.
    #[command(alias = "s")]
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result: anyhow::Result<()> = async move {
        let config = core::config::load_config(cli.config.as_deref())?;
        match cli.command {
            Commands::Ask(args) => commands::ask::handle_ask(args, &config).await,
            Commands::Chat(args) => commands::chat::handle_chat(args, &config).await,
            Commands::Kb(args) => commands::knowledge::handle_kb(args, &config).await,
            Commands::Srv(args) => commands::srv::handle_srv(args, &config).await,
        }
    }
    .await;

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
