//! # Folio Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Top-level command groups of the `folio` CLI. Each module defines its
//! clap arguments and an async handler taking those arguments and the
//! effective `Config`.
//!
//! ## Command Groups
//!
//! - `ask`: answer one question with the rule matcher
//! - `chat`: interactive chat session
//! - `knowledge`: inspect the knowledge base and rule table (`folio kb`)
//! - `srv`: run the HTTP backend
//!

/// One-shot rule-based answer. Subcommand `ask`.
pub mod ask;
/// Interactive read-eval-print chat loop. Subcommand `chat`.
pub mod chat;
/// Knowledge base and rule inspection. Subcommands `kb show`, `kb rules`.
pub mod knowledge;
/// Chat/contact API and static site server. Subcommand `srv`.
pub mod srv;
