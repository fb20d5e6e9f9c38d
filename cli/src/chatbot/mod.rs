//! # Profile Chatbot
//!
//! File: cli/src/chatbot/mod.rs
//!
//! ## Overview
//!
//! Answers visitor questions about the site owner.
//!
//! - `knowledge`: the immutable owner profile (`KnowledgeBase`)
//! - `rules`: the ordered topic table, blocked-topic guard and fallback
//! - `matcher`: first-match-wins classifier over the table (`IntentMatcher`)
//! - `llm`: optional chat-completions relay primed with the profile
//! - `service`: picks LLM or rules per message, falling back to rules
//!
pub mod knowledge;
pub mod llm;
pub mod matcher;
pub mod rules;
pub mod service;

use crate::core::config::Config;
use crate::core::error::Result;
use matcher::IntentMatcher;
use std::sync::Arc;

/// Builds the rule matcher over the configured knowledge base.
pub fn load_matcher(config: &Config) -> Result<IntentMatcher> {
    let kb = knowledge::load_from_config(config)?;
    IntentMatcher::new(Arc::new(kb))
}
