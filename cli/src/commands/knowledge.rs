//! # Knowledge Base Commands
//!
//! File: cli/src/commands/knowledge.rs
//!
//! ## Overview
//!
//! `folio kb` inspects what the chatbot knows and how it routes questions:
//!
//! - `folio kb show`: the effective knowledge base as TOML, suitable as a
//!   starting point for a custom `knowledge.file`
//! - `folio kb rules`: the blocked-topic guard and topic rules in evaluation
//!   order, with their patterns
//! - `folio kb prompt`: the system prompt the LLM relay sends
//!
use crate::chatbot::{self, llm, matcher::IntentMatcher, rules::FALLBACK_TOPIC};
use crate::core::config::Config;
use crate::core::error::Result;
use clap::{Args, Subcommand};
use std::fmt::Write;

#[derive(Args, Debug)]
pub struct KbArgs {
    #[command(subcommand)]
    command: KbCommand,
}

#[derive(Subcommand, Debug)]
enum KbCommand {
    /// Print the effective knowledge base as TOML.
    Show,
    /// List the topic rules in evaluation order.
    Rules,
    /// Print the LLM relay's system prompt.
    Prompt,
}

pub async fn handle_kb(args: KbArgs, config: &Config) -> Result<()> {
    let matcher = chatbot::load_matcher(config)?;
    match args.command {
        KbCommand::Show => print!("{}", matcher.knowledge().to_toml()?),
        KbCommand::Rules => print!("{}", format_rules(&matcher)),
        KbCommand::Prompt => println!("{}", llm::persona_prompt(matcher.knowledge())?),
    }
    Ok(())
}

/// One line per rule: position, topic key, pattern. The guard is position 0
/// and the fallback, which has no pattern, comes last.
fn format_rules(matcher: &IntentMatcher) -> String {
    let mut out = String::new();
    let patterns = matcher.patterns();
    let width = patterns
        .iter()
        .map(|(topic, _)| topic.len())
        .max()
        .unwrap_or(0)
        .max(FALLBACK_TOPIC.len());

    for (i, (topic, pattern)) in patterns.iter().enumerate() {
        let _ = writeln!(out, "{:>2}  {:<width$}  {}", i, topic, pattern, width = width);
    }
    let _ = writeln!(out, "{:>2}  {:<width$}  (anything else)", "-", FALLBACK_TOPIC, width = width);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::knowledge::KnowledgeBase;
    use std::sync::Arc;

    #[test]
    fn test_format_rules_order() {
        let matcher = IntentMatcher::new(Arc::new(KnowledgeBase::default())).unwrap();
        let listing = format_rules(&matcher);
        let topics: Vec<&str> = listing
            .lines()
            .map(|line| line.split_whitespace().nth(1).unwrap())
            .collect();
        assert_eq!(topics.first(), Some(&"blocked"));
        assert_eq!(topics[1], "greeting");
        assert_eq!(topics[12], "codechef");
        assert_eq!(topics.last(), Some(&"fallback"));
        assert_eq!(topics.len(), 17);
        assert!(listing.contains("(education|college|university"));
    }
}
