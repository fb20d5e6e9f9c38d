//! # Intent Matcher & Responder
//!
//! File: cli/src/chatbot/matcher.rs
//!
//! ## Overview
//!
//! Maps one free-text message to exactly one canned reply about the site
//! owner. Classification is keyword based and first-match-wins:
//!
//! 1. The blocked-topic guard runs first; a hit returns the refusal.
//! 2. Topic rules are tried in table order; the first hit answers.
//! 3. Nothing matched: the fallback redirect answers.
//!
//! Replies depend only on the knowledge base, never on the message text, so
//! every reply is rendered once in `IntentMatcher::with_rules`. Template or
//! pattern problems therefore surface at startup, and `classify` is a total,
//! infallible, allocation-free lookup that can be shared across threads
//! without locking.
//!
//! ## Examples
//!
//! ```rust
//! let matcher = IntentMatcher::new(Arc::new(KnowledgeBase::default()))?;
//! let reply = matcher.classify("What did you study?");
//! assert_eq!(matcher.detect("What did you study?"), Intent::Topic("education"));
//! ```
//!
use super::knowledge::KnowledgeBase;
use super::rules::{
    self, RuleSpec, BLOCKED_PATTERN, FALLBACK_TEMPLATE, FALLBACK_TOPIC, REFUSAL_TEMPLATE,
    REFUSAL_TEMPLATE_NAME, TOPIC_RULES,
};
use crate::core::error::{FolioError, Result};
use crate::core::templating::{self, TemplateSet};
use anyhow::{anyhow, Context};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Which rule answered a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The blocked-topic guard refused the message.
    Blocked,
    /// A topic rule matched; carries its topic key.
    Topic(&'static str),
    /// No topic rule matched.
    Fallback,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Blocked => write!(f, "blocked"),
            Intent::Topic(topic) => write!(f, "{}", topic),
            Intent::Fallback => write!(f, "{}", FALLBACK_TOPIC),
        }
    }
}

/// A topic rule with its compiled predicate and rendered reply.
struct TopicRule {
    topic: &'static str,
    pattern: Regex,
    reply: String,
}

/// Stateless classify-and-render step over an immutable knowledge base.
pub struct IntentMatcher {
    knowledge: Arc<KnowledgeBase>,
    guard: Regex,
    refusal: String,
    rules: Vec<TopicRule>,
    fallback: String,
}

impl IntentMatcher {
    /// Builds a matcher over the standard rule table.
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Result<Self> {
        Self::with_rules(knowledge, TOPIC_RULES)
    }

    /// # Build Matcher (`with_rules`)
    ///
    /// Builds a matcher over `table`, evaluated in slice order.
    ///
    /// ## Arguments
    ///
    /// * `knowledge`: The owner profile every reply is rendered from.
    /// * `table`: Topic rules in evaluation order.
    ///
    /// ## Process
    ///
    /// 1. Register the refusal, fallback and topic templates.
    /// 2. Build one rendering context from the knowledge base.
    /// 3. Compile each pattern and render its reply.
    /// 4. Compile the guard and render the refusal and fallback.
    ///
    /// ## Errors
    ///
    /// Fails if a rule uses a reserved key (`fallback`, `refusal`) or a
    /// pattern does not compile. Also fails if a template does not render
    /// against `knowledge`, for example when there are too few
    /// certifications for a positional lookup, or renders blank.
    pub fn with_rules(knowledge: Arc<KnowledgeBase>, table: &[RuleSpec]) -> Result<Self> {
        // Register templates
        let mut templates = TemplateSet::new();
        templates.add(REFUSAL_TEMPLATE_NAME, REFUSAL_TEMPLATE)?;
        templates.add(FALLBACK_TOPIC, FALLBACK_TEMPLATE)?;
        for row in table {
            if row.topic == FALLBACK_TOPIC || row.topic == REFUSAL_TEMPLATE_NAME {
                return Err(anyhow!(FolioError::Config(format!(
                    "Topic key '{}' is reserved",
                    row.topic
                ))));
            }
            templates.add(row.topic, row.template)?;
        }

        // Render every reply up front
        let context = templating::context_from(knowledge.as_ref())?;
        let render = |name: &str| -> Result<String> {
            let reply = templates
                .render(name, &context)
                .with_context(|| format!("Failed to prepare reply for topic '{}'", name))?;
            if reply.trim().is_empty() {
                return Err(anyhow!(FolioError::KnowledgeBase(format!(
                    "Reply for topic '{}' renders empty",
                    name
                ))));
            }
            Ok(reply)
        };

        // Compile patterns in table order
        let mut rules = Vec::with_capacity(table.len());
        for row in table {
            let pattern = rules::compile_pattern(row.pattern)
                .with_context(|| format!("Failed to compile pattern for topic '{}'", row.topic))?;
            rules.push(TopicRule {
                topic: row.topic,
                pattern,
                reply: render(row.topic)?,
            });
        }

        let matcher = Self {
            guard: rules::compile_pattern(BLOCKED_PATTERN)
                .context("Failed to compile blocked-topic pattern")?,
            refusal: render(REFUSAL_TEMPLATE_NAME)?,
            fallback: render(FALLBACK_TOPIC)?,
            rules,
            knowledge,
        };
        debug!(
            "Intent matcher ready with {} topic rules for '{}'",
            matcher.rules.len(),
            matcher.knowledge.full_name
        );
        Ok(matcher)
    }

    /// # Classify Message (`classify`)
    ///
    /// Returns the reply for `message`.
    ///
    /// ## Arguments
    ///
    /// * `message`: Raw visitor text. Surrounding whitespace is ignored.
    ///
    /// ## Returns
    ///
    /// * `&str`: The pre-rendered reply. Never empty.
    pub fn classify(&self, message: &str) -> &str {
        let (intent, reply) = self.resolve(message);
        debug!("Classified message ({} chars) as '{}'", message.len(), intent);
        reply
    }

    /// Returns which rule answers `message`, without the reply.
    pub fn detect(&self, message: &str) -> Intent {
        self.resolve(message).0
    }

    /// Whether the blocked-topic guard refuses `message`.
    pub fn is_blocked(&self, message: &str) -> bool {
        self.guard.is_match(message)
    }

    /// Guard first, then the first matching topic rule, then the fallback.
    fn resolve(&self, message: &str) -> (Intent, &str) {
        let message = message.trim();
        if self.guard.is_match(message) {
            return (Intent::Blocked, &self.refusal);
        }
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(message))
            .map(|rule| (Intent::Topic(rule.topic), rule.reply.as_str()))
            .unwrap_or((Intent::Fallback, &self.fallback))
    }

    /// `(topic, pattern)` pairs in evaluation order, guard first.
    pub fn patterns(&self) -> Vec<(&str, &str)> {
        std::iter::once(("blocked", self.guard.as_str()))
            .chain(self.rules.iter().map(|rule| (rule.topic, rule.pattern.as_str())))
            .collect()
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }
}
