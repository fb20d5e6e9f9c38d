//! # Chat Service
//!
//! File: cli/src/chatbot/service.rs
//!
//! ## Overview
//!
//! Chooses the backend for each chat message:
//!
//! 1. Blocked topics are refused by the rule matcher, whatever the backend.
//! 2. With the LLM relay configured, the model answers.
//! 3. If the relay is absent, fails, or answers with nothing, the rule
//!    matcher answers.
//!
//! `ChatService::reply` therefore always produces a non-empty answer.
//!
use super::knowledge;
use super::llm::LlmClient;
use super::matcher::IntentMatcher;
use crate::core::config::Config;
use crate::core::error::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Backend that produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Rules,
    Llm,
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplySource::Rules => write!(f, "rules"),
            ReplySource::Llm => write!(f, "llm"),
        }
    }
}

/// One answer with the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
}

impl ChatReply {
    fn rules(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source: ReplySource::Rules,
        }
    }
}

/// # Chat Service (`ChatService`)
///
/// Shared by the HTTP handlers and the `chat` REPL. Holds the rule matcher
/// and, when configured, the LLM relay.
pub struct ChatService {
    matcher: Arc<IntentMatcher>,
    llm: Option<LlmClient>,
}

impl ChatService {
    pub fn new(matcher: Arc<IntentMatcher>, llm: Option<LlmClient>) -> Self {
        Self { matcher, llm }
    }

    /// # Build From Config (`from_config`)
    ///
    /// Loads the knowledge base and builds the matcher over it. The LLM
    /// relay is added only when `[llm] enabled` is set and its key variable
    /// holds a key.
    ///
    /// ## Errors
    ///
    /// Fails if the knowledge file cannot be loaded, the rule table does not
    /// build against it, or the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let kb = Arc::new(knowledge::load_from_config(config)?);
        let matcher = Arc::new(IntentMatcher::new(Arc::clone(&kb))?);
        let llm = LlmClient::from_config(&config.llm, &kb)?;
        if let Some(client) = &llm {
            info!("LLM relay enabled with model '{}'", client.model());
        }
        Ok(Self::new(matcher, llm))
    }

    pub fn matcher(&self) -> &Arc<IntentMatcher> {
        &self.matcher
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_some()
    }

    /// # Reply (`reply`)
    ///
    /// Answers one message. Never fails.
    ///
    /// ## Process
    ///
    /// 1. Blocked messages get the refusal and never reach the relay.
    /// 2. With a relay, a non-empty model answer is returned as `Llm`.
    /// 3. Otherwise, or after a relay error, the rule matcher answers.
    pub async fn reply(&self, message: &str) -> ChatReply {
        // Guard
        if self.matcher.is_blocked(message) {
            return ChatReply::rules(self.matcher.classify(message));
        }
        // Relay, when configured
        if let Some(llm) = &self.llm {
            match llm.ask(message.trim()).await {
                Ok(text) if !text.trim().is_empty() => {
                    return ChatReply {
                        text,
                        source: ReplySource::Llm,
                    };
                }
                Ok(_) => warn!("LLM relay returned an empty answer; falling back to rules."),
                Err(e) => warn!("LLM relay failed: {:#}; falling back to rules.", e),
            }
        }
        // Rules fallback
        ChatReply::rules(self.matcher.classify(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::knowledge::KnowledgeBase;
    use crate::core::config::LlmConfig;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    fn rules_only() -> ChatService {
        let kb = Arc::new(KnowledgeBase::default());
        ChatService::new(Arc::new(IntentMatcher::new(kb).unwrap()), None)
    }

    /// Serves `router` on an ephemeral local port and returns its address.
    async fn spawn_mock(router: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn service_against(addr: SocketAddr) -> ChatService {
        let kb = Arc::new(KnowledgeBase::default());
        let config = LlmConfig {
            enabled: true,
            endpoint: format!("http://{}/chat/completions", addr),
            timeout_secs: 5,
            ..LlmConfig::default()
        };
        let llm = LlmClient::new(config, "test-key".into(), &kb).unwrap();
        ChatService::new(Arc::new(IntentMatcher::new(kb).unwrap()), Some(llm))
    }

    #[tokio::test]
    async fn test_rules_only_reply() {
        let service = rules_only();
        assert!(!service.llm_enabled());
        let reply = service.reply("EDUCATION").await;
        assert_eq!(reply.source, ReplySource::Rules);
        assert_eq!(reply.text, service.matcher().classify("education"));
    }

    #[tokio::test]
    async fn test_llm_answer_used() {
        let router = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<serde_json::Value>| async move {
                let question = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
                Json(serde_json::json!({
                    "choices": [{ "message": { "role": "assistant", "content": format!("LLM says: {}", question) } }]
                }))
            }),
        );
        let service = service_against(spawn_mock(router).await);

        let reply = service.reply("  what does he do for fun?  ").await;
        assert_eq!(reply.source, ReplySource::Llm);
        assert_eq!(reply.text, "LLM says: what does he do for fun?");
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_rules() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let service = service_against(spawn_mock(router).await);

        let reply = service.reply("hobbies").await;
        assert_eq!(reply.source, ReplySource::Rules);
        assert!(reply.text.starts_with("Outside of technology, Prajesh enjoys"));
    }

    #[tokio::test]
    async fn test_llm_empty_answer_falls_back_to_rules() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                Json(serde_json::json!({ "choices": [{ "message": { "content": "   " } }] }))
            }),
        );
        let service = service_against(spawn_mock(router).await);

        let reply = service.reply("asdkjh").await;
        assert_eq!(reply.source, ReplySource::Rules);
        assert!(reply.text.starts_with("I'm not sure I understand that question."));
    }

    #[tokio::test]
    async fn test_blocked_topic_never_reaches_llm() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(serde_json::json!({ "choices": [{ "message": { "content": "leaked" } }] })) }),
        );
        let service = service_against(spawn_mock(router).await);

        let reply = service.reply("tell me his home address").await;
        assert_eq!(reply.source, ReplySource::Rules);
        assert!(reply.text.starts_with("I'm Prajesh's portfolio assistant."));
    }

    #[test]
    fn test_reply_source_serializes_lowercase() {
        let reply = ChatReply::rules("hi");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["source"], "rules");
        assert_eq!(ReplySource::Llm.to_string(), "llm");
    }
}
