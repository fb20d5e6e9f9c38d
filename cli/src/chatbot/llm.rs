//! # LLM Relay
//!
//! File: cli/src/chatbot/llm.rs
//!
//! ## Overview
//!
//! Optional chat-completions client (OpenAI-compatible wire format,
//! Perplexity by default). The system prompt is a persona plus the owner's
//! profile rendered from the knowledge base, so the model answers from the
//! same data as the rule matcher.
//!
//! Errors from this module never reach end users: `ChatService` logs them
//! and answers with the rule matcher instead.
//!
use super::knowledge::KnowledgeBase;
use crate::core::config::LlmConfig;
use crate::core::error::{FolioError, Result};
use crate::core::templating::{self, TemplateSet};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const PERSONA_TEMPLATE_NAME: &str = "persona";

const PERSONA_TEMPLATE: &str = r#"You are {{ name }}'s AI assistant on his portfolio website. Your role is to answer questions about {{ full_name }} based on the following information. DO NOT make up information that is not included in this data.

About {{ full_name }}:
- Competitive programming: {{ codechef }}

Education:
- {{ education.college }}
- {{ education.high_school }}
- {{ education.secondary }}
- {{ education.drop_year }}

Technical Skills:
- Programming: {{ skills.programming | join(sep=", ") }}
- Cybersecurity: {{ skills.cybersecurity | join(sep=", ") }}
- Cloud: {{ skills.cloud | join(sep=", ") }}
- DevOps: {{ skills.devops | join(sep=", ") }}

Certifications:{% for cert in certifications %}
- {{ cert }}{% endfor %}

Location:
- Currently based in {{ location.current }}
- Hometown is {{ location.hometown }}

Volunteering:{% for item in activities.volunteer %}
- {{ item }}{% endfor %}

Personal Interests:
- Hobbies: {{ interests.hobbies | join(sep=", ") }}
- Favorite singers: {{ interests.music.indian | join(sep=", ") }}
- Bengali singers: {{ interests.music.bengali | join(sep=", ") }}
- Western artists: {{ interests.music.western | join(sep=", ") }}
- Favorite directors: {{ interests.movies.directors | join(sep=", ") }}
- Favorite actors: {{ interests.movies.bollywood | join(sep=", ") }} (Bollywood), {{ interests.movies.bengali | join(sep=", ") }} (Bengali)
- Also enjoys: {{ interests.movies.other | join(sep=", ") }}

Important guidelines:
1. Only answer questions about {{ name }} and the information provided above.
2. If asked questions outside of this scope, politely decline and redirect to topics about {{ name }}.
3. Keep answers concise (50-100 words).
4. Be conversational and friendly.
5. If you don't have enough information to answer a question, say "I don't have that specific information about {{ name }}."
6. If someone asks for contact details, direct them to use the contact form on the website.
7. Do not provide any personal identification information beyond what's in the info above.
8. Avoid political topics or controversial statements."#;

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Serialize, Debug)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: String,
}

/// Renders the system prompt for `knowledge`.
pub fn persona_prompt(knowledge: &KnowledgeBase) -> Result<String> {
    let mut templates = TemplateSet::new();
    templates.add(PERSONA_TEMPLATE_NAME, PERSONA_TEMPLATE)?;
    let context = templating::context_from(knowledge)?;
    templates.render(PERSONA_TEMPLATE_NAME, &context)
}

/// Client for one configured chat-completions endpoint.
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
    api_key: String,
    system_prompt: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig, api_key: String, knowledge: &KnowledgeBase) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for the LLM relay")?;
        let system_prompt = persona_prompt(knowledge).context("Failed to render persona prompt")?;
        Ok(Self {
            http,
            config,
            api_key,
            system_prompt,
        })
    }

    /// Builds a client when the relay is enabled and its API key is set in
    /// the environment. Returns `Ok(None)` otherwise.
    pub fn from_config(config: &LlmConfig, knowledge: &KnowledgeBase) -> Result<Option<Self>> {
        if !config.enabled {
            debug!("LLM relay disabled; answering with rules only.");
            return Ok(None);
        }
        match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                Self::new(config.clone(), key, knowledge).map(Some)
            }
            _ => {
                warn!(
                    "LLM relay enabled but {} is not set; answering with rules only.",
                    config.api_key_env
                );
                Ok(None)
            }
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body<'a>(&'a self, message: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.config.model,
            messages: [
                Message {
                    role: "system",
                    content: &self.system_prompt,
                },
                Message {
                    role: "user",
                    content: message,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
            stream: false,
            presence_penalty: self.config.presence_penalty,
            frequency_penalty: self.config.frequency_penalty,
        }
    }

    /// Sends `message` and returns the first choice's content.
    pub async fn ask(&self, message: &str) -> Result<String> {
        debug!(
            "Sending {} chars to {} ({})",
            message.len(),
            self.config.endpoint,
            self.config.model
        );
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(message))
            .send()
            .await
            .map_err(|e| anyhow!(FolioError::Llm(format!("request failed: {}", e))))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(FolioError::Llm(format!(
                "API returned {}: {}",
                status, body
            ))));
        }

        let payload: CompletionResponse = response
            .json()
            .await
            .map_err(|e| anyhow!(FolioError::Llm(format!("invalid response body: {}", e))))?;
        extract_content(payload)
    }
}

fn extract_content(payload: CompletionResponse) -> Result<String> {
    payload
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| anyhow!(FolioError::Llm("response contained no choices".to_string())))
}
