//! # API Handlers
//!
//! File: cli/src/commands/srv/handlers.rs
//!
//! ## Overview
//!
//! JSON endpoints mounted under `/api` by `server_logic::create_app`:
//!
//! - `POST /api/chat`: `{"message": "..."}` to `{"response": "...", "source": "rules"|"llm"}`
//! - `POST /api/contact`: validates a `ContactForm`, 200 or 400
//! - `GET /api/health`: `{"status": "ok"}`
//!
//! Chat never fails once the body parses: the service always has a rule
//! reply to fall back on.
//!
use super::contact::{ContactForm, FieldError};
use crate::chatbot::service::{ChatService, ReplySource};
use crate::core::error::FolioError;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

const CONTACT_THANKS: &str = "Thank you for your message. I'll get back to you soon!";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub source: ReplySource,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatResponse> {
    debug!("Chat request ({} chars)", req.message.chars().count());
    let reply = state.chat.reply(&req.message).await;
    Json(ChatResponse {
        response: reply.text,
        source: reply.source,
    })
}

pub async fn contact(Json(form): Json<ContactForm>) -> (StatusCode, Json<ContactResponse>) {
    let errors = form.validate();
    if !errors.is_empty() {
        for err in &errors {
            debug!("Rejected contact form: {}", FolioError::from(err.clone()));
        }
        return (
            StatusCode::BAD_REQUEST,
            Json(ContactResponse {
                success: false,
                message: "Validation error",
                errors,
            }),
        );
    }

    info!(
        sender = %form.name.trim(),
        email = %form.email.trim(),
        subject = %form.subject.trim(),
        message_len = form.message.trim().chars().count(),
        "Contact form submitted"
    );
    (
        StatusCode::OK,
        Json(ContactResponse {
            success: true,
            message: CONTACT_THANKS,
            errors: Vec::new(),
        }),
    )
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
