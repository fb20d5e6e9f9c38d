//! # folio Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout folio. Domain failures
//! are named by `FolioError`; everything is propagated as `anyhow::Result` so
//! call sites can attach context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `FolioError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration and filesystem errors
//! - Knowledge base loading and validation
//! - Pattern compilation (`regex`) and reply rendering (`tera`)
//! - The optional LLM relay
//! - Contact form validation
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.exists() {
//!     return Err(FolioError::KnowledgeBase(format!("File not found: {}", path.display())))?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
//! ```
//!
//! Errors never reach chat users: `IntentMatcher::classify` is infallible and
//! the chat service falls back to the rule matcher when the LLM relay fails.
//!
use thiserror::Error;

/// Custom error type for folio.
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Invalid topic pattern: {source}")]
    Pattern {
        #[from]
        source: regex::Error,
    },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("LLM relay error: {0}")]
    Llm(String),

    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
