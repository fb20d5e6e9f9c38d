//! # folio Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure shared by the chatbot and
//! the command handlers.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//! - `templating`: Tera template registry used to render chatbot replies
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{FolioError, Result}; // For error handling
//! use crate::core::templating::TemplateSet; // For rendering replies
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
