//! # folio Template System
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Chatbot replies and the LLM persona prompt are Tera templates rendered
//! against the knowledge base. This module wraps a `tera::Tera` registry so
//! the rest of the crate deals in `FolioError::Template` and `anyhow` context
//! instead of raw Tera errors.
//!
//! ## Architecture
//!
//! - `TemplateSet::add` compiles a named template (syntax errors surface here).
//! - `TemplateSet::render` renders one template against a prepared context.
//! - `context_from` serializes any `Serialize` value into a `tera::Context`.
//!
//! Autoescaping is switched off: replies are plain text, not HTML, and the
//! HTTP layer sends them as JSON strings.
//!
//! ## Examples
//!
//! ```rust
//! let mut templates = TemplateSet::new();
//! templates.add("hobbies", "Outside of technology, {{ name }} enjoys {{ interests.hobbies | join(sep=\" and \") }}.")?;
//! let context = templating::context_from(&knowledge)?;
//! let reply = templates.render("hobbies", &context)?;
//! ```
//!
use crate::core::error::{FolioError, Result};
use anyhow::anyhow;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

/// A registry of named plain-text templates.
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    /// Creates an empty registry with autoescaping disabled.
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Self { tera }
    }

    /// Compiles `source` and registers it under `name`, replacing any
    /// template already registered with that name.
    pub fn add(&mut self, name: &str, source: &str) -> Result<()> {
        self.tera.add_raw_template(name, source).map_err(|e| {
            anyhow!(FolioError::Template { source: e })
                .context(format!("Failed to compile template '{}'", name))
        })?;
        debug!("Registered template '{}'", name);
        Ok(())
    }

    /// Renders the template registered under `name`.
    pub fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera.render(name, context).map_err(|e| {
            anyhow!(FolioError::Template { source: e })
                .context(format!("Failed to render template '{}'", name))
        })
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a Tera context from any serializable value. Struct fields become
/// top-level template variables.
pub fn context_from<T: Serialize>(data: &T) -> Result<Context> {
    Context::from_serialize(data).map_err(|e| {
        anyhow!(FolioError::Template { source: e }).context("Failed to create Tera context")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        hobbies: Vec<String>,
        certs: Vec<String>,
    }

    fn sample() -> Sample {
        Sample {
            name: "Ada".into(),
            hobbies: vec!["Chess".into(), "Rowing".into()],
            certs: vec!["B".into(), "A".into(), "B".into()],
        }
    }

    #[test]
    fn test_render_join_preserves_order() -> Result<()> {
        let mut templates = TemplateSet::new();
        templates.add("hobbies", "{{ name }} enjoys {{ hobbies | join(sep=\" and \") }}.")?;
        let context = context_from(&sample())?;
        assert_eq!(
            templates.render("hobbies", &context)?,
            "Ada enjoys Chess and Rowing."
        );
        Ok(())
    }

    #[test]
    fn test_render_bullet_loop_keeps_duplicates() -> Result<()> {
        let mut templates = TemplateSet::new();
        templates.add("certs", "Certs:{% for c in certs %}\n- {{ c }}{% endfor %}")?;
        let context = context_from(&sample())?;
        assert_eq!(templates.render("certs", &context)?, "Certs:\n- B\n- A\n- B");
        Ok(())
    }

    #[test]
    fn test_no_html_escaping() -> Result<()> {
        let mut templates = TemplateSet::new();
        templates.add("raw", "{{ name }} & what's <up>")?;
        let context = context_from(&sample())?;
        assert_eq!(templates.render("raw", &context)?, "Ada & what's <up>");
        Ok(())
    }

    #[test]
    fn test_invalid_syntax_is_rejected() {
        let mut templates = TemplateSet::new();
        let result = templates.add("broken", "Hello {{ name");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to compile template 'broken'"));
    }

    #[test]
    fn test_missing_index_fails_to_render() -> Result<()> {
        let mut templates = TemplateSet::new();
        templates.add("indexed", "{{ certs.7 }}")?;
        let context = context_from(&sample())?;
        let result = templates.render("indexed", &context);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<FolioError>().is_some());
        Ok(())
    }
}
