//! # Contact Form Validation
//!
//! File: cli/src/commands/srv/contact.rs
//!
//! ## Overview
//!
//! Validates submissions to `POST /api/contact`. Each field is checked on its
//! trimmed value; lengths count characters, not bytes. Every failing field is
//! reported, in form order:
//!
//! | field     | rule                 |
//! |-----------|----------------------|
//! | `name`    | at least 2 chars     |
//! | `email`   | `local@domain.tld`   |
//! | `subject` | at least 3 chars     |
//! | `message` | at least 10 chars    |
//!
//! Missing fields deserialize as empty strings, so they fail their length or
//! format check instead of being rejected as malformed JSON.
//!
use crate::core::error::FolioError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{error, warn};

const MIN_NAME_CHARS: usize = 2;
const MIN_SUBJECT_CHARS: usize = 3;
const MIN_MESSAGE_CHARS: usize = 10;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// One failing field, as reported in the 400 response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl From<FieldError> for FolioError {
    fn from(err: FieldError) -> Self {
        FolioError::Validation {
            field: err.field.to_string(),
            message: err.message,
        }
    }
}

static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// Compiles an email pattern, logging at `error` when it is invalid. Every
/// address is then rejected, so the log line is the only trace.
fn compile_email_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            error!("Email pattern '{}' failed to compile: {}", pattern, e);
            None
        }
    }
}

fn email_regex() -> Option<&'static Regex> {
    EMAIL_REGEX
        .get_or_init(|| compile_email_pattern(EMAIL_PATTERN))
        .as_ref()
}

pub fn is_valid_email(email: &str) -> bool {
    match email_regex() {
        Some(re) => re.is_match(email.trim()),
        None => {
            warn!("No email pattern available; rejecting '{}'.", email.trim());
            false
        }
    }
}

fn min_chars(field: &'static str, label: &str, value: &str, min: usize) -> Option<FieldError> {
    if value.trim().chars().count() < min {
        Some(FieldError {
            field,
            message: format!("{} must be at least {} characters", label, min),
        })
    } else {
        None
    }
}

impl ContactForm {
    /// Returns every failing field. An empty vector means the form is valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let email = if is_valid_email(&self.email) {
            None
        } else {
            Some(FieldError {
                field: "email",
                message: "Please enter a valid email address".to_string(),
            })
        };

        [
            min_chars("name", "Name", &self.name, MIN_NAME_CHARS),
            email,
            min_chars("subject", "Subject", &self.subject, MIN_SUBJECT_CHARS),
            min_chars("message", "Message", &self.message, MIN_MESSAGE_CHARS),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: "Hello".into(),
            message: "I enjoyed your portfolio.".into(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_empty());
    }

    #[test]
    fn test_each_field_checked() {
        let cases = [
            ("name", ContactForm { name: "A".into(), ..valid_form() }),
            ("email", ContactForm { email: "not-an-email".into(), ..valid_form() }),
            ("subject", ContactForm { subject: "Hi".into(), ..valid_form() }),
            ("message", ContactForm { message: "Too short".into(), ..valid_form() }),
        ];
        for (field, form) in cases {
            let errors = form.validate();
            assert_eq!(errors.len(), 1, "expected one error for {}", field);
            assert_eq!(errors[0].field, field);
        }
    }

    #[test]
    fn test_errors_in_field_order() {
        let errors = ContactForm::default().validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "subject", "message"]);
        assert_eq!(errors[0].message, "Name must be at least 2 characters");
        assert_eq!(errors[1].message, "Please enter a valid email address");
    }

    #[test]
    fn test_lengths_count_trimmed_characters() {
        let padded = ContactForm { name: "  A  ".into(), ..valid_form() };
        assert_eq!(padded.validate()[0].field, "name");

        let unicode = ContactForm { name: "李明".into(), ..valid_form() };
        assert!(unicode.validate().is_empty());
    }

    #[test]
    fn test_email_pattern_compiles() {
        assert!(email_regex().is_some());
    }

    #[test]
    fn test_invalid_email_pattern_yields_none() {
        assert!(compile_email_pattern("[unclosed").is_none());
        assert!(compile_email_pattern(EMAIL_PATTERN).is_some());
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("someone@mail.co.in"));
        assert!(is_valid_email("  spaced@example.org "));
        assert!(!is_valid_email("missing-at.example.com"));
        assert!(!is_valid_email("no@tld"));
        assert!(!is_valid_email("two words@example.com"));
    }

    #[test]
    fn test_field_error_converts_to_folio_error() {
        let err: FolioError = FieldError {
            field: "email",
            message: "Please enter a valid email address".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Validation error on 'email': Please enter a valid email address"
        );
    }
}
