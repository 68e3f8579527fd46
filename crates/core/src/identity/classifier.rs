//! Author name cleanup and email classification.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::models::EmailType;

/// Stand-in for an empty or whitespace-only author name.
pub const NO_NAME: &str = "(no name)";

fn noreply_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)@users\.noreply\.github\.com$").expect("static regex"))
}

/// The email bucket that, together with the name, identifies an author.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmailClass {
    /// No email recorded.
    Missing,
    /// A GitHub-generated `@users.noreply.github.com` placeholder.
    Noreply,
    /// A real address, lowercased.
    NonNoreply(String),
}

impl EmailClass {
    /// Classify an already-trimmed email.
    pub fn classify(email: &str) -> Self {
        if email.is_empty() {
            EmailClass::Missing
        } else if is_noreply(email) {
            EmailClass::Noreply
        } else {
            EmailClass::NonNoreply(email.to_lowercase())
        }
    }

    pub fn email_type(&self) -> EmailType {
        match self {
            EmailClass::Missing => EmailType::Missing,
            EmailClass::Noreply => EmailType::Noreply,
            EmailClass::NonNoreply(_) => EmailType::NonNoreply,
        }
    }
}

/// Whether `email` is a provider placeholder address (case-insensitive).
pub fn is_noreply(email: &str) -> bool {
    noreply_re().is_match(email)
}

/// Aggregation key: trimmed author name plus email bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorIdentity {
    pub name: String,
    pub class: EmailClass,
}

impl AuthorIdentity {
    /// Build the key for a raw `(name, email)` pair.
    pub fn from_raw(name: &str, email: &str) -> Self {
        Self {
            name: clean_name(name),
            class: EmailClass::classify(email.trim()),
        }
    }
}

/// Trim surrounding whitespace; empty names become [`NO_NAME`].
pub fn clean_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        NO_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// First whitespace-separated word of a cleaned name. The [`NO_NAME`]
/// sentinel is returned as is.
pub fn first_name(name: &str) -> String {
    if name.is_empty() || name == NO_NAME {
        return name.to_string();
    }
    name.split_whitespace()
        .next()
        .unwrap_or(name)
        .to_string()
}
