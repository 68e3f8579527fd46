//! Repository author audit core library.
//!
//! This crate provides the audit pipeline for GitHub repositories: URL
//! validation, bare history clones, author extraction, identity
//! classification and aggregation, report building, configuration, and the
//! outreach email dispatcher.

pub mod audit_engine;
pub mod config;
pub mod errors;
pub mod git;
pub mod identity;
pub mod models;
pub mod notify;
pub mod report;

// Re-exports for convenience.
pub use audit_engine::AuditEngine;
pub use config::AppConfig;
pub use git::RepositoryReference;
pub use models::{AuthorRow, EmailType, RepoAuditReport};
