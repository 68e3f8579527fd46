//! Error types for the author-audit core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from running the external `git` binary.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary was not found on `$PATH`.
    #[error("Required command not found: {0} (install it and retry)")]
    BinaryNotFound(String),

    /// A `git` command exited with a non-zero status.
    #[error("Command failed: {command}\n{output}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// Spawning or waiting on the child process failed.
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Audit errors
// ---------------------------------------------------------------------------

/// Errors from a single repository audit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Fetching or reading history with the external tool failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// The scratch directory for the clone could not be created.
    #[error("failed to create audit workspace: {0}")]
    Workspace(#[source] std::io::Error),
}

impl AuditError {
    /// Whether the failure came from the remote / external tool rather than
    /// from the local machine.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            AuditError::Git(GitError::BinaryNotFound(_) | GitError::CommandFailed { .. })
        )
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Mail errors
// ---------------------------------------------------------------------------

/// Errors from the outbound email dispatcher.
#[derive(Debug, Error)]
pub enum MailError {
    /// Required SMTP settings are absent.
    #[error("Missing SMTP configuration. Please set: {}", .0.join(", "))]
    MissingSettings(Vec<&'static str>),

    /// The request itself is incomplete (no subject, no recipients, ...).
    #[error("{0}")]
    InvalidRequest(String),

    /// The sender or a recipient address could not be parsed.
    #[error("invalid email address '{address}': {detail}")]
    InvalidAddress { address: String, detail: String },

    /// Connecting or authenticating to the relay failed.
    #[error("SMTP connection error: {0}")]
    Connection(String),

    /// Building or sending an individual message failed.
    #[error("{0}")]
    Send(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = GitError::BinaryNotFound("git".into());
        assert_eq!(
            err.to_string(),
            "Required command not found: git (install it and retry)"
        );

        let err = GitError::CommandFailed {
            command: "git clone --bare https://github.com/a/b".into(),
            exit_code: 128,
            output: "fatal: repository not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "Command failed: git clone --bare https://github.com/a/b\nfatal: repository not found"
        );

        let err = MailError::MissingSettings(vec!["SMTP_SERVER", "SENDER_EMAIL"]);
        assert_eq!(
            err.to_string(),
            "Missing SMTP configuration. Please set: SMTP_SERVER, SENDER_EMAIL"
        );
    }

    #[test]
    fn test_audit_error_external_classification() {
        let err: AuditError = GitError::BinaryNotFound("git".into()).into();
        assert!(err.is_external());

        let err = AuditError::Workspace(std::io::Error::other("disk full"));
        assert!(!err.is_external());

        let err: AuditError = GitError::IoError(std::io::Error::other("broken pipe")).into();
        assert!(!err.is_external());
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let core_err: CoreError = GitError::BinaryNotFound("git".into()).into();
        assert!(matches!(core_err, CoreError::Git(_)));

        let core_err: CoreError = MailError::Connection("refused".into()).into();
        assert!(matches!(core_err, CoreError::Mail(_)));
    }
}
