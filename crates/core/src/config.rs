//! TOML-based configuration for the author-audit server.
//!
//! Every section has defaults, so an absent config file is equivalent to an
//! empty one. The SMTP password is never stored in the file: `password_env`
//! names the environment variable that holds it, resolved at startup via
//! [`AppConfig::resolve_env_vars`]. The other SMTP fields fall back to the
//! conventional `SMTP_*` / `SENDER_EMAIL` variables when the file leaves them
//! unset.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ConfigError;

/// Upper bound on `max_commits` accepted from callers.
pub const MAX_COMMITS_LIMIT: u32 = 200_000;

/// `max_commits` used when the caller does not provide one.
pub const DEFAULT_MAX_COMMITS: u32 = 2000;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Repository audit settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Outbound mail relay settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// HTTP listener and logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (default `127.0.0.1:8000`).
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for daily rolling log files. Console only when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_listen() -> String {
    "127.0.0.1:8000".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Repository audit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Name or path of the `git` executable.
    #[serde(default = "default_git_binary")]
    pub git_binary: String,

    /// Commits scanned when the request omits `max_commits`.
    #[serde(default = "default_max_commits")]
    pub default_max_commits: u32,

    /// Largest `max_commits` a request may ask for.
    #[serde(default = "default_max_commits_limit")]
    pub max_commits_limit: u32,

    /// Parent directory for temporary clones (system temp dir when unset).
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

fn default_git_binary() -> String {
    "git".into()
}
fn default_max_commits() -> u32 {
    DEFAULT_MAX_COMMITS
}
fn default_max_commits_limit() -> u32 {
    MAX_COMMITS_LIMIT
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            git_binary: default_git_binary(),
            default_max_commits: default_max_commits(),
            max_commits_limit: default_max_commits_limit(),
            scratch_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SMTP
// ---------------------------------------------------------------------------

/// Outbound mail relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay host name (`SMTP_SERVER`).
    #[serde(default)]
    pub server: Option<String>,

    /// Relay port (`SMTP_PORT`, default 587).
    #[serde(default)]
    pub port: Option<u16>,

    /// `true` upgrades a plain connection with STARTTLS, `false` connects
    /// with implicit TLS (`SMTP_USE_TLS`, default true).
    #[serde(default)]
    pub use_tls: Option<bool>,

    /// Login user name (`SMTP_USERNAME`).
    #[serde(default)]
    pub username: Option<String>,

    /// Environment variable holding the SMTP password.
    #[serde(default = "default_password_env")]
    pub password_env: String,

    /// `From:` address of outgoing mail (`SENDER_EMAIL`).
    #[serde(default)]
    pub sender_email: Option<String>,

    /// Resolved password (populated by `resolve_env_vars`).
    #[serde(skip)]
    pub password: Option<String>,
}

fn default_password_env() -> String {
    "SMTP_PASSWORD".into()
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: None,
            port: None,
            use_tls: None,
            username: None,
            password_env: default_password_env(),
            sender_email: None,
            password: None,
        }
    }
}

impl SmtpConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(587)
    }

    pub fn use_tls(&self) -> bool {
        self.use_tls.unwrap_or(true)
    }

    /// Names of the required settings that are absent or blank, in the
    /// order operators usually fill them in.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.server) {
            missing.push("SMTP_SERVER");
        }
        if is_blank(&self.username) {
            missing.push("SMTP_USERNAME");
        }
        if is_blank(&self.password) {
            missing.push("SMTP_PASSWORD");
        }
        if is_blank(&self.sender_email) {
            missing.push("SENDER_EMAIL");
        }
        missing
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).map_or(true, str::is_empty)
}

// ---------------------------------------------------------------------------
// Loading & resolving
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    ///
    /// This does **not** resolve environment variables -- call
    /// [`resolve_env_vars`](Self::resolve_env_vars) afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Fill unset SMTP settings from the environment and resolve the
    /// password from `smtp.password_env`.
    ///
    /// Missing variables are not an error here: the server starts without
    /// mail support and `/api/send-emails` reports what is absent.
    pub fn resolve_env_vars(&mut self) -> Result<(), ConfigError> {
        info!("resolving environment variable references in config");
        let smtp = &mut self.smtp;

        if smtp.server.is_none() {
            smtp.server = resolve_optional_env("SMTP_SERVER", "smtp.server");
        }
        if smtp.username.is_none() {
            smtp.username = resolve_optional_env("SMTP_USERNAME", "smtp.username");
        }
        if smtp.sender_email.is_none() {
            smtp.sender_email = resolve_optional_env("SENDER_EMAIL", "smtp.sender_email");
        }
        if smtp.port.is_none() {
            if let Some(raw) = resolve_optional_env("SMTP_PORT", "smtp.port") {
                let port = raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                    field: "smtp.port".into(),
                    detail: format!("SMTP_PORT '{}' is not a port number: {}", raw, e),
                })?;
                smtp.port = Some(port);
            }
        }
        if smtp.use_tls.is_none() {
            if let Some(raw) = resolve_optional_env("SMTP_USE_TLS", "smtp.use_tls") {
                smtp.use_tls = Some(raw.trim().eq_ignore_ascii_case("true"));
            }
        }
        let password_env = smtp.password_env.clone();
        smtp.password = resolve_optional_env(&password_env, "smtp.password_env");

        debug!("environment variable resolution complete");
        Ok(())
    }

    /// Validate that all values are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.listen".into(),
                detail: "listen address must not be empty".into(),
            });
        }
        if self.audit.git_binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "audit.git_binary".into(),
                detail: "git binary must not be empty".into(),
            });
        }
        if self.audit.max_commits_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audit.max_commits_limit".into(),
                detail: "limit must be > 0".into(),
            });
        }
        if self.audit.default_max_commits == 0
            || self.audit.default_max_commits > self.audit.max_commits_limit
        {
            return Err(ConfigError::InvalidValue {
                field: "audit.default_max_commits".into(),
                detail: format!("must be between 1 and {}", self.audit.max_commits_limit),
            });
        }

        Ok(())
    }

    /// Convenience: load (when a path is given), resolve, and validate.
    pub fn load_and_resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.resolve_env_vars()?;
        config.validate()?;
        Ok(config)
    }
}

/// Read an environment variable by name. Returns `Some(value)` when it is
/// set and non-empty; logs at debug level and returns `None` otherwise.
fn resolve_optional_env(env_name: &str, field: &str) -> Option<String> {
    match std::env::var(env_name) {
        Ok(val) if !val.trim().is_empty() => {
            debug!(field, env_name, "resolved env var");
            Some(val.trim().to_string())
        }
        Ok(_) => {
            warn!(field, env_name, "env var is set but empty");
            None
        }
        Err(_) => {
            debug!(field, env_name, "env var not set");
            None
        }
    }
}
