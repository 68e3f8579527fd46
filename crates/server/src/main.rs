//! Author audit server entry point.
//!
//! Loads configuration, initializes logging, and serves the HTTP API and
//! UI until a shutdown signal arrives.

mod signals;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use author_audit_core::config::AppConfig;
use author_audit_web::WebServer;

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// Audit the commit authors of public GitHub repositories.
#[derive(Parser, Debug)]
#[command(
    name = "author-audit",
    version,
    about = "Web service listing commit authors and their email addresses"
)]
struct Args {
    /// Address to bind (overrides `server.listen`).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides `server.listen`).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the log level from the config file (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_and_resolve(args.config.as_deref())
        .context("failed to load configuration")?;
    config.server.listen = listen_address(&config.server.listen, args.host.as_deref(), args.port);

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.server.log_level.clone());
    let _log_guard = init_tracing(&log_level, &config).context("failed to initialize logging")?;

    // Startup banner
    info!("========================================");
    info!("  Author Audit v{}", env!("CARGO_PKG_VERSION"));
    info!("========================================");
    match &args.config {
        Some(path) => info!("Config file   : {}", path.display()),
        None => info!("Config file   : (defaults)"),
    }
    info!("Listen        : {}", config.server.listen);
    info!("Git binary    : {}", config.audit.git_binary);
    info!(
        "Max commits   : {} (limit {})",
        config.audit.default_max_commits, config.audit.max_commits_limit
    );
    info!(
        "SMTP          : {}",
        if config.smtp.missing_settings().is_empty() { "configured" } else { "not configured" }
    );
    info!("Log level     : {}", log_level);
    info!("========================================");

    let listen = config.server.listen.clone();
    WebServer::new(config)
        .start(&listen, signals::wait_for_shutdown())
        .await
        .context("web server failed")?;

    info!("Author audit server stopped.");
    Ok(())
}

/// Apply `--host`/`--port` on top of the configured `host:port`.
fn listen_address(configured: &str, host: Option<&str>, port: Option<u16>) -> String {
    let (base_host, base_port) = configured
        .rsplit_once(':')
        .unwrap_or((configured, "8000"));
    let host = match host {
        // Bare IPv6 literals need brackets in a socket address.
        Some(h) if h.contains(':') && !h.starts_with('[') => format!("[{h}]"),
        Some(h) => h.to_string(),
        None => base_host.to_string(),
    };
    match port {
        Some(port) => format!("{host}:{port}"),
        None => format!("{host}:{base_port}"),
    }
}

/// Console logging, plus a daily-rotated file when `server.log_dir` is set.
///
/// The returned guard flushes the file writer and must outlive the server.
fn init_tracing(log_level: &str, config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.server.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "author-audit.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already set")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_address_defaults_to_config() {
        assert_eq!(listen_address("127.0.0.1:8000", None, None), "127.0.0.1:8000");
    }

    #[test]
    fn test_listen_address_overrides() {
        assert_eq!(listen_address("127.0.0.1:8000", Some("0.0.0.0"), None), "0.0.0.0:8000");
        assert_eq!(listen_address("127.0.0.1:8000", None, Some(9000)), "127.0.0.1:9000");
        assert_eq!(
            listen_address("127.0.0.1:8000", Some("::1"), Some(9000)),
            "[::1]:9000"
        );
    }
}
