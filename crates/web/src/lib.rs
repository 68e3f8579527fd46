//! Author audit web server and REST API.
//!
//! Provides an Axum-based HTTP server with:
//! - `POST /api/audit` running a repository author audit
//! - `POST /api/send-emails` sending templated outreach email
//! - `GET /api/health` for liveness checks
//! - the embedded single-page UI (`/`, `/app.js`, `/styles.css`)

pub mod api;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::middleware;
use axum::response::Response;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use author_audit_core::config::AppConfig;
use author_audit_core::AuditEngine;

/// Shared application state accessible from all handlers.
///
/// Read-only after startup: concurrent audits share nothing mutable.
pub struct AppState {
    pub config: AppConfig,
    pub engine: AuditEngine,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let engine = AuditEngine::new(&config.audit);
        Self { config, engine }
    }
}

/// The web server.
pub struct WebServer {
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server from resolved configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// The fully layered application router.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve on `listen_addr` until `shutdown` resolves.
    pub async fn start<F>(self, listen_addr: &str, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listen_addr.parse()?;
        let app = self.router();

        info!(addr = %addr, "starting web server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("web server stopped");
        Ok(())
    }
}

/// Assemble every route with its middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // API routes
        .merge(api::audit::routes())
        .merge(api::emails::routes())
        .merge(api::status::routes())
        // UI
        .merge(api::assets::routes())
        .fallback(api::not_found)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(2 * 1024 * 1024)) // 2 MB max request body
                .layer(middleware::map_response(no_store)),
        )
        .with_state(state)
}

async fn no_store(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
