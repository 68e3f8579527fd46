//! The audit pipeline: fetch, extract, aggregate, report.
//!
//! [`AuditEngine`] holds no mutable state, so one instance can serve any
//! number of concurrent audits. Each audit owns its temporary clone, which
//! is removed when the audit returns, fails, or is cancelled.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::config::AuditConfig;
use crate::errors::AuditError;
use crate::git::{GitCommand, HistoryExtractor, RepoFetcher, RepositoryReference};
use crate::identity::AuthorAggregator;
use crate::models::RepoAuditReport;
use crate::report::build_report;

/// Runs repository author audits.
#[derive(Debug, Clone)]
pub struct AuditEngine {
    fetcher: RepoFetcher,
    extractor: HistoryExtractor,
}

impl AuditEngine {
    pub fn new(config: &AuditConfig) -> Self {
        let engine = Self::with_git(GitCommand::new(&config.git_binary));
        match &config.scratch_dir {
            Some(dir) => engine.with_scratch_dir(dir),
            None => engine,
        }
    }

    pub fn with_git(git: GitCommand) -> Self {
        Self {
            fetcher: RepoFetcher::new(git.clone()),
            extractor: HistoryExtractor::new(git),
        }
    }

    /// Place temporary clones under `dir`.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fetcher = self.fetcher.with_scratch_dir(dir);
        self
    }

    /// Audit the `max_commits` most recent commits of `repo`.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn audit(
        &self,
        repo: &RepositoryReference,
        max_commits: u32,
    ) -> Result<RepoAuditReport, AuditError> {
        self.audit_from(&repo.url(), repo, max_commits).await
    }

    /// Clone from `clone_url` but report under `repo`.
    async fn audit_from(
        &self,
        clone_url: &str,
        repo: &RepositoryReference,
        max_commits: u32,
    ) -> Result<RepoAuditReport, AuditError> {
        let started = Instant::now();
        info!(max_commits, "starting audit");

        let fetched = self.fetcher.fetch_url(clone_url).await.map_err(|e| {
            warn!(error = %e, "fetch failed");
            e
        })?;
        let log = self.extractor.extract(&fetched, max_commits).await?;
        drop(fetched);

        let aggregation = AuthorAggregator::from_log(&log);
        let report = build_report(repo, aggregation, max_commits);

        info!(
            scanned = report.scanned_commits,
            rows = report.authors.len(),
            unique_authors = report.unique_authors,
            unique_emails = report.unique_non_noreply_emails,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "audit complete"
        );
        Ok(report)
    }
}
