//! Author records from `git log`.

use tracing::{debug, instrument};

use super::command::GitCommand;
use super::fetcher::FetchedRepository;
use crate::errors::GitError;

/// Separator between author name and email in each record. Git refuses NUL
/// in identities, so it never appears inside either field.
pub const FIELD_SEPARATOR: char = '\0';

/// Raw `git log` output: one `name\0email` record per line, newest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    text: String,
}

impl HistoryLog {
    /// Decode raw bytes, replacing invalid UTF-8 instead of failing.
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self {
            text: String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Iterate the records in commit order (newest first).
    pub fn records(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Split one record into `(name, email)`. A record without separator is
/// all name.
pub fn split_record(line: &str) -> (&str, &str) {
    line.split_once(FIELD_SEPARATOR).unwrap_or((line, ""))
}

/// Extracts author identities from a fetched repository.
#[derive(Debug, Clone)]
pub struct HistoryExtractor {
    git: GitCommand,
}

impl HistoryExtractor {
    pub fn new(git: GitCommand) -> Self {
        Self { git }
    }

    /// List the authors of at most `max_commits` most recent commits.
    #[instrument(skip(self, repo), fields(git_dir = %repo.git_dir().display()))]
    pub async fn extract(
        &self,
        repo: &FetchedRepository,
        max_commits: u32,
    ) -> Result<HistoryLog, GitError> {
        let limit = format!("-n{}", max_commits);
        let raw = self
            .git
            .run(
                Some(repo.git_dir()),
                &["log", &limit, "--format=%an%x00%ae"],
            )
            .await?;
        debug!(bytes = raw.len(), "history listing read");
        Ok(HistoryLog::from_bytes(&raw))
    }
}
