//! Bare, history-only clones in self-cleaning scratch directories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{info, instrument, warn};

use super::command::GitCommand;
use super::remote_url::RepositoryReference;
use crate::errors::{AuditError, GitError};

const TEMP_PREFIX: &str = "repo-author-audit-";

/// A bare clone living in its own temporary directory.
///
/// Dropping the value removes the directory and everything under it.
#[derive(Debug)]
pub struct FetchedRepository {
    git_dir: PathBuf,
    // Held for its `Drop`; removal errors are ignored by `TempDir`.
    _workspace: TempDir,
}

impl FetchedRepository {
    /// Path of the bare repository (`<tmp>/repo.git`).
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }
}

/// Clones repositories for auditing.
#[derive(Debug, Clone)]
pub struct RepoFetcher {
    git: GitCommand,
    scratch_dir: Option<PathBuf>,
}

impl RepoFetcher {
    pub fn new(git: GitCommand) -> Self {
        Self {
            git,
            scratch_dir: None,
        }
    }

    /// Create temporary clones under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Clone the history of `repo` into a fresh temporary directory.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn fetch(&self, repo: &RepositoryReference) -> Result<FetchedRepository, AuditError> {
        self.fetch_url(&repo.url()).await
    }

    /// Clone `url` without validating it. Only reachable with URLs built by
    /// [`RepositoryReference`] or by tests using local `file://` remotes.
    pub(crate) async fn fetch_url(&self, url: &str) -> Result<FetchedRepository, AuditError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        let workspace = match &self.scratch_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
        .map_err(AuditError::Workspace)?;
        let git_dir = workspace.path().join("repo.git");

        self.clone_bare(url, &git_dir).await?;

        Ok(FetchedRepository {
            git_dir,
            _workspace: workspace,
        })
    }

    /// Blobless bare clone first; plain bare clone if that attempt fails.
    async fn clone_bare(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        let dest_str = dest.to_string_lossy().to_string();

        let filtered = self
            .git
            .run(
                None,
                &["clone", "--bare", "--filter=blob:none", "--", url, &dest_str],
            )
            .await;

        match filtered {
            Ok(_) => {
                info!("blobless bare clone completed");
                return Ok(());
            }
            Err(GitError::CommandFailed { output, .. }) => {
                warn!(%output, "blobless clone failed, retrying with a full bare clone");
            }
            Err(e) => return Err(e),
        }

        // A failed clone may leave a partial directory behind.
        if dest.exists() {
            let _ = std::fs::remove_dir_all(dest);
        }

        self.git
            .run(None, &["clone", "--bare", "--", url, &dest_str])
            .await?;
        info!("full bare clone completed");
        Ok(())
    }
}
