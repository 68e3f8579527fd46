//! Asynchronous wrapper around the `git` executable.
//!
//! Arguments are always passed as a vector, never through a shell. The child
//! is killed if the future driving it is dropped.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::GitError;

/// Longest diagnostic (in bytes) carried by [`GitError::CommandFailed`].
const MAX_DIAGNOSTIC_LEN: usize = 4000;

/// Handle on a `git` executable.
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: PathBuf,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `git <args>` (optionally inside `cwd`) and return its raw stdout.
    ///
    /// A missing executable yields [`GitError::BinaryNotFound`]; a non-zero
    /// exit yields [`GitError::CommandFailed`] with stderr and stdout combined.
    pub async fn run(&self, cwd: Option<&Path>, args: &[&str]) -> Result<Vec<u8>, GitError> {
        let mut cmd = Command::new(&self.program);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let command_line = self.command_line(args);
        debug!(cmd = %command_line, "running git command");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::BinaryNotFound(self.program.display().to_string())
            } else {
                GitError::IoError(e)
            }
        })?;

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            let diagnostic = combine_output(&output.stderr, &output.stdout);
            warn!(exit_code, cmd = %command_line, "git command failed");
            return Err(GitError::CommandFailed {
                command: command_line,
                exit_code,
                output: diagnostic,
            });
        }

        Ok(output.stdout)
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.program.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Join stderr and stdout into one trimmed, length-bounded diagnostic.
fn combine_output(stderr: &[u8], stdout: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stdout = String::from_utf8_lossy(stdout);
    let combined = match (stderr.trim(), stdout.trim()) {
        (e, "") => e.to_string(),
        ("", o) => o.to_string(),
        (e, o) => format!("{}\n{}", e, o),
    };
    truncate_at_char_boundary(combined, MAX_DIAGNOSTIC_LEN)
}

fn truncate_at_char_boundary(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_output() {
        assert_eq!(combine_output(b"  fatal: nope\n", b""), "fatal: nope");
        assert_eq!(combine_output(b"", b"out\n"), "out");
        assert_eq!(combine_output(b"err", b"out"), "err\nout");
        assert_eq!(combine_output(b"", b""), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let s = "é".repeat(10); // 20 bytes
        let t = truncate_at_char_boundary(s, 5);
        assert_eq!(t, "éé");
    }

    #[test]
    fn test_command_line() {
        let git = GitCommand::default();
        assert_eq!(
            git.command_line(&["log", "-n5"]),
            "git log -n5"
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_distinguishable() {
        let git = GitCommand::new("author-audit-no-such-binary");
        let err = git.run(None, &["--version"]).await.unwrap_err();
        assert!(matches!(err, GitError::BinaryNotFound(ref p) if p == "author-audit-no-such-binary"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_command_failed() {
        let git = GitCommand::new("false");
        let err = git.run(None, &[]).await.unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { exit_code: 1, .. }));
    }
}
