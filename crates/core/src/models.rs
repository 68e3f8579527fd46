//! Report types returned by an audit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of email recorded on an author row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailType {
    #[serde(rename = "missing")]
    Missing,
    #[serde(rename = "noreply")]
    Noreply,
    #[serde(rename = "non-noreply")]
    NonNoreply,
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmailType::Missing => "missing",
            EmailType::Noreply => "noreply",
            EmailType::NonNoreply => "non-noreply",
        };
        f.write_str(s)
    }
}

/// One distinct author identity and the number of commits attributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRow {
    pub author_name: String,
    /// First word of `author_name`, used to greet the author by email.
    pub first_name: String,
    pub commits: u64,
    pub email_type: EmailType,
    /// The real address for `non-noreply`, the placeholder address for
    /// `noreply`, empty for `missing`.
    pub email: String,
}

/// Result of auditing one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoAuditReport {
    pub repo_url: String,
    pub scanned_commits: u64,
    /// Distinct author names among the rows in `authors`.
    pub unique_authors: usize,
    /// Distinct lowercased real addresses seen anywhere in the scan.
    pub unique_non_noreply_emails: usize,
    pub authors: Vec<AuthorRow>,
    pub note: String,
}
