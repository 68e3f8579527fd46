//! Turns an [`Aggregation`] into a sorted, capped [`RepoAuditReport`].

use std::collections::HashSet;

use crate::git::RepositoryReference;
use crate::identity::classifier::first_name;
use crate::identity::Aggregation;
use crate::models::{AuthorRow, RepoAuditReport};

/// Most author rows a report will contain.
pub const MAX_AUTHOR_ROWS: usize = 500;

/// Build the report for `repo`.
///
/// Rows are ordered by commit count, highest first; equal counts keep the
/// order in which the identities were first seen. `unique_authors` counts
/// names among the retained rows only, while `unique_non_noreply_emails`
/// covers the whole scan.
pub fn build_report(
    repo: &RepositoryReference,
    aggregation: Aggregation,
    max_commits: u32,
) -> RepoAuditReport {
    let Aggregation {
        entries,
        real_emails,
        scanned,
    } = aggregation;

    let mut rows: Vec<AuthorRow> = entries
        .into_iter()
        .map(|entry| AuthorRow {
            first_name: first_name(&entry.identity.name),
            email_type: entry.identity.class.email_type(),
            author_name: entry.identity.name,
            commits: entry.commits,
            email: entry.display_email,
        })
        .collect();

    // `sort_by` is stable.
    rows.sort_by(|a, b| b.commits.cmp(&a.commits));
    rows.truncate(MAX_AUTHOR_ROWS);

    let unique_authors = rows
        .iter()
        .map(|row| row.author_name.as_str())
        .collect::<HashSet<_>>()
        .len();

    RepoAuditReport {
        repo_url: repo.url(),
        scanned_commits: scanned.min(u64::from(max_commits)),
        unique_authors,
        unique_non_noreply_emails: real_emails.len(),
        authors: rows,
        note: String::new(),
    }
}
