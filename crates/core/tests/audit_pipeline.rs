//! Pipeline tests through the public API.
//!
//! History listings are synthesized as raw `git log` output so the
//! aggregation and report stages run without network access. The engine
//! tests use a missing `git` binary to check failure classification.

use author_audit_core::config::AuditConfig;
use author_audit_core::errors::{AuditError, GitError};
use author_audit_core::git::HistoryLog;
use author_audit_core::identity::AuthorAggregator;
use author_audit_core::report::{build_report, MAX_AUTHOR_ROWS};
use author_audit_core::{AuditEngine, EmailType, RepoAuditReport, RepositoryReference};

// ===========================================================================
// Helpers
// ===========================================================================

fn widget() -> RepositoryReference {
    RepositoryReference::normalize("https://github.com/acme/widget").unwrap()
}

/// Encode `(name, email)` pairs the way `git log --format=%an%x00%ae` does.
fn raw_log(records: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, email) in records {
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        out.extend_from_slice(email.as_bytes());
        out.push(b'\n');
    }
    out
}

fn audit_log(raw: &[u8], max_commits: u32) -> RepoAuditReport {
    let log = HistoryLog::from_bytes(raw);
    build_report(&widget(), AuthorAggregator::from_log(&log), max_commits)
}

// ===========================================================================
// Normalization
// ===========================================================================

#[test]
fn normalization_variants_share_one_canonical_form() {
    let inputs = [
        "https://github.com/acme/widget",
        "https://github.com/acme/widget.git",
        "http://github.com/acme/widget",
        "https://www.github.com/acme/widget",
        "https://GITHUB.com/acme/widget?tab=readme#top",
        "https://github.com/acme/widget/pulls",
    ];
    for input in inputs {
        let normalized = RepositoryReference::normalize(input)
            .unwrap_or_else(|| panic!("expected {input} to normalize"));
        assert_eq!(normalized, widget());
        assert_eq!(
            RepositoryReference::normalize(&normalized.url()),
            Some(normalized.clone())
        );
    }
}

#[test]
fn normalization_rejects_everything_else() {
    let inputs = [
        "acme/widget",
        "ftp://github.com/acme/widget",
        "https://bitbucket.org/acme/widget",
        "https://github.com/acme",
        "https://github.com/acme/wid\"get",
        "https://github.com/acme/wid`get`",
        "https://github.com/..//..",
    ];
    for input in inputs {
        assert_eq!(RepositoryReference::normalize(input), None, "input: {input}");
    }
}

// ===========================================================================
// Aggregation and report
// ===========================================================================

#[test]
fn two_alice_commits_and_one_emailless_bob() {
    let report = audit_log(&raw_log(&[("Alice", "a@x.com"), ("Alice", "a@x.com"), ("Bob", "")]), 10);

    assert_eq!(report.scanned_commits, 3);
    assert_eq!(report.unique_authors, 2);
    assert_eq!(report.unique_non_noreply_emails, 1);
    assert_eq!(report.authors.len(), 2);
    assert_eq!(report.authors[0].author_name, "Alice");
    assert_eq!(report.authors[0].commits, 2);
    assert_eq!(report.authors[0].email_type, EmailType::NonNoreply);
    assert_eq!(report.authors[0].email, "a@x.com");
    assert_eq!(report.authors[1].author_name, "Bob");
    assert_eq!(report.authors[1].email_type, EmailType::Missing);
    assert_eq!(report.authors[1].email, "");
}

#[test]
fn placeholder_addresses_are_reported_verbatim() {
    let report = audit_log(&raw_log(&[("Octo", "42@users.noreply.github.com")]), 10);
    assert_eq!(report.authors[0].email_type, EmailType::Noreply);
    assert_eq!(report.authors[0].email, "42@users.noreply.github.com");
    assert_eq!(report.unique_non_noreply_emails, 0);
}

#[test]
fn real_email_count_is_case_and_name_insensitive() {
    let report = audit_log(
        &raw_log(&[
            ("ann", "Ann@Corp.io"),
            ("Ann", "ann@corp.io"),
            ("A. N. N.", "ANN@CORP.IO"),
            ("ann", "ann@home.net"),
            ("bot", "1@users.noreply.github.com"),
        ]),
        100,
    );
    assert_eq!(report.unique_non_noreply_emails, 2);
    assert_eq!(report.authors.len(), 5);
}

#[test]
fn ties_keep_first_seen_order() {
    let report = audit_log(
        &raw_log(&[("Zed", "z@x.com"), ("Amy", "a@x.com"), ("Mo", "m@x.com")]),
        10,
    );
    let names: Vec<&str> = report.authors.iter().map(|r| r.author_name.as_str()).collect();
    assert_eq!(names, vec!["Zed", "Amy", "Mo"]);
}

#[test]
fn bounds_hold_for_large_histories() {
    let records: Vec<(String, String)> = (0..1200)
        .map(|i| (format!("dev{}", i % 700), format!("dev{}@x.com", i % 700)))
        .collect();
    let borrowed: Vec<(&str, &str)> = records
        .iter()
        .map(|(n, e)| (n.as_str(), e.as_str()))
        .collect();

    let report = audit_log(&raw_log(&borrowed), 1000);
    assert_eq!(report.authors.len(), MAX_AUTHOR_ROWS);
    assert_eq!(report.scanned_commits, 1000);
    assert_eq!(report.unique_non_noreply_emails, 700);
    assert!(report
        .authors
        .windows(2)
        .all(|w| w[0].commits >= w[1].commits));
}

#[test]
fn garbled_history_still_produces_a_report() {
    let raw = b"\xc3\x28\0bad@x.com\nno-delimiter-line\n   \0   \n";
    let report = audit_log(raw, 10);
    assert_eq!(report.scanned_commits, 3);
    assert_eq!(report.authors.len(), 3);
    assert_eq!(report.authors[2].author_name, "(no name)");
    assert_eq!(report.authors[2].email_type, EmailType::Missing);
}

// ===========================================================================
// Engine failures
// ===========================================================================

#[tokio::test]
async fn missing_git_binary_is_an_external_failure() {
    let engine = AuditEngine::new(&AuditConfig {
        git_binary: "author-audit-missing-git".into(),
        ..AuditConfig::default()
    });

    let err = engine.audit(&widget(), 10).await.unwrap_err();
    assert!(err.is_external());
    assert!(matches!(err, AuditError::Git(GitError::BinaryNotFound(_))));
    assert!(err.to_string().contains("install it and retry"));
}
