//! Deduplication of author records into per-identity commit counts.

use std::collections::{HashMap, HashSet};

use super::classifier::{AuthorIdentity, EmailClass};
use crate::git::history::{split_record, HistoryLog};

/// Accumulated count for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    pub identity: AuthorIdentity,
    pub commits: u64,
    /// Email as it appeared in the most recently observed record.
    pub display_email: String,
}

/// Output of [`AuthorAggregator`]: entries in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub entries: Vec<AggregateEntry>,
    /// Distinct lowercased real (non-placeholder) addresses.
    pub real_emails: HashSet<String>,
    /// Number of records observed.
    pub scanned: u64,
}

/// Folds raw `(name, email)` records into an [`Aggregation`].
#[derive(Debug, Default)]
pub struct AuthorAggregator {
    index: HashMap<AuthorIdentity, usize>,
    aggregation: Aggregation,
}

impl AuthorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate every record of a history listing.
    pub fn from_log(log: &HistoryLog) -> Aggregation {
        let mut aggregator = Self::new();
        for record in log.records() {
            aggregator.observe_record(record);
        }
        aggregator.finish()
    }

    /// Observe one raw `name\0email` record.
    pub fn observe_record(&mut self, record: &str) {
        let (name, email) = split_record(record);
        self.observe(name, email);
    }

    /// Observe one `(name, email)` pair.
    pub fn observe(&mut self, name: &str, email: &str) {
        self.aggregation.scanned += 1;

        let email = email.trim();
        let identity = AuthorIdentity::from_raw(name, email);
        let display_email = match &identity.class {
            EmailClass::Missing => String::new(),
            EmailClass::Noreply => email.to_string(),
            EmailClass::NonNoreply(lowered) => {
                self.aggregation.real_emails.insert(lowered.clone());
                email.to_string()
            }
        };

        match self.index.get(&identity) {
            Some(&pos) => {
                let entry = &mut self.aggregation.entries[pos];
                entry.commits += 1;
                entry.display_email = display_email;
            }
            None => {
                self.index
                    .insert(identity.clone(), self.aggregation.entries.len());
                self.aggregation.entries.push(AggregateEntry {
                    identity,
                    commits: 1,
                    display_email,
                });
            }
        }
    }

    pub fn finish(self) -> Aggregation {
        self.aggregation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::classifier::NO_NAME;

    fn aggregate(records: &[(&str, &str)]) -> Aggregation {
        let mut agg = AuthorAggregator::new();
        for (name, email) in records {
            agg.observe(name, email);
        }
        agg.finish()
    }

    #[test]
    fn test_duplicates_collapse_and_count() {
        let result = aggregate(&[("Alice", "a@x.com"), ("Alice", "a@x.com"), ("Bob", "")]);
        assert_eq!(result.scanned, 3);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].identity.name, "Alice");
        assert_eq!(result.entries[0].commits, 2);
        assert_eq!(result.entries[1].identity.class, EmailClass::Missing);
        assert_eq!(result.real_emails.len(), 1);
    }

    #[test]
    fn test_same_name_different_buckets_are_distinct() {
        let result = aggregate(&[
            ("Alice", "a@x.com"),
            ("Alice", "1+alice@users.noreply.github.com"),
            ("Alice", ""),
            ("Alice", "alice@work.com"),
        ]);
        assert_eq!(result.entries.len(), 4);
        assert!(result.entries.iter().all(|e| e.commits == 1));
    }

    #[test]
    fn test_display_email_last_write_wins() {
        let result = aggregate(&[("Alice", "Alice@X.com"), ("Alice", "alice@x.COM")]);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].commits, 2);
        assert_eq!(result.entries[0].display_email, "alice@x.COM");
    }

    #[test]
    fn test_real_email_count_ignores_names_and_placeholders() {
        let result = aggregate(&[
            ("alice", "A@x.com"),
            ("ALICE", "a@X.com"),
            ("Al", "a@x.com"),
            ("Bob", "b@x.com"),
            ("Carol", "7@users.noreply.github.com"),
            ("Dan", ""),
        ]);
        assert_eq!(result.real_emails.len(), 2);
        assert!(result.real_emails.contains("a@x.com"));
        assert!(result.real_emails.contains("b@x.com"));
    }

    #[test]
    fn test_noreply_address_is_kept_verbatim() {
        let result = aggregate(&[("Octo", " 42@users.noreply.github.com ")]);
        assert_eq!(result.entries[0].identity.class, EmailClass::Noreply);
        assert_eq!(result.entries[0].display_email, "42@users.noreply.github.com");
        assert!(result.real_emails.is_empty());
    }

    #[test]
    fn test_malformed_records_do_not_fail() {
        let log = HistoryLog::from_bytes(b"just a name\n\n\0orphan@x.com\n\xff\xfe\0e@x.com\n");
        let result = AuthorAggregator::from_log(&log);
        assert_eq!(result.scanned, 4);

        let names: Vec<&str> = result
            .entries
            .iter()
            .map(|e| e.identity.name.as_str())
            .collect();
        assert_eq!(names, vec!["just a name", NO_NAME, NO_NAME, "\u{FFFD}\u{FFFD}"]);
        assert_eq!(result.entries[0].identity.class, EmailClass::Missing);
        assert_eq!(result.entries[1].identity.class, EmailClass::Missing);
        assert_eq!(
            result.entries[2].identity.class,
            EmailClass::NonNoreply("orphan@x.com".into())
        );
    }

    #[test]
    fn test_literal_sentinel_name_merges_with_empty_name() {
        let result = aggregate(&[("", ""), (NO_NAME, "")]);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].commits, 2);
    }
}
