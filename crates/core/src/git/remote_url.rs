//! Validation and canonicalization of GitHub repository URLs.
//!
//! A [`RepositoryReference`] can only be obtained through
//! [`RepositoryReference::normalize`], which rebuilds the URL from the
//! validated owner and repository name. Nothing from the caller's input other
//! than those two checked segments reaches the `git` command line.

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;

/// The only hosting domain accepted by the normalizer.
pub const GITHUB_DOMAIN: &str = "github.com";

fn segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("static regex"))
}

/// A validated `https://github.com/<owner>/<repo>` locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

impl RepositoryReference {
    /// Validate a user-supplied repository URL.
    ///
    /// Accepts `http(s)://[www.]github.com/<owner>/<repo>[.git][/...][?query][#fragment]`
    /// and returns `None` for anything else.
    pub fn normalize(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let (scheme, rest) = input.split_once("://")?;
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return None;
        }

        // Drop the fragment, then the query.
        let rest = rest.split('#').next().unwrap_or_default();
        let rest = rest.split('?').next().unwrap_or_default();

        let (host, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };
        if !host.eq_ignore_ascii_case(GITHUB_DOMAIN)
            && !host.eq_ignore_ascii_case(&format!("www.{}", GITHUB_DOMAIN))
        {
            return None;
        }

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let repo = segments.next()?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        if !is_valid_segment(owner) || !is_valid_segment(repo) {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            name: repo.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical `https://github.com/<owner>/<repo>` URL.
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://{}/{}/{}", GITHUB_DOMAIN, self.owner, self.name)
    }
}

/// Owner / repository names: restricted charset, and never `.` or `..`.
fn is_valid_segment(segment: &str) -> bool {
    segment_re().is_match(segment) && !segment.chars().all(|c| c == '.')
}
