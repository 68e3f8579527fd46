//! Plain-text message templates.
//!
//! Placeholders are replaced literally, with no escaping: the output is a
//! `text/plain` body.

use serde::Deserialize;

/// One addressee of an outreach batch, as submitted by the UI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Recipient {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub commits: Option<u64>,
}

impl Recipient {
    /// Greeting name: `first_name`, else `author_name`, else empty.
    pub fn greeting_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.author_name.as_deref())
            .unwrap_or("")
    }
}

/// Fill `{author_name}`, `{first_name}`, `{email}`, `{commits}` and
/// `{repo_url}` in `template`. Both name placeholders receive
/// [`Recipient::greeting_name`].
pub fn render(template: &str, recipient: &Recipient, email: &str, repo_url: &str) -> String {
    let name = recipient.greeting_name();
    template
        .replace("{author_name}", name)
        .replace("{first_name}", name)
        .replace("{email}", email)
        .replace("{commits}", &recipient.commits.unwrap_or(0).to_string())
        .replace("{repo_url}", repo_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> Recipient {
        Recipient {
            email: "ada@example.com".into(),
            first_name: Some("Ada".into()),
            author_name: Some("Ada Lovelace".into()),
            commits: Some(12),
        }
    }

    #[test]
    fn test_render_all_placeholders() {
        let body = render(
            "Hi {first_name} ({author_name}), {commits} commits as {email} on {repo_url}. Thanks {first_name}!",
            &recipient(),
            "ada@example.com",
            "https://github.com/acme/widget",
        );
        assert_eq!(
            body,
            "Hi Ada (Ada), 12 commits as ada@example.com on https://github.com/acme/widget. Thanks Ada!"
        );
    }

    #[test]
    fn test_author_name_fallback() {
        let r = Recipient {
            first_name: None,
            ..recipient()
        };
        assert_eq!(r.greeting_name(), "Ada Lovelace");

        let r = Recipient {
            first_name: None,
            author_name: None,
            ..recipient()
        };
        assert_eq!(render("Hi {first_name}!", &r, "", ""), "Hi !");
    }

    #[test]
    fn test_no_escaping() {
        let r = Recipient {
            first_name: Some("<b>&".into()),
            ..recipient()
        };
        assert_eq!(render("{first_name}", &r, "", ""), "<b>&");
    }

    #[test]
    fn test_unknown_placeholders_untouched() {
        assert_eq!(render("{unknown} {email}", &recipient(), "x@y", ""), "{unknown} x@y");
    }

    #[test]
    fn test_deserialize_partial_recipient() {
        let r: Recipient = serde_json::from_str(r#"{"email":"a@b.c","author_name":"A B"}"#).unwrap();
        assert_eq!(r.commits, None);
        assert_eq!(r.greeting_name(), "A B");
    }
}
