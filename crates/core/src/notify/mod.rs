//! Outreach email to audited authors.
//!
//! [`template`] renders per-recipient bodies; [`email`] delivers them over
//! the configured SMTP relay.

pub mod email;
pub mod template;

pub use email::{EmailDispatcher, OutreachRequest, SendSummary};
pub use template::Recipient;
