//! Author identity classification and aggregation.
//!
//! Each history record is keyed by its trimmed author name and an
//! [`EmailClass`] bucket. Records sharing a key are counted together; real
//! addresses are also collected into a whole-scan set.

pub mod aggregator;
pub mod classifier;

pub use aggregator::{AggregateEntry, Aggregation, AuthorAggregator};
pub use classifier::{AuthorIdentity, EmailClass, NO_NAME};
