//! Git operations: URL validation, process execution, cloning, history.

pub mod command;
pub mod fetcher;
pub mod history;
pub mod remote_url;

pub use command::GitCommand;
pub use fetcher::{FetchedRepository, RepoFetcher};
pub use history::{HistoryExtractor, HistoryLog};
pub use remote_url::RepositoryReference;
