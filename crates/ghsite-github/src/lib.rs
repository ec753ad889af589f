pub mod content;
pub mod refs;
pub mod repo_source;

pub use repo_source::{GitHubSource, GitHubSourceConfig};
