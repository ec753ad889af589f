use std::fmt;
use std::sync::Arc;

/// Errors that can occur when reading from a content source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Identifies a content origin: one repository on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSource {
    pub owner: String,
    pub repo: String,
}

impl RepoSource {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Avatar of the repository owner.
    pub fn profile_image_url(&self) -> String {
        format!("https://github.com/{}.png", self.owner)
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A single advertised reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub sha: String,
}

/// The commit every fetch within one request is pinned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub sha: String,
    pub reference: String,
}

impl Revision {
    pub fn as_str(&self) -> &str {
        &self.sha
    }
}

/// An unprocessed file body, passed through to the client as-is.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Read access to repository content on a remote host.
///
/// Paths are repository-relative and never start with `/`. Listings
/// mark subdirectories with a trailing `/`.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// List the references the repository advertises.
    async fn fetch_references(&self, repo: &RepoSource) -> Result<Vec<Reference>, SourceError>;

    /// Fetch a text file at the given revision.
    async fn fetch_file_content(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        path: &str,
    ) -> Result<String, SourceError>;

    /// Fetch a file without decoding it.
    async fn fetch_file_response(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        path: &str,
    ) -> Result<RawFile, SourceError>;

    /// List the entries directly under `prefix` (one level, not recursive).
    async fn list_files(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        prefix: &str,
    ) -> Result<Vec<String>, SourceError>;
}

#[async_trait::async_trait]
impl<T: ContentSource + ?Sized> ContentSource for Arc<T> {
    async fn fetch_references(&self, repo: &RepoSource) -> Result<Vec<Reference>, SourceError> {
        (**self).fetch_references(repo).await
    }

    async fn fetch_file_content(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        path: &str,
    ) -> Result<String, SourceError> {
        (**self).fetch_file_content(repo, revision, path).await
    }

    async fn fetch_file_response(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        path: &str,
    ) -> Result<RawFile, SourceError> {
        (**self).fetch_file_response(repo, revision, path).await
    }

    async fn list_files(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        prefix: &str,
    ) -> Result<Vec<String>, SourceError> {
        (**self).list_files(repo, revision, prefix).await
    }
}
