use crate::{ContentSource, RepoSource, Revision, SourceError};

/// Name of the reference that points at the default branch.
pub const HEAD: &str = "HEAD";

#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    #[error("no HEAD reference in {0}")]
    NotFound(RepoSource),

    #[error("failed to list references: {0}")]
    Source(#[from] SourceError),
}

/// Resolve the commit the repository's `HEAD` points at.
///
/// The result pins every later fetch of the same request to one snapshot.
pub async fn resolve_head<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
) -> Result<Revision, RevisionError> {
    let references = source.fetch_references(repo).await?;

    let head = references
        .into_iter()
        .find(|r| r.name == HEAD)
        .ok_or_else(|| RevisionError::NotFound(repo.clone()))?;

    tracing::debug!(%repo, sha = %head.sha, "resolved HEAD");

    Ok(Revision {
        sha: head.sha,
        reference: head.name,
    })
}
