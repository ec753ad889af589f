use crate::path;
use crate::{ContentSource, RawFile, RepoSource, Revision, SourceError};

/// Directory listings are cut off after this many entries.
pub const MAX_LISTING_ENTRIES: usize = 500;

/// What a request path resolved to.
#[derive(Debug, Clone)]
pub enum Content {
    /// An image, passed through without processing.
    Asset(RawFile),
    /// A single markdown document.
    Document { path: String, source: String },
    /// Entries directly under a directory, at most [`MAX_LISTING_ENTRIES`].
    Directory { path: String, entries: Vec<String> },
    /// Nothing usable at this path.
    Missing { root: bool },
}

/// The fetches to try for a path, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Asset(String),
    Documents {
        candidates: Vec<String>,
        list_directory: bool,
    },
}

/// Decide what to fetch for a normalized request path.
pub fn plan(request_path: &str) -> Lookup {
    let request_path = path::normalize(request_path);

    if request_path.is_empty() {
        return Lookup::Documents {
            candidates: vec!["README.md".into()],
            list_directory: false,
        };
    }

    if path::is_image(request_path) {
        return Lookup::Asset(request_path.to_owned());
    }

    Lookup::Documents {
        candidates: vec![
            path::join(request_path, "README.md"),
            format!("{request_path}.md"),
        ],
        list_directory: true,
    }
}

/// Resolve a request path against the repository at `revision`.
///
/// Only an image fetch can fail; every other miss becomes
/// [`Content::Directory`] or [`Content::Missing`].
pub async fn locate<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    revision: &Revision,
    request_path: &str,
) -> Result<Content, SourceError> {
    let request_path = path::normalize(request_path);

    let (candidates, list_directory) = match plan(request_path) {
        Lookup::Asset(asset_path) => {
            let raw = source
                .fetch_file_response(repo, revision, &asset_path)
                .await?;
            return Ok(Content::Asset(raw));
        }
        Lookup::Documents {
            candidates,
            list_directory,
        } => (candidates, list_directory),
    };

    for candidate in candidates {
        match source.fetch_file_content(repo, revision, &candidate).await {
            Ok(text) => {
                tracing::debug!(%repo, path = %candidate, "located document");
                return Ok(Content::Document {
                    path: candidate,
                    source: text,
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => tracing::warn!(%repo, path = %candidate, "fetch failed: {e}"),
        }
    }

    if !list_directory {
        return Ok(Content::Missing {
            root: request_path.is_empty(),
        });
    }

    let entries = list_directory_entries(source, repo, revision, request_path).await;
    if entries.is_empty() {
        return Ok(Content::Missing { root: false });
    }

    Ok(Content::Directory {
        path: request_path.to_owned(),
        entries,
    })
}

/// One level of entries under `dir`, capped at [`MAX_LISTING_ENTRIES`].
/// A failed listing is an empty one.
pub async fn list_directory_entries<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    revision: &Revision,
    dir: &str,
) -> Vec<String> {
    let prefix = path::directory_prefix(path::normalize(dir));

    match source.list_files(repo, revision, &prefix).await {
        Ok(mut entries) => {
            entries.retain(|entry| entry.starts_with(&prefix) && entry.len() > prefix.len());
            entries.truncate(MAX_LISTING_ENTRIES);
            entries
        }
        Err(e) => {
            tracing::debug!(%repo, %prefix, "listing failed: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemorySource;

    fn repo() -> RepoSource {
        RepoSource::new("octocat", "site")
    }

    fn revision() -> Revision {
        Revision {
            sha: "abc".into(),
            reference: "HEAD".into(),
        }
    }

    #[test]
    fn root_only_tries_readme() {
        let expected = Lookup::Documents {
            candidates: vec!["README.md".into()],
            list_directory: false,
        };
        assert_eq!(plan(""), expected);
        assert_eq!(plan("/"), expected);
    }

    #[test]
    fn nested_path_tries_readme_then_sibling_then_listing() {
        assert_eq!(
            plan("/2020/post/"),
            Lookup::Documents {
                candidates: vec!["2020/post/README.md".into(), "2020/post.md".into()],
                list_directory: true,
            }
        );
    }

    #[test]
    fn image_path_is_an_asset() {
        assert_eq!(plan("img/cat.png"), Lookup::Asset("img/cat.png".into()));
    }

    #[tokio::test]
    async fn prefers_directory_readme() {
        let source = InMemorySource::new("abc")
            .with("2020/README.md", "# Year")
            .with("2020.md", "# Sibling");

        let content = locate(&source, &repo(), &revision(), "2020").await.unwrap();
        assert!(matches!(content, Content::Document { ref path, .. } if path == "2020/README.md"));
    }

    #[tokio::test]
    async fn falls_back_to_sibling_markdown() {
        let source = InMemorySource::new("abc").with("2020/post.md", "# Post");

        let content = locate(&source, &repo(), &revision(), "2020/post").await.unwrap();
        assert!(matches!(content, Content::Document { ref path, .. } if path == "2020/post.md"));
    }

    #[tokio::test]
    async fn falls_back_to_directory_listing() {
        let source = InMemorySource::new("abc")
            .with("2020/a.md", "# A")
            .with("2020/b.md", "# B");

        let content = locate(&source, &repo(), &revision(), "2020").await.unwrap();
        match content {
            Content::Directory { path, entries } => {
                assert_eq!(path, "2020");
                assert_eq!(entries, vec!["2020/a.md", "2020/b.md"]);
            }
            other => panic!("expected directory, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_root_readme_is_missing_not_error() {
        let source = InMemorySource::new("abc").with("2020/a.md", "# A");

        let content = locate(&source, &repo(), &revision(), "").await.unwrap();
        assert!(matches!(content, Content::Missing { root: true }));
    }

    #[tokio::test]
    async fn unknown_path_is_missing() {
        let source = InMemorySource::new("abc").with("README.md", "# Home");

        let content = locate(&source, &repo(), &revision(), "nope").await.unwrap();
        assert!(matches!(content, Content::Missing { root: false }));
    }

    #[tokio::test]
    async fn image_is_passed_through() {
        let mut source = InMemorySource::new("abc");
        source.add_bytes("img/cat.png", vec![0x89, b'P', b'N', b'G']);

        let content = locate(&source, &repo(), &revision(), "img/cat.png").await.unwrap();
        match content {
            Content::Asset(raw) => assert_eq!(raw.bytes, vec![0x89, b'P', b'N', b'G']),
            other => panic!("expected asset, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_image_propagates_not_found() {
        let source = InMemorySource::new("abc");

        let result = locate(&source, &repo(), &revision(), "img/nope.png").await;
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn listing_is_capped() {
        let mut source = InMemorySource::new("abc");
        for i in 0..=MAX_LISTING_ENTRIES {
            source.add(format!("many/{i:04}.md"), "# x");
        }

        let entries = list_directory_entries(&source, &repo(), &revision(), "many").await;
        assert_eq!(entries.len(), MAX_LISTING_ENTRIES);
        assert_eq!(entries.last().map(String::as_str), Some("many/0499.md"));
        assert!(!entries.iter().any(|e| e == "many/0500.md"));
    }
}
