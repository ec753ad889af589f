//! The request-to-page pipeline.

use crate::article::render_primary_article;
use crate::compose::{RenderedPage, render_footer, render_header};
use crate::html::escape;
use crate::listing::{ListingOptions, assemble_listing};
use crate::locate::{Content, locate};
use crate::path::{self, LinkBase};
use crate::revision::{RevisionError, resolve_head};
use crate::{ContentSource, RawFile, RepoSource, Revision, SourceError};

/// Shown at the root of a repository without a `README.md`.
pub const ROOT_PLACEHOLDER: &str = "This site has no README.md yet.";
/// Shown when nothing exists at a path.
pub const NOT_FOUND_PLACEHOLDER: &str = "Not found.";

/// Per-site rendering settings.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub stylesheet_href: String,
    pub listing: ListingOptions,
}

/// What a request produced.
#[derive(Debug, Clone)]
pub enum Page {
    Html(RenderedPage),
    Asset(RawFile),
}

/// Failures that end a request instead of degrading the page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Revision(#[from] RevisionError),

    #[error("asset unavailable: {0}")]
    Asset(SourceError),
}

/// Render `request_path` of `repo` into a page.
///
/// Only revision resolution and image fetches can fail; every other miss
/// becomes a placeholder inside an otherwise complete page.
pub async fn render_page<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    link_base: &LinkBase,
    request_path: &str,
    options: &SiteOptions,
) -> Result<Page, PageError> {
    let revision = resolve_head(source, repo).await?;
    let request_path = path::normalize(request_path);

    let content = locate(source, repo, &revision, request_path)
        .await
        .map_err(PageError::Asset)?;

    if let Content::Asset(raw) = content {
        return Ok(Page::Asset(raw));
    }

    let (main, header, footer) = futures::join!(
        render_main(source, repo, &revision, link_base, request_path, content, options),
        render_header(source, repo, &revision, link_base, request_path),
        render_footer(source, repo, &revision),
    );
    let (title, main) = main;

    Ok(Page::Html(RenderedPage {
        title: title.unwrap_or_else(|| repo.to_string()),
        stylesheet_href: options.stylesheet_href.clone(),
        header,
        main,
        footer,
    }))
}

/// Main region HTML and, for single documents, the document title.
async fn render_main<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    revision: &Revision,
    link_base: &LinkBase,
    request_path: &str,
    content: Content,
    options: &SiteOptions,
) -> (Option<String>, String) {
    match content {
        Content::Document { path: file, source: text } => {
            let fallback = path::display_name(&file);
            match render_primary_article(&text, repo, &link_base.href(request_path), fallback) {
                Ok(article) => (Some(article.metadata.title), article.html),
                Err(e) => {
                    tracing::warn!(%repo, %file, "article dropped: {e}");
                    (None, placeholder(NOT_FOUND_PLACEHOLDER))
                }
            }
        }
        Content::Directory { path: dir, entries } => {
            let listing =
                assemble_listing(source, repo, revision, link_base, &entries, options.listing)
                    .await;
            if listing.is_empty() {
                tracing::debug!(%repo, %dir, "directory has no articles");
                (None, placeholder(NOT_FOUND_PLACEHOLDER))
            } else {
                (None, listing.to_html())
            }
        }
        Content::Missing { root: true } => (None, placeholder(ROOT_PLACEHOLDER)),
        Content::Missing { root: false } | Content::Asset(_) => {
            (None, placeholder(NOT_FOUND_PLACEHOLDER))
        }
    }
}

fn placeholder(text: &str) -> String {
    format!("<p>{}</p>\n", escape(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemorySource;

    fn repo() -> RepoSource {
        RepoSource::new("octocat", "site")
    }

    fn options() -> SiteOptions {
        SiteOptions {
            stylesheet_href: "/assets/tailwindcssbase/test".into(),
            listing: ListingOptions::default(),
        }
    }

    async fn html(source: &InMemorySource, link_base: &LinkBase, path: &str) -> RenderedPage {
        match render_page(source, &repo(), link_base, path, &options()).await {
            Ok(Page::Html(page)) => page,
            other => panic!("expected html page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn renders_single_post_with_frontmatter() {
        let source = InMemorySource::new("abc").with(
            "2020/example-post.md",
            "---\ntitle: My Post\ndate: 2021-06-03\n---\nHello there.\n",
        );

        let page = html(&source, &LinkBase::root(), "2020/example-post").await;

        assert_eq!(page.title, "My Post");
        assert!(page.main.starts_with("<article>"));
        assert!(
            page.main
                .contains("<h1><a href=\"/2020/example-post\" rel=\"noopener\">My Post</a></h1>")
        );
        let document = page.to_html();
        assert!(document.contains("<header role=\"banner\">"));
        assert!(document.contains("<main>\n<article>"));
    }

    #[tokio::test]
    async fn renders_directory_listing_newest_first() {
        let source = InMemorySource::new("abc")
            .with("2020/first.md", "---\ntitle: First\ndate: 2020-01-10\n---\n")
            .with("2020/third.md", "---\ntitle: Third\ndate: 2020-09-30\n---\n")
            .with("2020/second.md", "---\ntitle: Second\ndate: 2020-05-03\n---\n");

        let page = html(&source, &LinkBase::root(), "2020").await;

        assert_eq!(page.main.matches("<ul").count(), 1);
        assert_eq!(page.main.matches("<li>").count(), 3);
        let third = page.main.find("Third").unwrap();
        let second = page.main.find("Second").unwrap();
        let first = page.main.find("First").unwrap();
        assert!(third < second && second < first);
        assert!(page.main.contains("September 30, 2020"));
        assert!(page.main.contains("May 03, 2020"));
        assert!(page.main.contains("January 10, 2020"));
    }

    #[tokio::test]
    async fn root_without_readme_renders_placeholder() {
        let source = InMemorySource::new("abc").with("2020/a.md", "# A");

        let page = html(&source, &LinkBase::root(), "").await;

        assert_eq!(page.main, "<p>This site has no README.md yet.</p>\n");
        assert_eq!(page.title, "octocat/site");
        assert!(page.header.contains("<nav>"));
        assert!(page.footer.starts_with("<footer>"));
    }

    #[tokio::test]
    async fn root_renders_readme() {
        let source = InMemorySource::new("abc").with("README.md", "# Welcome\n");

        let page = html(&source, &LinkBase::root(), "/").await;

        assert!(page.main.contains("<h1><a href=\"/\" rel=\"noopener\">Welcome</a></h1>"));
    }

    #[tokio::test]
    async fn unknown_path_renders_not_found_inside_page() {
        let source = InMemorySource::new("abc").with("README.md", "# Home\n");

        let page = html(&source, &LinkBase::root(), "nope/never").await;

        assert_eq!(page.main, "<p>Not found.</p>\n");
    }

    #[tokio::test]
    async fn directory_of_only_subdirectories_is_not_found() {
        let source = InMemorySource::new("abc").with("docs/guides/a.md", "# A\n");

        let page = html(&source, &LinkBase::root(), "docs").await;

        assert_eq!(page.main, "<p>Not found.</p>\n");
        assert!(page.header.contains("href=\"/docs/guides\""));
    }

    #[tokio::test]
    async fn proxied_links_stay_under_prefix() {
        let source = InMemorySource::new("abc").with("2020/post.md", "# Post\n");
        let base = LinkBase::proxied("octocat", "site");

        let listing = html(&source, &base, "2020").await;
        assert!(listing.main.contains("href=\"/github-site/octocat/site/2020/post\""));

        let article = html(&source, &base, "2020/post").await;
        assert!(article.main.contains("href=\"/github-site/octocat/site/2020/post\""));
    }

    #[tokio::test]
    async fn missing_head_aborts_request() {
        let source = InMemorySource::without_head().with("README.md", "# Home\n");

        let result = render_page(&source, &repo(), &LinkBase::root(), "", &options()).await;
        assert!(matches!(result, Err(PageError::Revision(RevisionError::NotFound(_)))));
    }

    #[tokio::test]
    async fn images_pass_through() {
        let mut source = InMemorySource::new("abc");
        source.add_bytes("img/logo.webp", vec![1, 2, 3]);

        let result = render_page(&source, &repo(), &LinkBase::root(), "img/logo.webp", &options())
            .await
            .unwrap();
        assert!(matches!(result, Page::Asset(ref raw) if raw.bytes == vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn missing_image_is_an_asset_error() {
        let source = InMemorySource::new("abc");

        let result =
            render_page(&source, &repo(), &LinkBase::root(), "img/none.png", &options()).await;
        assert!(matches!(result, Err(PageError::Asset(SourceError::NotFound(_)))));
    }
}
