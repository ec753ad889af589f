//! Article listings for directory pages.
//!
//! Every markdown entry of a directory is fetched concurrently, its
//! metadata extracted, and the results ordered by [`SortKey`] once all
//! fetches have settled.
//!
//! Subdirectories are not part of a listing; they surface through the
//! header navigation instead.

use futures::future::join_all;

use crate::article::render_secondary_article;
use crate::html::escape;
use crate::markdown;
use crate::metadata::{ArticleMetadata, SortKey};
use crate::path::{self, LinkBase};
use crate::{ContentSource, RepoSource, Revision};

/// One rendered entry of a listing.
#[derive(Debug, Clone)]
pub struct ListingItem {
    pub path: String,
    pub href: String,
    pub metadata: ArticleMetadata,
    /// Full secondary-article rendering, when excerpts are enabled.
    pub excerpt: Option<String>,
}

impl ListingItem {
    pub fn sort_key(&self) -> SortKey {
        self.metadata.sort_key()
    }

    pub fn to_html(&self) -> String {
        let date = match (self.metadata.date, self.metadata.date_label()) {
            (Some(date), Some(label)) => format!(
                "<time datetime=\"{}\">{}</time> ",
                date.format("%Y-%m-%d"),
                escape(&label)
            ),
            _ => String::new(),
        };

        format!(
            "<li>{date}<a href=\"{}\">{}</a>{}</li>\n",
            escape(&self.href),
            escape(&self.metadata.title),
            self.excerpt.as_deref().unwrap_or_default(),
        )
    }
}

/// An ordered listing of a directory's articles.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub items: Vec<ListingItem>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_html(&self) -> String {
        let items: String = self.items.iter().map(ListingItem::to_html).collect();
        format!("<ul class=\"articles\">\n{items}</ul>\n")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListingOptions {
    /// Render each entry's body as a secondary article under its link.
    pub excerpts: bool,
}

/// Fetch, describe and order the markdown entries of a directory.
///
/// Entries that fail to fetch are left out of the listing.
pub async fn assemble_listing<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    revision: &Revision,
    link_base: &LinkBase,
    entries: &[String],
    options: ListingOptions,
) -> Listing {
    let fetches = entries
        .iter()
        .filter(|entry| !path::is_directory_entry(entry) && path::is_markdown(entry))
        .map(|entry| describe_entry(source, repo, revision, link_base, entry, options));

    let mut items: Vec<ListingItem> = join_all(fetches).await.into_iter().flatten().collect();

    items.sort_by_cached_key(ListingItem::sort_key);

    Listing { items }
}

async fn describe_entry<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    revision: &Revision,
    link_base: &LinkBase,
    entry: &str,
    options: ListingOptions,
) -> Option<ListingItem> {
    let text = match source.fetch_file_content(repo, revision, entry).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(%repo, path = %entry, "skipping listing entry: {e}");
            return None;
        }
    };

    let rendered = markdown::render(&text);
    let metadata = ArticleMetadata::extract(&rendered, path::display_name(entry));
    let href = link_base.href(path::article_path(entry));

    let excerpt = if options.excerpts {
        render_secondary_article(&rendered, &metadata, &href)
            .inspect_err(|e| tracing::warn!(path = %entry, "excerpt dropped: {e}"))
            .ok()
    } else {
        None
    };

    Some(ListingItem {
        path: entry.to_owned(),
        href,
        metadata,
        excerpt,
    })
}
