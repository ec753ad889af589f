pub mod article;
pub mod compose;
pub mod frontmatter;
pub mod html;
pub mod listing;
pub mod locate;
pub mod markdown;
pub mod metadata;
pub mod path;
pub mod revision;
pub mod rewrite;
pub mod site;
pub mod source;

pub use article::{Article, render_primary_article, render_secondary_article};
pub use compose::{RenderedPage, compose};
pub use frontmatter::{Frontmatter, FrontmatterError, ParsedDocument, parse as parse_frontmatter};
pub use listing::{Listing, ListingItem, ListingOptions, assemble_listing};
pub use locate::{Content, MAX_LISTING_ENTRIES, locate};
pub use markdown::{RenderedMarkdown, render as render_markdown};
pub use metadata::{ArticleMetadata, SortKey};
pub use path::LinkBase;
pub use revision::{RevisionError, resolve_head};
pub use rewrite::{RewriteError, Transform};
pub use site::{Page, PageError, SiteOptions, render_page};
pub use source::{ContentSource, RawFile, Reference, RepoSource, Revision, SourceError};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
