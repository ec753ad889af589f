//! Page regions and the surrounding document.

use crate::html::escape;
use crate::locate::list_directory_entries;
use crate::markdown;
use crate::path::{self, LinkBase};
use crate::rewrite::{self, Transform};
use crate::{ContentSource, RepoSource, Revision};

/// Site-wide header document at the repository root.
pub const HEADER_FILE: &str = "_header.md";
/// Site-wide footer document at the repository root.
pub const FOOTER_FILE: &str = "_footer.md";

/// The three regions of a page plus what the `<head>` needs.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub title: String,
    pub stylesheet_href: String,
    pub header: String,
    pub main: String,
    pub footer: String,
}

impl RenderedPage {
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n\
             <link rel=\"stylesheet\" href=\"{stylesheet}\">\n\
             </head>\n\
             <body>\n\
             {body}\
             </body>\n\
             </html>\n",
            title = escape(&self.title),
            stylesheet = escape(&self.stylesheet_href),
            body = compose(&self.header, &self.main, &self.footer),
        )
    }
}

/// Header in a banner landmark, main content in a main landmark, then
/// the footer.
pub fn compose(header: &str, main: &str, footer: &str) -> String {
    format!("<header role=\"banner\">\n{header}</header>\n<main>\n{main}</main>\n{footer}")
}

/// Navigation list linking each subdirectory entry to its own page.
/// `None` when there are no subdirectories.
pub fn navigation(link_base: &LinkBase, entries: &[String]) -> Option<String> {
    let links: String = entries
        .iter()
        .filter(|entry| path::is_directory_entry(entry))
        .map(|entry| {
            format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                escape(&link_base.href(entry)),
                escape(path::display_name(entry)),
            )
        })
        .collect();

    if links.is_empty() {
        return None;
    }

    Some(format!("<nav>\n<ul>\n{links}</ul>\n</nav>\n"))
}

/// `_header.md` if the repository has one, otherwise navigation built
/// from the subdirectories of `dir`.
pub async fn render_header<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    revision: &Revision,
    link_base: &LinkBase,
    dir: &str,
) -> String {
    if let Some(html) = render_partial(source, repo, revision, HEADER_FILE).await {
        return html;
    }

    let entries = list_directory_entries(source, repo, revision, dir).await;
    navigation(link_base, &entries).unwrap_or_default()
}

/// `_footer.md` wrapped in a `<footer>`, or a default footer crediting
/// the source repository.
pub async fn render_footer<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    revision: &Revision,
) -> String {
    match render_partial(source, repo, revision, FOOTER_FILE).await {
        Some(html) => format!("<footer>\n{html}</footer>\n"),
        None => default_footer(repo),
    }
}

pub fn default_footer(repo: &RepoSource) -> String {
    format!(
        "<footer>\n<p><img src=\"{avatar}?size=32\" alt=\"\" width=\"16\" height=\"16\"> \
         <a href=\"{url}\" rel=\"noopener\">{name}</a></p>\n</footer>\n",
        avatar = escape(&repo.profile_image_url()),
        url = escape(&repo.html_url()),
        name = escape(&repo.to_string()),
    )
}

/// Render an optional markdown partial with the link-safety pass.
async fn render_partial<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoSource,
    revision: &Revision,
    file: &str,
) -> Option<String> {
    let text = match source.fetch_file_content(repo, revision, file).await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(%repo, %file, "no partial: {e}");
            return None;
        }
    };

    let rendered = markdown::render(&text);
    rewrite::apply(&rendered.html, &Transform::LinkSafety)
        .inspect_err(|e| tracing::warn!(%repo, %file, "partial dropped: {e}"))
        .ok()
}
