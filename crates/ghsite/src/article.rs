use crate::html::escape;
use crate::markdown::{self, RenderedMarkdown};
use crate::metadata::ArticleMetadata;
use crate::rewrite::{self, RewriteError, Transform};
use crate::RepoSource;

/// A markdown document rendered as an `<article>`.
#[derive(Debug, Clone)]
pub struct Article {
    pub metadata: ArticleMetadata,
    pub html: String,
}

/// Render the sole article of a page: heading kept at `<h1>`, linked to
/// `href`, followed by the attribution byline.
pub fn render_primary_article(
    source: &str,
    repo: &RepoSource,
    href: &str,
    fallback_title: &str,
) -> Result<Article, RewriteError> {
    let rendered = markdown::render(source);
    let metadata = ArticleMetadata::extract(&rendered, fallback_title);

    let transforms = [
        Transform::PrimaryArticle {
            href: href.to_owned(),
            byline: Some(byline(repo, &metadata)),
        },
        Transform::LinkSafety,
    ];
    let body = rewrite::apply_all(&with_title_heading(&rendered), &transforms)?;

    Ok(Article {
        html: format!("<article>\n{body}</article>\n"),
        metadata,
    })
}

/// Render one of several articles on a page: heading demoted to `<h2>`.
pub fn render_secondary_article(
    rendered: &RenderedMarkdown,
    metadata: &ArticleMetadata,
    href: &str,
) -> Result<String, RewriteError> {
    let transforms = [
        Transform::SecondaryArticle {
            href: href.to_owned(),
        },
        Transform::LinkSafety,
    ];
    let body = rewrite::apply_all(&with_title_heading(rendered), &transforms)?;

    let date = metadata
        .date_label()
        .map(|label| format!("<p class=\"date\">{}</p>\n", escape(&label)))
        .unwrap_or_default();

    Ok(format!("<article>\n{body}{date}</article>\n"))
}

/// Documents titled only in frontmatter get that title as their heading.
fn with_title_heading(rendered: &RenderedMarkdown) -> String {
    match (&rendered.first_heading, &rendered.frontmatter.title) {
        (None, Some(title)) if !title.trim().is_empty() => {
            format!("<h1>{}</h1>\n{}", escape(title.trim()), rendered.html)
        }
        _ => rendered.html.clone(),
    }
}

fn byline(repo: &RepoSource, metadata: &ArticleMetadata) -> String {
    let date = match (metadata.date, metadata.date_label()) {
        (Some(date), Some(label)) => format!(
            " <time datetime=\"{}\">{}</time>",
            date.format("%Y-%m-%d"),
            escape(&label)
        ),
        _ => String::new(),
    };

    format!(
        "<p class=\"byline\"><img src=\"{avatar}?size=48\" alt=\"\" width=\"24\" height=\"24\"> \
         <a href=\"{url}\">{owner}</a>{date}</p>",
        avatar = escape(&repo.profile_image_url()),
        url = escape(&repo.html_url()),
        owner = escape(&repo.owner),
    )
}
