//! Single-pass HTML transforms over rendered markdown.
//!
//! Each [`Transform`] is one streaming `lol_html` pass; [`apply_all`]
//! chains them without building a DOM.

use std::cell::Cell;

use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, element, rewrite_str};

use crate::html::escape;

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("HTML rewrite failed: {0}")]
    Rewrite(String),
}

/// A post-processing pass over rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Anchor the first `<h1>` to `href` and insert `byline` after it.
    PrimaryArticle { href: String, byline: Option<String> },
    /// Anchor the first `<h1>` to `href` and demote it to `<h2>`.
    SecondaryArticle { href: String },
    /// Add `noopener` to the `rel` of every `<a href>`.
    LinkSafety,
}

pub fn apply(html: &str, transform: &Transform) -> Result<String, RewriteError> {
    match transform {
        Transform::PrimaryArticle { href, byline } => {
            anchor_first_heading(html, href, false, byline.as_deref())
        }
        Transform::SecondaryArticle { href } => anchor_first_heading(html, href, true, None),
        Transform::LinkSafety => add_noopener(html),
    }
}

pub fn apply_all(html: &str, transforms: &[Transform]) -> Result<String, RewriteError> {
    transforms
        .iter()
        .try_fold(html.to_owned(), |acc, transform| apply(&acc, transform))
}

fn anchor_first_heading(
    html: &str,
    href: &str,
    demote: bool,
    byline: Option<&str>,
) -> Result<String, RewriteError> {
    let open = format!("<a href=\"{}\">", escape(href));
    let headings = Cell::new(0u32);

    let heading = element!("h1", |el| {
        headings.set(headings.get() + 1);
        if headings.get() > 1 {
            return Ok(());
        }

        if demote {
            el.set_tag_name("h2")?;
        }
        el.prepend(&open, ContentType::Html);
        el.append("</a>", ContentType::Html);
        if let Some(byline) = byline {
            el.after(byline, ContentType::Html);
        }
        Ok(())
    });

    // Anchors cannot nest; links already in the heading give way to ours.
    let inner_link = element!("h1 a", |el| {
        if headings.get() == 1 {
            el.remove_and_keep_content();
        }
        Ok(())
    });

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![heading, inner_link],
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|e| RewriteError::Rewrite(e.to_string()))
}

fn add_noopener(html: &str) -> Result<String, RewriteError> {
    let handler = element!("a[href]", |el| {
        let rel = el.get_attribute("rel").unwrap_or_default();

        if rel
            .split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("noopener"))
        {
            return Ok(());
        }

        let rel = match rel.trim() {
            "" => "noopener".to_owned(),
            existing => format!("{existing} noopener"),
        };
        el.set_attribute("rel", &rel)?;
        Ok(())
    });

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![handler],
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|e| RewriteError::Rewrite(e.to_string()))
}
