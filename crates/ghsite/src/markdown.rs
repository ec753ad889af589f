//! Markdown to HTML conversion.
//!
//! Frontmatter is split off first; the remaining body goes through
//! `pulldown-cmark` with the GitHub-style extensions most READMEs rely on.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{self, Frontmatter};

/// A rendered markdown document.
#[derive(Debug, Clone)]
pub struct RenderedMarkdown {
    pub html: String,
    pub frontmatter: Frontmatter,
    /// Trimmed text of the first top-level heading, if any.
    pub first_heading: Option<String>,
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Render a markdown source, frontmatter included.
pub fn render(source: &str) -> RenderedMarkdown {
    let doc = frontmatter::parse(source);

    let mut html = String::with_capacity(doc.body.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, Parser::new_ext(&doc.body, options()));

    RenderedMarkdown {
        html,
        first_heading: first_heading(&doc.body),
        frontmatter: doc.frontmatter,
    }
}

/// Plain text of the first `#` heading.
fn first_heading(body: &str) -> Option<String> {
    let mut events = Parser::new_ext(body, options()).skip_while(|event| {
        !matches!(
            event,
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            })
        )
    });

    events.next()?;

    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => break,
            _ => {}
        }
    }

    Some(text.trim().to_owned())
}
