use serde::Deserialize;

/// Raw frontmatter fields parsed from YAML between `---` delimiters.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Frontmatter {
    #[serde(default)]
    pub title: Option<String>,
    /// Kept as a YAML value: `2021-06-03` and `2021` both have to survive.
    #[serde(default)]
    pub date: Option<serde_yaml_ng::Value>,
}

impl Frontmatter {
    /// The `date` field as a string, if it is a scalar.
    pub fn date_string(&self) -> Option<String> {
        match self.date.as_ref()? {
            serde_yaml_ng::Value::String(s) => Some(s.trim().to_owned()),
            serde_yaml_ng::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Result of parsing a markdown document with optional frontmatter.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Parse a markdown document, extracting YAML frontmatter if present.
///
/// Frontmatter must be delimited by `---` on its own line at the very
/// start of the document. Invalid YAML degrades to an empty
/// [`Frontmatter`]; the body is still split off.
pub fn parse(content: &str) -> ParsedDocument {
    let Some((yaml, body)) = split(content) else {
        return ParsedDocument {
            frontmatter: Frontmatter::default(),
            body: content.to_owned(),
        };
    };

    let frontmatter = parse_yaml(yaml).unwrap_or_else(|e| {
        tracing::warn!("ignoring frontmatter: {e}");
        Frontmatter::default()
    });

    ParsedDocument {
        frontmatter,
        body: body.to_owned(),
    }
}

/// Parse the YAML between the delimiters.
pub fn parse_yaml(yaml: &str) -> Result<Frontmatter, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    serde_yaml_ng::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))
}

/// Split a document into its frontmatter block and body.
/// Returns `None` when there is no complete frontmatter block.
fn split(content: &str) -> Option<(&str, &str)> {
    let trimmed = content.trim_start();
    let after_opening = trimmed.strip_prefix("---")?;

    // The opening delimiter must be alone on its line.
    if !after_opening.starts_with('\n') && !after_opening.starts_with("\r\n") {
        return None;
    }

    let end_pos = after_opening.find("\n---")?;
    let yaml = &after_opening[..end_pos];
    let rest = &after_opening[end_pos + 4..];
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    Some((yaml, body))
}

#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_and_date() {
        let content = "\
---
title: My Post
date: 2021-06-03
---
Hello.
";
        let doc = parse(content);

        assert_eq!(doc.frontmatter.title.as_deref(), Some("My Post"));
        assert_eq!(doc.frontmatter.date_string().as_deref(), Some("2021-06-03"));
        assert_eq!(doc.body, "Hello.\n");
    }

    #[test]
    fn parses_missing_optional_fields() {
        let content = "\
---
title: Minimal
---
Body text.
";
        let doc = parse(content);

        assert_eq!(doc.frontmatter.title.as_deref(), Some("Minimal"));
        assert!(doc.frontmatter.date.is_none());
        assert_eq!(doc.body, "Body text.\n");
    }

    #[test]
    fn returns_empty_frontmatter_when_absent() {
        let content = "# Just a markdown file\n\nNo frontmatter here.\n";
        let doc = parse(content);

        assert!(doc.frontmatter.title.is_none());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn returns_whole_body_when_no_closing_delimiter() {
        let content = "\
---
title: Broken
This never closes
";
        let doc = parse(content);

        assert!(doc.frontmatter.title.is_none());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn invalid_yaml_degrades_but_keeps_body() {
        let content = "\
---
title: [unterminated
---
# Still here
";
        let doc = parse(content);

        assert!(doc.frontmatter.title.is_none());
        assert_eq!(doc.body, "# Still here\n");
    }

    #[test]
    fn horizontal_rule_is_not_frontmatter() {
        let content = "---- \n\ntext\n";
        let doc = parse(content);
        assert_eq!(doc.body, content);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let content = "\
---
title: Extended
tags: rust
---
Body.
";
        let doc = parse(content);

        assert_eq!(doc.frontmatter.title.as_deref(), Some("Extended"));
        assert_eq!(doc.body, "Body.\n");
    }

    #[test]
    fn handles_empty_block() {
        let content = "---\n---\nBody.\n";
        let doc = parse(content);

        assert!(doc.frontmatter.title.is_none());
        assert_eq!(doc.body, "Body.\n");
    }

    #[test]
    fn numeric_date_is_stringified() {
        let doc = parse("---\ndate: 2021\n---\n");
        assert_eq!(doc.frontmatter.date_string().as_deref(), Some("2021"));
    }
}
