use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::markdown::RenderedMarkdown;

/// Title and publication date of a markdown article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub title: String,
    pub date: Option<DateTime<Utc>>,
}

impl ArticleMetadata {
    /// Frontmatter wins over the first heading; `fallback` covers
    /// documents that have neither.
    pub fn extract(rendered: &RenderedMarkdown, fallback: &str) -> Self {
        let title = rendered
            .frontmatter
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .or_else(|| rendered.first_heading.clone().filter(|t| !t.is_empty()))
            .unwrap_or_else(|| fallback.to_owned());

        let date = rendered
            .frontmatter
            .date_string()
            .and_then(|s| parse_date(&s));

        Self { title, date }
    }

    pub fn sort_key(&self) -> SortKey {
        match self.date {
            Some(date) => SortKey::Timestamp(date.timestamp_millis()),
            None => SortKey::Title(self.title.clone()),
        }
    }

    /// `MMMM dd, yyyy`, e.g. "June 03, 2021".
    pub fn date_label(&self) -> Option<String> {
        self.date.map(|d| format_date(&d))
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Parse an ISO-8601 date or date-time. Anything else is `None`.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Ordering key for listing entries.
///
/// Dated entries sort newest first and ahead of every undated entry;
/// undated entries compare by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Timestamp(i64),
    Title(String),
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Timestamp(a), Self::Timestamp(b)) => b.cmp(a),
            (Self::Timestamp(_), Self::Title(_)) => Ordering::Less,
            (Self::Title(_), Self::Timestamp(_)) => Ordering::Greater,
            (Self::Title(a), Self::Title(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::render;

    #[test]
    fn frontmatter_title_wins_over_heading() {
        let rendered = render("---\ntitle: From Front\n---\n# From Heading\n");
        let meta = ArticleMetadata::extract(&rendered, "file");
        assert_eq!(meta.title, "From Front");
    }

    #[test]
    fn heading_title_is_the_default() {
        let rendered = render("# From Heading \n\nbody\n");
        let meta = ArticleMetadata::extract(&rendered, "file");
        assert_eq!(meta.title, "From Heading");
        assert!(meta.date.is_none());
    }

    #[test]
    fn fallback_when_no_title_anywhere() {
        let rendered = render("body only\n");
        let meta = ArticleMetadata::extract(&rendered, "file");
        assert_eq!(meta.title, "file");
    }

    #[test]
    fn unparseable_date_is_dropped() {
        let rendered = render("---\ntitle: T\ndate: last tuesday\n---\n");
        let meta = ArticleMetadata::extract(&rendered, "file");
        assert!(meta.date.is_none());
        assert_eq!(meta.sort_key(), SortKey::Title("T".into()));
    }

    #[test]
    fn formats_date_label() {
        let rendered = render("---\ntitle: T\ndate: 2021-06-03\n---\n");
        let meta = ArticleMetadata::extract(&rendered, "file");
        assert_eq!(meta.date_label().as_deref(), Some("June 03, 2021"));
    }

    #[test]
    fn parses_date_time_forms() {
        assert!(parse_date("2021-06-03T10:00:00Z").is_some());
        assert!(parse_date("2021-06-03T10:00:00+02:00").is_some());
        assert!(parse_date("2021-06-03T10:00:00").is_some());
        assert!(parse_date("2021-06-03").is_some());
        assert!(parse_date("06/03/2021").is_none());
        assert!(parse_date("2021-13-40").is_none());
    }

    #[test]
    fn dated_keys_sort_newest_first_then_titles() {
        let mut keys = vec![
            SortKey::Title("beta".into()),
            SortKey::Timestamp(1),
            SortKey::Title("alpha".into()),
            SortKey::Timestamp(3),
            SortKey::Timestamp(2),
        ];
        keys.sort();

        assert_eq!(
            keys,
            vec![
                SortKey::Timestamp(3),
                SortKey::Timestamp(2),
                SortKey::Timestamp(1),
                SortKey::Title("alpha".into()),
                SortKey::Title("beta".into()),
            ]
        );
    }
}
