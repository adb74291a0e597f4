//! Link discovery and article extraction heuristics.
//!
//! Both halves are pure functions over fetched page content:
//!
//! - [`discover_links`] pulls every hyperlink target out of a seed section
//!   page, resolved to absolute http(s) URLs. No attempt is made to tell
//!   article links from navigation or ads; that judgment happens at
//!   extraction time.
//! - [`extract_article`] decides whether a candidate page looks like an
//!   article and, if so, produces its structured fields. Returning `None`
//!   is the common case (section indexes, navigation pages, paywall stubs)
//!   and is not an error.

use chrono::NaiveDate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Minimum body length for a page to count as an article.
pub const MIN_BODY_CHARS: usize = 200;

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static OG_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static ARTICLE_P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article p").unwrap());
static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static PUBLISHED_TIME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="article:published_time"]"#).unwrap());
static TIME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("time[datetime]").unwrap());
static AUTHOR_META_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="author"], meta[property="article:author"]"#).unwrap()
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap());

/// Structured fields of a plausible article page, before publication and
/// section tags are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedArticle {
    pub title: String,
    pub text: String,
    pub date: Option<NaiveDate>,
    pub authors: Vec<String>,
}

/// Pull all hyperlink targets from a page, resolved against the page's own
/// URL, filtered to absolute http(s) links, deduplicated within the page in
/// first-seen order.
pub fn discover_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|url| url.to_string())
        .unique()
        .collect()
}

/// Attempt structured extraction from a candidate page.
///
/// Requires a non-empty title and at least [`MIN_BODY_CHARS`] characters of
/// body text; otherwise the page is not an article and `None` is returned.
/// Publish date and authors are best-effort and may be absent. No partial
/// record is ever produced.
pub fn extract_article(html: &str) -> Option<ExtractedArticle> {
    let document = Html::parse_document(html);
    let title = extract_title(&document)?;
    let text = extract_body(&document)?;
    let date = extract_date(&document, html);
    let authors = extract_authors(&document);
    Some(ExtractedArticle {
        title,
        text,
        date,
        authors,
    })
}

/// Title preference: `og:title` meta, then `<title>`, then the first `<h1>`.
fn extract_title(document: &Html) -> Option<String> {
    if let Some(meta) = document.select(&OG_TITLE_SELECTOR).next() {
        if let Some(content) = meta.value().attr("content") {
            let title = content.trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    for selector in [&*TITLE_SELECTOR, &*H1_SELECTOR] {
        if let Some(element) = document.select(selector).next() {
            let title = element.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                return Some(title);
            }
        }
    }
    None
}

/// Body heuristic: paragraphs inside `<article>` first, falling back to all
/// paragraphs on the page. The page must clear [`MIN_BODY_CHARS`].
fn extract_body(document: &Html) -> Option<String> {
    for selector in [&*ARTICLE_P_SELECTOR, &*P_SELECTOR] {
        let text = document
            .select(selector)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|paragraph| !paragraph.is_empty())
            .join("\n\n");
        if text.chars().count() >= MIN_BODY_CHARS {
            return Some(text);
        }
    }
    None
}

/// Date preference: `article:published_time` meta, then `<time datetime>`,
/// then the first `YYYY-MM-DD` pattern anywhere in the markup that parses
/// to a real date.
fn extract_date(document: &Html, html: &str) -> Option<NaiveDate> {
    let meta_value = document
        .select(&PUBLISHED_TIME_SELECTOR)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .or_else(|| {
            document
                .select(&TIME_SELECTOR)
                .next()
                .and_then(|time| time.value().attr("datetime"))
        });
    if let Some(date) = meta_value.and_then(parse_date_prefix) {
        return Some(date);
    }
    DATE_RE
        .find_iter(html)
        .filter_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
        .next()
}

/// Parse the `YYYY-MM-DD` prefix of a date or datetime string.
fn parse_date_prefix(value: &str) -> Option<NaiveDate> {
    value
        .get(0..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Author names from `author` / `article:author` meta tags, split on commas,
/// deduplicated in page order.
fn extract_authors(document: &Html) -> Vec<String> {
    document
        .select(&AUTHOR_META_SELECTOR)
        .filter_map(|meta| meta.value().attr("content"))
        .flat_map(|content| content.split(','))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_dedups_within_a_page() {
        let html = r##"<html><body>
            <a href="http://x.test/a">A</a>
            <a href="http://x.test/b">B</a>
            <a href="http://x.test/a">A again</a>
            <a href="http://x.test/c">C</a>
        </body></html>"##;
        let base = Url::parse("http://x.test/biz").unwrap();
        assert_eq!(
            discover_links(html, &base),
            ["http://x.test/a", "http://x.test/b", "http://x.test/c"]
        );
    }

    #[test]
    fn discovery_resolves_relative_links() {
        let html = r#"<a href="/story/1">one</a> <a href="story/2">two</a>"#;
        let base = Url::parse("http://x.test/biz/").unwrap();
        assert_eq!(
            discover_links(html, &base),
            ["http://x.test/story/1", "http://x.test/biz/story/2"]
        );
    }

    #[test]
    fn discovery_drops_pseudo_links() {
        let html = r#"
            <a href="javascript:void(0)">js</a>
            <a href="mailto:tips@x.test">mail</a>
            <a href="http://x.test/real">real</a>
        "#;
        let base = Url::parse("http://x.test/").unwrap();
        assert_eq!(discover_links(html, &base), ["http://x.test/real"]);
    }

    fn article_html(body_chars: usize) -> String {
        format!(
            r#"<html><head>
                <title>Market rallies on harvest news</title>
                <meta property="article:published_time" content="2024-05-06T09:30:00Z">
                <meta name="author" content="A. Writer, B. Reporter">
            </head><body><article><p>{}</p></article></body></html>"#,
            "x".repeat(body_chars)
        )
    }

    #[test]
    fn extracts_a_full_article() {
        let article = extract_article(&article_html(250)).unwrap();
        assert_eq!(article.title, "Market rallies on harvest news");
        assert_eq!(article.text.chars().count(), 250);
        assert_eq!(article.date, NaiveDate::from_ymd_opt(2024, 5, 6));
        assert_eq!(article.authors, ["A. Writer", "B. Reporter"]);
    }

    #[test]
    fn short_body_is_a_miss() {
        assert!(extract_article(&article_html(199)).is_none());
        assert!(extract_article(&article_html(MIN_BODY_CHARS)).is_some());
    }

    #[test]
    fn missing_title_is_a_miss() {
        let html = format!("<html><body><p>{}</p></body></html>", "x".repeat(300));
        assert!(extract_article(&html).is_none());
    }

    #[test]
    fn og_title_wins_over_title_tag() {
        let html = format!(
            r#"<html><head>
                <title>x.test | story</title>
                <meta property="og:title" content="The real headline">
            </head><body><p>{}</p></body></html>"#,
            "x".repeat(300)
        );
        assert_eq!(extract_article(&html).unwrap().title, "The real headline");
    }

    #[test]
    fn date_falls_back_to_pattern_in_markup() {
        let html = format!(
            r#"<html><head><title>T</title></head>
            <body><p>Published 2023-11-02 by staff. {}</p></body></html>"#,
            "x".repeat(300)
        );
        assert_eq!(
            extract_article(&html).unwrap().date,
            NaiveDate::from_ymd_opt(2023, 11, 2)
        );
    }

    #[test]
    fn missing_date_and_authors_are_allowed() {
        let html = format!(
            "<html><head><title>T</title></head><body><p>{}</p></body></html>",
            "x".repeat(300)
        );
        let article = extract_article(&html).unwrap();
        assert_eq!(article.date, None);
        assert!(article.authors.is_empty());
    }
}
