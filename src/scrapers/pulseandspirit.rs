//! Pulse & Spirit scraper.
//!
//! Scrapes the front page of [Pulse & Spirit](http://www.pulse-and-spirit.com/),
//! a German fan site. Posts live under `section.content`, one `<article>`
//! each, with a `rel="bookmark"` headline anchor, a local-time
//! `<time datetime="...">` stamp, category tags as `rel="category tag"`
//! anchors, and teaser paragraphs in `div.entry-content`.
//!
//! Posts are in German; the pipeline translates their teaser text before
//! composing the digest.

use chrono::NaiveDateTime;
use scraper::{Html, Selector};
use url::Url;

use crate::models::RawPost;
use crate::utils::split_paragraphs;

pub const NAME: &str = "Pulse & Spirit";
pub const PAGE_URL: &str = "http://www.pulse-and-spirit.com/";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Extract posts from the front page.
///
/// Returns `None` when the content section is missing; entries without a
/// headline or link are skipped.
pub(super) fn extract(html: &Html) -> Option<Vec<RawPost>> {
    let container_sel = Selector::parse("section.content").unwrap();
    let article_sel = Selector::parse("article").unwrap();
    let headline_sel = Selector::parse(r#"a[rel="bookmark"]"#).unwrap();
    let time_sel = Selector::parse("time[datetime]").unwrap();
    let tag_sel = Selector::parse(r#"a[rel="category tag"]"#).unwrap();
    let content_sel = Selector::parse("div.entry-content").unwrap();

    let container = html.select(&container_sel).next()?;
    let base = Url::parse(PAGE_URL).unwrap();

    let mut posts = Vec::new();
    for article in container.select(&article_sel) {
        let Some(headline) = article.select(&headline_sel).next() else {
            continue;
        };
        let title = headline.text().collect::<Vec<_>>().join(" ").trim().to_string();
        let Some(href) = headline.value().attr("href") else {
            continue;
        };
        let Ok(link) = base.join(href) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let published_at = article
            .select(&time_sel)
            .next()
            .and_then(|time| time.value().attr("datetime"))
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, DATE_FORMAT).ok());

        let tags = article
            .select(&tag_sel)
            .map(|tag| tag.text().collect::<String>().trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        let body = article
            .select(&content_sel)
            .next()
            .map(|content| split_paragraphs(&content.text().collect::<Vec<_>>().join("\n")))
            .unwrap_or_default();

        posts.push(RawPost {
            source_name: NAME.to_string(),
            title,
            published_at,
            link: link.to_string(),
            body,
            tags,
        });
    }
    Some(posts)
}
