//! A Fleeting Glimpse scraper.
//!
//! Scrapes the front page of [A Fleeting Glimpse](http://www.pinkfloydz.com/),
//! a WordPress site whose post list lives in a `div.wvrx-posts` container
//! with one `<article>` per post. The headline anchor is the one with
//! `rel="bookmark"`, and each article carries a `<time datetime="...">`
//! element with a UTC timestamp.

use chrono::NaiveDateTime;
use scraper::{Html, Selector};
use url::Url;

use crate::models::RawPost;
use crate::utils::split_paragraphs;

pub const NAME: &str = "A Fleeting Glimpse";
pub const PAGE_URL: &str = "http://www.pinkfloydz.com/";

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// Extract posts from the front page.
///
/// Returns `None` when the post list container is missing. Entries without
/// a headline or link are skipped; an unparseable timestamp becomes "no
/// date".
pub(super) fn extract(html: &Html) -> Option<Vec<RawPost>> {
    let container_sel = Selector::parse("div.wvrx-posts").unwrap();
    let article_sel = Selector::parse("article").unwrap();
    let headline_sel = Selector::parse(r#"a[rel="bookmark"]"#).unwrap();
    let time_sel = Selector::parse("time[datetime]").unwrap();
    let summary_sel = Selector::parse("div.entry-summary").unwrap();

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

        let body = article
            .select(&summary_sel)
            .next()
            .map(|summary| split_paragraphs(&summary.text().collect::<Vec<_>>().join("\n")))
            .unwrap_or_default();

        posts.push(RawPost {
            source_name: NAME.to_string(),
            title,
            published_at,
            link: link.to_string(),
            body,
            tags: Vec::new(),
        });
    }
    Some(posts)
}
