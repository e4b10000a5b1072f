//! Floydian Slip scraper.
//!
//! Scrapes the news page of [Floydian Slip](https://www.floydianslip.com/),
//! the syndicated radio show's site. Posts live in a `div.posts` container,
//! one `<article>` each, with the headline under `h2.entry-title` and a
//! date-only `span.date` like "July 14, 2016".
//!
//! The page mixes real news with weekly broadcast previews and songlists;
//! those are weeded out later by the feed filters, not here.

use chrono::{NaiveDate, NaiveDateTime};
use scraper::{Html, Selector};
use url::Url;

use crate::models::RawPost;
use crate::utils::split_paragraphs;

pub const NAME: &str = "Floydian Slip";
pub const PAGE_URL: &str = "https://www.floydianslip.com/news/";

const DATE_FORMAT: &str = "%B %d, %Y";

/// Extract posts from the news page.
///
/// Returns `None` when the post container is missing; entries without a
/// headline or link are skipped.
pub(super) fn extract(html: &Html) -> Option<Vec<RawPost>> {
    let container_sel = Selector::parse("div.posts").unwrap();
    let article_sel = Selector::parse("article").unwrap();
    let headline_sel = Selector::parse("h2.entry-title a").unwrap();
    let date_sel = Selector::parse("span.date").unwrap();
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

        let published_at: Option<NaiveDateTime> = article
            .select(&date_sel)
            .next()
            .map(|span| span.text().collect::<String>().trim().to_string())
            .and_then(|text| NaiveDate::parse_from_str(&text, DATE_FORMAT).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0));

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
