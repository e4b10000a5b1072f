//! Brain Damage scraper.
//!
//! Scrapes the main page of [Brain Damage](http://www.brain-damage.co.uk/),
//! a Joomla-era site. The blog container is a `table.blog` whose posts come
//! as alternating `table.contentpaneopen` elements: even ones hold the
//! headline, odd ones the body with the creation date in `td.createdate`.
//! Dates are date-only, formatted like "Thursday, 14 July 2016".

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use scraper::{Html, Selector};
use url::Url;

use crate::models::RawPost;
use crate::utils::split_paragraphs;

pub const NAME: &str = "Brain Damage";
pub const PAGE_URL: &str = "http://www.brain-damage.co.uk/index.php";

const DATE_FORMAT: &str = "%A, %d %B %Y";

/// Extract posts from the main page.
///
/// Returns `None` when the blog container is missing. A dangling headline
/// table without its body counterpart is ignored, as are entries without a
/// headline or link.
pub(super) fn extract(html: &Html) -> Option<Vec<RawPost>> {
    let container_sel = Selector::parse("table.blog").unwrap();
    let pane_sel = Selector::parse("table.contentpaneopen").unwrap();
    let headline_sel = Selector::parse("a.contentpagetitle").unwrap();
    let created_sel = Selector::parse("td.createdate").unwrap();
    let paragraph_sel = Selector::parse("p").unwrap();

    let container = html.select(&container_sel).next()?;
    let base = Url::parse(PAGE_URL).unwrap();

    let mut posts = Vec::new();
    // Headline and body arrive as alternating tables; walk them in pairs.
    for (headline_pane, body_pane) in container.select(&pane_sel).tuples() {
        let Some(headline) = headline_pane.select(&headline_sel).next() else {
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

        let published_at: Option<NaiveDateTime> = body_pane
            .select(&created_sel)
            .next()
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .and_then(|text| NaiveDate::parse_from_str(&text, DATE_FORMAT).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0));

        let body = split_paragraphs(
            &body_pane
                .select(&paragraph_sel)
                .map(|p| p.text().collect::<Vec<_>>().join(" "))
                .collect::<Vec<_>>()
                .join("\n"),
        );

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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    // The contentpaneopen tables sit inside a cell of the blog table, as
    // on the real page; a table nested directly inside a table would be
    // foster-parented out of the container by the HTML parser.
    const PAGE: &str = r#"
        <html><body>
        <table class="blog"><tr><td>
            <table class="contentpaneopen">
                <tr><td><a class="contentpagetitle" href="/latest/gilmour-pompeii.html"> David Gilmour in Pompeii </a></td></tr>
            </table>
            <table class="contentpaneopen">
                <tr><td class="createdate"> Thursday, 14 July 2016 </td></tr>
                <tr><td><p>Filmed across two nights.</p><p>Tickets on sale now.</p></td></tr>
            </table>
            <table class="contentpaneopen">
                <tr><td><a class="contentpagetitle" href="/latest/unreadable-date.html">Post with broken date</a></td></tr>
            </table>
            <table class="contentpaneopen">
                <tr><td class="createdate">14/07/2016</td></tr>
            </table>
            <table class="contentpaneopen">
                <tr><td>No headline anchor here</td></tr>
            </table>
            <table class="contentpaneopen">
                <tr><td class="createdate">Thursday, 14 July 2016</td></tr>
            </table>
        </td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_pairs_headline_and_body_tables() {
        let html = Html::parse_document(PAGE);
        let posts = extract(&html).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "David Gilmour in Pompeii");
        assert_eq!(
            posts[0].link,
            "http://www.brain-damage.co.uk/latest/gilmour-pompeii.html"
        );
    }

    #[test]
    fn test_parses_long_form_date_at_midnight() {
        let html = Html::parse_document(PAGE);
        let posts = extract(&html).unwrap();
        let date = posts[0].published_at.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2016, 7, 14));
        assert_eq!(date.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_unparseable_date_is_none() {
        let html = Html::parse_document(PAGE);
        let posts = extract(&html).unwrap();
        assert_eq!(posts[1].title, "Post with broken date");
        assert!(posts[1].published_at.is_none());
    }

    #[test]
    fn test_pair_without_headline_is_dropped() {
        let html = Html::parse_document(PAGE);
        let posts = extract(&html).unwrap();
        assert!(posts.iter().all(|p| !p.title.contains("No headline")));
    }

    #[test]
    fn test_body_paragraphs_come_from_the_body_pane() {
        let html = Html::parse_document(PAGE);
        let posts = extract(&html).unwrap();
        assert_eq!(
            posts[0].body,
            vec!["Filmed across two nights.", "Tickets on sale now."]
        );
    }

    #[test]
    fn test_missing_container_is_a_format_problem() {
        let html = Html::parse_document("<html><body><table></table></body></html>");
        assert!(extract(&html).is_none());
    }
}
