//! Admission predicates applied to the scraped feed before composing.
//!
//! A [`Filter`] is a pure predicate over a [`RawPost`]: it admits or rejects
//! a post and has no side effects beyond diagnostic logging. [`filter_feed`]
//! composes any number of filters with AND semantics, so the surviving set
//! does not depend on filter order; filters are still evaluated in list
//! order to keep the log readable.
//!
//! Two filters are defined:
//! - [`AlreadyDelivered`] drops posts whose link was recorded as a source's
//!   latest delivered post, using a set loaded once per run.
//! - [`PreviewOrSonglist`] drops Floydian Slip's broadcast preview and
//!   songlist posts, which are weekly housekeeping rather than news.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::RawPost;
use crate::scrapers::floydianslip;

/// An admission predicate over a single post.
pub trait Filter {
    /// Whether the post should stay in the feed.
    fn admit(&self, post: &RawPost) -> bool;
}

/// Filter the feed with a set of admitting predicates.
///
/// A post survives iff every filter admits it. Filters are pure, so the
/// result is the same for any predicate order.
pub fn filter_feed(feed: Vec<RawPost>, filters: &[Box<dyn Filter>]) -> Vec<RawPost> {
    feed.into_iter()
        .filter(|post| filters.iter().all(|f| f.admit(post)))
        .collect()
}

/// Rejects posts that were already delivered in a previous run.
///
/// The "already sent" set is a point-in-time snapshot of the store's latest
/// recorded URLs, loaded once per run rather than queried per post.
pub struct AlreadyDelivered {
    sent_before: HashSet<String>,
}

impl AlreadyDelivered {
    pub fn new(sent_before: HashSet<String>) -> Self {
        Self { sent_before }
    }
}

impl Filter for AlreadyDelivered {
    fn admit(&self, post: &RawPost) -> bool {
        let fresh = !self.sent_before.contains(&post.link);
        if fresh {
            debug!(link = %post.link, "approved: not previously published");
        } else {
            warn!(link = %post.link, "ignored: previously published");
        }
        fresh
    }
}

static PREVIEW_OR_SONGLIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://www\.floydianslip\.com/news/\d+/\d+/floydian-slip-(preview|songlist)-\d+/$",
    )
    .unwrap()
});

/// Rejects Floydian Slip's broadcast preview and songlist posts.
///
/// Posts from every other source pass through untouched.
pub struct PreviewOrSonglist;

impl Filter for PreviewOrSonglist {
    fn admit(&self, post: &RawPost) -> bool {
        if post.source_name != floydianslip::NAME {
            return true;
        }
        if let Some(caps) = PREVIEW_OR_SONGLIST.captures(&post.link) {
            warn!(link = %post.link, kind = &caps[1], "ignored: broadcast housekeeping post");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(source_name: &str, link: &str) -> RawPost {
        RawPost {
            source_name: source_name.to_string(),
            title: "Any Name".to_string(),
            published_at: None,
            link: link.to_string(),
            body: vec!["Here comes a text".to_string()],
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_songlist_post_is_rejected() {
        let filter = PreviewOrSonglist;
        let songlist = post(
            floydianslip::NAME,
            "http://www.floydianslip.com/news/2016/07/floydian-slip-songlist-1057/",
        );
        assert!(!filter.admit(&songlist));
    }

    #[test]
    fn test_preview_post_is_rejected() {
        let filter = PreviewOrSonglist;
        let preview = post(
            floydianslip::NAME,
            "http://www.floydianslip.com/news/2016/07/floydian-slip-preview-1058/",
        );
        assert!(!filter.admit(&preview));
    }

    #[test]
    fn test_regular_floydian_slip_post_is_admitted() {
        let filter = PreviewOrSonglist;
        let news = post(
            floydianslip::NAME,
            "http://www.floydianslip.com/news/2016/07/floydian-slip-coming-to-kcut-102-9-fm-moab-ut/",
        );
        assert!(filter.admit(&news));
    }

    #[test]
    fn test_other_sources_are_never_touched() {
        let filter = PreviewOrSonglist;
        // A link that would match the pattern, but from a different source.
        let other = post(
            "Brain Damage",
            "http://www.brain-damage.co.uk/latest/david-gilmour-in-pompeii-guardian-photo-essay.html",
        );
        assert!(filter.admit(&other));
    }

    #[test]
    fn test_already_delivered_rejects_recorded_link() {
        let sent: HashSet<String> =
            ["http://example.com/old".to_string()].into_iter().collect();
        let filter = AlreadyDelivered::new(sent);
        assert!(!filter.admit(&post("Brain Damage", "http://example.com/old")));
        assert!(filter.admit(&post("Brain Damage", "http://example.com/new")));
    }

    #[test]
    fn test_already_delivered_is_idempotent() {
        let sent: HashSet<String> =
            ["http://example.com/old".to_string()].into_iter().collect();
        let feed = vec![
            post("Brain Damage", "http://example.com/old"),
            post("Brain Damage", "http://example.com/new"),
        ];
        let filters: Vec<Box<dyn Filter>> = vec![Box::new(AlreadyDelivered::new(sent.clone()))];
        let once = filter_feed(feed, &filters);
        let twice = filter_feed(once.clone(), &filters);
        let links = |posts: &[RawPost]| posts.iter().map(|p| p.link.clone()).collect::<Vec<_>>();
        assert_eq!(links(&once), links(&twice));
        assert_eq!(links(&once), vec!["http://example.com/new"]);
    }

    #[test]
    fn test_filter_feed_is_order_independent() {
        let sent: HashSet<String> = [
            "http://www.floydianslip.com/news/2016/07/floydian-slip-coming-to-kcut-102-9-fm-moab-ut/"
                .to_string(),
        ]
        .into_iter()
        .collect();
        let feed = vec![
            post(
                floydianslip::NAME,
                "http://www.floydianslip.com/news/2016/07/floydian-slip-songlist-1057/",
            ),
            post(
                floydianslip::NAME,
                "http://www.floydianslip.com/news/2016/07/floydian-slip-coming-to-kcut-102-9-fm-moab-ut/",
            ),
            post(floydianslip::NAME, "http://www.floydianslip.com/news/2016/08/new-affiliate/"),
        ];

        let forward: Vec<Box<dyn Filter>> = vec![
            Box::new(AlreadyDelivered::new(sent.clone())),
            Box::new(PreviewOrSonglist),
        ];
        let backward: Vec<Box<dyn Filter>> = vec![
            Box::new(PreviewOrSonglist),
            Box::new(AlreadyDelivered::new(sent)),
        ];

        let links = |posts: &[RawPost]| posts.iter().map(|p| p.link.clone()).collect::<Vec<_>>();
        assert_eq!(
            links(&filter_feed(feed.clone(), &forward)),
            links(&filter_feed(feed, &backward))
        );
    }

    #[test]
    fn test_filter_feed_without_filters_keeps_everything() {
        let feed = vec![post("Brain Damage", "http://example.com/a")];
        assert_eq!(filter_feed(feed, &[]).len(), 1);
    }
}
