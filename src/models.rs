//! Data models for scraped posts and their processed representations.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`RawPost`]: a post as extracted from a source's news page
//! - [`ReadyPost`]: a filtered, optionally translated post ready for the digest
//! - [`SourceStamp`]: the newest delivered post per source, persisted after a
//!   successful send
//!
//! A post's identity is its `link`; titles are display-only and dates may be
//! absent when a page carries none (or carries one the scraper cannot parse).

use chrono::NaiveDateTime;

/// A post as extracted from a source's news page, before filtering.
///
/// Scrapers drop entries that lack a title or a link during extraction, so
/// both fields are always populated here. `body` holds the teaser text split
/// into trimmed, non-empty paragraphs; sources whose pages carry no teaser
/// produce an empty body.
#[derive(Debug, Clone)]
pub struct RawPost {
    /// Display name of the source the post came from.
    pub source_name: String,
    /// The post headline.
    pub title: String,
    /// Publication timestamp, when the page carries a parseable one.
    pub published_at: Option<NaiveDateTime>,
    /// Permalink of the post. This is the post's identity.
    pub link: String,
    /// Teaser paragraphs, in page order.
    pub body: Vec<String>,
    /// Category tags, for sources that expose them.
    pub tags: Vec<String>,
}

/// A post that survived filtering, ready for the digest composer.
#[derive(Debug, Clone)]
pub struct ReadyPost {
    /// Source display name, used for grouping in the digest.
    pub display_name: String,
    /// The post headline.
    pub title: String,
    /// Publication timestamp, if known.
    pub date: Option<NaiveDateTime>,
    /// Permalink of the post.
    pub link: String,
    /// Body paragraphs, translated when translation succeeded.
    pub paragraphs: Vec<String>,
    /// Category tags carried over from extraction.
    pub tags: Vec<String>,
    /// Language the source publishes in.
    pub source_language: String,
    /// Language the paragraphs are rendered in. Equals `source_language`
    /// unless translation succeeded.
    pub rendered_language: String,
}

impl ReadyPost {
    /// Build a digest-ready post from a raw one.
    ///
    /// `translated` is the outcome of the translation adapter: `Some`
    /// replaces the body paragraphs and marks the post as rendered in
    /// `to_language`; `None` keeps the source-language text.
    pub fn from_raw(
        post: RawPost,
        source_language: &str,
        translated: Option<Vec<String>>,
        to_language: &str,
    ) -> Self {
        let (paragraphs, rendered_language) = match translated {
            Some(text) => (text, to_language.to_string()),
            None => (post.body, source_language.to_string()),
        };
        Self {
            display_name: post.source_name,
            title: post.title,
            date: post.published_at,
            link: post.link,
            paragraphs,
            tags: post.tags,
            source_language: source_language.to_string(),
            rendered_language,
        }
    }

    /// Whether the paragraphs were machine-translated.
    pub fn is_translated(&self) -> bool {
        self.rendered_language != self.source_language
    }
}

/// The newest surviving post of a source, recorded after a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStamp {
    /// Source display name. Unique across sources.
    pub name: String,
    /// URL of the page the source is scraped from. Also unique.
    pub feed_url: String,
    /// Permalink of the newest delivered post.
    pub link: String,
}

impl SourceStamp {
    /// The stamp for a source's newest surviving post, if any survived.
    ///
    /// Survivors keep the page's natural order, newest first, so the first
    /// entry is the one to record.
    pub fn from_newest(name: &str, feed_url: &str, survivors: &[RawPost]) -> Option<Self> {
        survivors.first().map(|post| Self {
            name: name.to_string(),
            feed_url: feed_url.to_string(),
            link: post.link.clone(),
        })
    }
}
