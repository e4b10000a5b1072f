//! Site scrapers for the configured news sources.
//!
//! This module contains one submodule per source. Each submodule owns the
//! one truly bespoke piece of the pipeline: the structural rule that turns
//! that site's news page into a list of [`RawPost`]s (container selector,
//! headline anchor, date format, optional tags and teaser text).
//!
//! # Supported sources
//!
//! | Source | Module | Language | Notes |
//! |--------|--------|----------|-------|
//! | A Fleeting Glimpse | [`afg`] | en | WordPress post list |
//! | Brain Damage | [`braindamage`] | en | Headline/body come as table pairs |
//! | Floydian Slip | [`floydianslip`] | en | Weekly broadcast site, news page |
//! | Pulse & Spirit | [`pulseandspirit`] | de | German, translated before sending |
//!
//! # Common behavior
//!
//! [`fetch_posts`] drives every source the same way: download the page
//! (non-success status or a non-HTML content type is a fetch failure),
//! parse it, and run the source's extraction rule (a missing article
//! container is a format failure). Both failures are logged and yield an
//! empty list, so one broken site never takes down the run. Entries without
//! a headline or link are skipped silently; an unparseable date becomes
//! "no date". Posts come back in page order, newest first.

use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{error, info, instrument};

use crate::error::AppError;
use crate::models::RawPost;

pub mod afg;
pub mod braindamage;
pub mod floydianslip;
pub mod pulseandspirit;

/// Which bespoke extraction rule a source uses. Adding a source means
/// adding a variant, a module, and a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteRule {
    FleetingGlimpse,
    BrainDamage,
    FloydianSlip,
    PulseAndSpirit,
}

/// A configured scraping target.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    /// Display name, unique across sources.
    pub name: &'static str,
    /// The news page this source is scraped from.
    pub page_url: &'static str,
    /// Language the source publishes in.
    pub language: &'static str,
    rule: SiteRule,
}

/// All configured sources, in delivery order.
pub static SOURCES: [Source; 4] = [
    Source {
        name: afg::NAME,
        page_url: afg::PAGE_URL,
        language: "en",
        rule: SiteRule::FleetingGlimpse,
    },
    Source {
        name: braindamage::NAME,
        page_url: braindamage::PAGE_URL,
        language: "en",
        rule: SiteRule::BrainDamage,
    },
    Source {
        name: floydianslip::NAME,
        page_url: floydianslip::PAGE_URL,
        language: "en",
        rule: SiteRule::FloydianSlip,
    },
    Source {
        name: pulseandspirit::NAME,
        page_url: pulseandspirit::PAGE_URL,
        language: "de",
        rule: SiteRule::PulseAndSpirit,
    },
];

impl Source {
    /// Run this source's extraction rule against a parsed page.
    ///
    /// `None` means the expected article container is missing (the page
    /// layout changed or an error page came back).
    pub fn extract(&self, html: &Html) -> Option<Vec<RawPost>> {
        match self.rule {
            SiteRule::FleetingGlimpse => afg::extract(html),
            SiteRule::BrainDamage => braindamage::extract(html),
            SiteRule::FloydianSlip => floydianslip::extract(html),
            SiteRule::PulseAndSpirit => pulseandspirit::extract(html),
        }
    }
}

/// Download a source's news page.
///
/// A non-success status or a content type other than HTML counts as a
/// failed download, matching how an error page would otherwise slip
/// through to the extraction rule.
#[instrument(level = "info", skip_all, fields(url = %source.page_url))]
async fn download_page(source: &Source) -> Result<String, AppError> {
    let response = reqwest::get(source.page_url).await.map_err(|e| AppError::Fetch {
        url: source.page_url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Fetch {
            url: source.page_url.to_string(),
            reason: format!("status {status}"),
        });
    }
    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("text/html"))
        .unwrap_or(false);
    if !is_html {
        return Err(AppError::Fetch {
            url: source.page_url.to_string(),
            reason: "content type is not text/html".to_string(),
        });
    }

    response.text().await.map_err(|e| AppError::Fetch {
        url: source.page_url.to_string(),
        reason: e.to_string(),
    })
}

/// Download a source's page and run its extraction rule.
async fn collect_posts(source: &Source) -> Result<Vec<RawPost>, AppError> {
    let html = download_page(source).await?;
    if html.trim().is_empty() {
        return Err(AppError::Fetch {
            url: source.page_url.to_string(),
            reason: "page is empty".to_string(),
        });
    }
    let document = Html::parse_document(&html);
    source.extract(&document).ok_or_else(|| AppError::PageFormat {
        url: source.page_url.to_string(),
    })
}

/// Fetch one source's page and extract its posts.
///
/// Never fails: download and page-format problems are logged and yield an
/// empty list so the run continues with the other sources.
#[instrument(level = "info", skip_all, fields(source = %source.name))]
pub async fn fetch_posts(source: &Source) -> Vec<RawPost> {
    match collect_posts(source).await {
        Ok(posts) => {
            info!(count = posts.len(), "extracted posts");
            posts
        }
        Err(e) => {
            error!(error = %e, "source contributes no posts this run");
            Vec::new()
        }
    }
}

/// Fetch every configured source, one after another, in registry order.
pub async fn fetch_all() -> Vec<(Source, Vec<RawPost>)> {
    stream::iter(SOURCES.iter())
        .then(|source| async move { (*source, fetch_posts(source).await) })
        .collect()
        .await
}
