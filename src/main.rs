//! # Floydian Newsletter
//!
//! A news aggregation pipeline that scrapes a fixed set of Pink Floyd fan
//! sites, keeps only the posts published since the previous run, translates
//! non-English posts when a translation key is configured, and mails the
//! result as a single HTML digest to a mailing list.
//!
//! ## Features
//!
//! - Scrapes posts from four sources (A Fleeting Glimpse, Brain Damage,
//!   Floydian Slip, and Pulse & Spirit), each with its own page structure
//! - Filters out previously delivered posts and known noise posts
//! - Translates German posts to English via the Yandex translate API
//! - Sends one digest per run over authenticated implicit-TLS SMTP
//! - Records each source's newest delivered post in a local SQLite database
//!
//! ## Usage
//!
//! ```sh
//! floydian_newsletter -c cfg.json -d aggregations.db
//! ```
//!
//! ## Architecture
//!
//! The application runs the pipeline once per invocation, sequentially:
//! 1. **Scraping**: Fetch each source's news page and extract raw posts
//! 2. **Filtering**: Drop already-delivered and noise posts
//! 3. **Translation**: Normalize non-English posts to English, best effort
//! 4. **Delivery**: Render the digest and send it to the recipient list
//! 5. **Recording**: On a successful send, record each source's newest post
//!
//! A failing source degrades to an empty contribution; a failing send aborts
//! the run before anything is recorded, so the next run delivers the same
//! posts again rather than losing them.

use std::error::Error;

use chrono::Local;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod filters;
mod mailer;
mod models;
mod outputs;
mod scrapers;
mod store;
mod translate;
mod utils;

use cli::Cli;
use config::Settings;
use filters::{AlreadyDelivered, Filter, PreviewOrSonglist};
use mailer::Mailer;
use models::{ReadyPost, SourceStamp};
use store::SnapshotStore;
use translate::Translator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("floydian_newsletter starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, ?args.database, "Parsed CLI arguments");

    // Invalid configuration is fatal; nothing runs with a bad recipient list
    // or relay address.
    let settings = Settings::load(&args.config)?;
    info!(
        config = %args.config,
        recipients = settings.sendto.len(),
        translation = settings.translate_key.is_some(),
        "Loaded configuration"
    );

    let mut store = SnapshotStore::open(&args.database)?;
    let sent_before = store.latest_urls()?;
    info!(count = sent_before.len(), "Loaded previously delivered post URLs");

    let feed_filters: Vec<Box<dyn Filter>> = vec![
        Box::new(AlreadyDelivered::new(sent_before)),
        Box::new(PreviewOrSonglist),
    ];
    let translator = Translator::new(settings.translate_key.clone());

    // ---- Scrape, filter and enrich, source by source ----
    let mut digest_posts: Vec<ReadyPost> = Vec::new();
    let mut stamps: Vec<SourceStamp> = Vec::new();

    for (source, raw_posts) in scrapers::fetch_all().await {
        let fetched = raw_posts.len();
        let surviving = filters::filter_feed(raw_posts, &feed_filters);
        info!(
            source = %source.name,
            fetched,
            surviving = surviving.len(),
            "Filtered feed"
        );

        // The newest survivor becomes the source's recorded post, but only
        // after the digest actually goes out.
        if let Some(stamp) = SourceStamp::from_newest(source.name, source.page_url, &surviving) {
            stamps.push(stamp);
        }

        for post in surviving {
            // The translator reports "no translation" for every failure
            // mode; the post then keeps its source-language text.
            let translated = if source.language != "en" && !post.body.is_empty() {
                translator.translate(&post.body, source.language, "en").await
            } else {
                None
            };
            digest_posts.push(ReadyPost::from_raw(post, source.language, translated, "en"));
        }
    }

    // No survivors anywhere: no digest, no session, no database writes.
    if digest_posts.is_empty() {
        info!("There are no updates");
        return Ok(());
    }

    // ---- Compose and send ----
    let password = match args.smtp_password {
        Some(password) => password,
        None => rpassword::prompt_password(format!("Password for {}: ", settings.mailer.sender))?,
    };

    let send_date = Local::now().format("%Y-%m-%d").to_string();
    let digest = outputs::html::render_digest(&digest_posts, &send_date);
    info!(posts = digest_posts.len(), bytes = digest.len(), "Rendered digest");

    let mailer = Mailer::new(&settings.mailer, password)?;
    // A send failure propagates here, before any snapshot is recorded.
    mailer
        .send_digest(digest, &settings.sendto, &send_date)
        .await?;

    // ---- Record the newest delivered post per source ----
    let ts = Local::now().naive_local();
    for stamp in &stamps {
        store.replace_latest(stamp, ts)?;
    }
    info!(entries = store.snapshot_count()?, "Database updated");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        posts = digest_posts.len(),
        sources_updated = stamps.len(),
        "Execution complete"
    );

    Ok(())
}
