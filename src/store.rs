//! SQLite-backed record of the latest delivered post per source.
//!
//! Two tables: `sources` (one row per configured site, created lazily on
//! first successful delivery) and `snapshots` (the latest delivered post of
//! each source). The store holds exactly one snapshot row per source:
//! recording a new post deletes the source's previous rows and inserts the
//! new one inside a single transaction, so readers never observe a source
//! with a half-replaced snapshot.
//!
//! The store assumes a single process and a single run at a time; there is
//! no locking beyond the transaction itself.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::SourceStamp;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    feed_url TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL REFERENCES sources(id) ON DELETE CASCADE,
    url TEXT NOT NULL,
    taken_at TEXT NOT NULL,
    is_latest INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_snapshots_source_id ON snapshots(source_id);
"#;

/// Handle to the snapshot database.
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open (or create) the file-backed store and apply the schema.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// In-memory store. Used by tests; nothing survives the handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// The latest recorded post URL of every source.
    ///
    /// Set semantics: post URLs are globally unique across sources, so a
    /// flat set is enough to bound the already-delivered filter.
    pub fn latest_urls(&self) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM snapshots WHERE is_latest = 1")?;
        let urls = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        Ok(urls)
    }

    /// Record a source's newest delivered post, replacing whatever was there.
    ///
    /// Runs in one transaction: find-or-create the source row, delete all of
    /// its snapshot rows, insert the new one marked latest. Must only be
    /// called for sources that actually delivered a post this run; sources
    /// with nothing new keep their previous snapshot.
    pub fn replace_latest(&mut self, stamp: &SourceStamp, ts: NaiveDateTime) -> Result<()> {
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM sources WHERE name = ?1 AND feed_url = ?2",
                params![stamp.name, stamp.feed_url],
                |row| row.get(0),
            )
            .optional()?;
        let source_id = match existing {
            Some(id) => id,
            None => {
                info!(name = %stamp.name, feed_url = %stamp.feed_url, "a new source added");
                tx.execute(
                    "INSERT INTO sources (name, feed_url) VALUES (?1, ?2)",
                    params![stamp.name, stamp.feed_url],
                )?;
                tx.last_insert_rowid()
            }
        };

        let dropped = tx.execute(
            "DELETE FROM snapshots WHERE source_id = ?1",
            params![source_id],
        )?;
        if dropped > 0 {
            debug!(source = %stamp.name, dropped, "previous snapshot rows replaced");
        }
        tx.execute(
            "INSERT INTO snapshots (source_id, url, taken_at, is_latest) VALUES (?1, ?2, ?3, 1)",
            params![
                source_id,
                stamp.link,
                ts.format("%Y-%m-%d %H:%M:%S").to_string()
            ],
        )?;

        tx.commit()?;
        debug!(source = %stamp.name, url = %stamp.link, "recorded latest post");
        Ok(())
    }

    /// Total number of snapshot rows. Logged after each run.
    pub fn snapshot_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 7, 14)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn stamp(name: &str, link: &str) -> SourceStamp {
        SourceStamp {
            name: name.to_string(),
            feed_url: format!("http://{}.example.com/", name.to_lowercase().replace(' ', "-")),
            link: link.to_string(),
        }
    }

    #[test]
    fn test_empty_store_has_no_urls() {
        let store = SnapshotStore::open_in_memory().unwrap();
        assert!(store.latest_urls().unwrap().is_empty());
        assert_eq!(store.snapshot_count().unwrap(), 0);
    }

    #[test]
    fn test_replace_latest_is_exact() {
        let mut store = SnapshotStore::open_in_memory().unwrap();
        store
            .replace_latest(&stamp("Brain Damage", "http://example.com/first"), ts())
            .unwrap();
        assert_eq!(
            store.latest_urls().unwrap(),
            HashSet::from(["http://example.com/first".to_string()])
        );

        store
            .replace_latest(&stamp("Brain Damage", "http://example.com/second"), ts())
            .unwrap();
        let urls = store.latest_urls().unwrap();
        assert_eq!(urls, HashSet::from(["http://example.com/second".to_string()]));
        assert!(!urls.contains("http://example.com/first"));
        assert_eq!(store.snapshot_count().unwrap(), 1);
    }

    #[test]
    fn test_one_row_per_source() {
        let mut store = SnapshotStore::open_in_memory().unwrap();
        let names = ["A Fleeting Glimpse", "Brain Damage", "Floydian Slip", "Pulse & Spirit"];
        for (i, name) in names.iter().enumerate() {
            store
                .replace_latest(&stamp(name, &format!("http://example.com/{i}")), ts())
                .unwrap();
        }
        assert_eq!(store.snapshot_count().unwrap(), 4);
        assert_eq!(store.latest_urls().unwrap().len(), 4);
    }

    #[test]
    fn test_replacement_leaves_other_sources_untouched() {
        let mut store = SnapshotStore::open_in_memory().unwrap();
        let names = ["A Fleeting Glimpse", "Brain Damage", "Floydian Slip", "Pulse & Spirit"];
        for (i, name) in names.iter().enumerate() {
            store
                .replace_latest(&stamp(name, &format!("http://example.com/old-{i}")), ts())
                .unwrap();
        }

        // A later run delivers new posts for two of the four sources.
        store
            .replace_latest(&stamp("Brain Damage", "http://example.com/new-1"), ts())
            .unwrap();
        store
            .replace_latest(&stamp("Pulse & Spirit", "http://example.com/new-3"), ts())
            .unwrap();

        let urls = store.latest_urls().unwrap();
        assert_eq!(store.snapshot_count().unwrap(), 4);
        assert!(urls.contains("http://example.com/old-0"));
        assert!(urls.contains("http://example.com/new-1"));
        assert!(urls.contains("http://example.com/old-2"));
        assert!(urls.contains("http://example.com/new-3"));
        assert!(!urls.contains("http://example.com/old-1"));
        assert!(!urls.contains("http://example.com/old-3"));
    }

    #[test]
    fn test_source_row_is_reused_across_runs() {
        let mut store = SnapshotStore::open_in_memory().unwrap();
        store
            .replace_latest(&stamp("Brain Damage", "http://example.com/a"), ts())
            .unwrap();
        store
            .replace_latest(&stamp("Brain Damage", "http://example.com/b"), ts())
            .unwrap();
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM sources", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_full_cycle_records_newest_surviving_link_per_source() {
        use crate::filters::{self, AlreadyDelivered, Filter};
        use crate::models::RawPost;

        let mut store = SnapshotStore::open_in_memory().unwrap();
        let names = ["A Fleeting Glimpse", "Brain Damage", "Floydian Slip", "Pulse & Spirit"];

        // Each source's page lists three posts, newest first; the oldest
        // one of every source was delivered by the previous run.
        let feeds: Vec<Vec<RawPost>> = names
            .iter()
            .map(|name| {
                (0..3)
                    .map(|i| RawPost {
                        source_name: name.to_string(),
                        title: format!("{name} post {i}"),
                        published_at: None,
                        link: format!("http://example.com/{name}/{i}"),
                        body: Vec::new(),
                        tags: Vec::new(),
                    })
                    .collect()
            })
            .collect();
        let sent_before: HashSet<String> = names
            .iter()
            .map(|name| format!("http://example.com/{name}/2"))
            .collect();

        let chain: Vec<Box<dyn Filter>> = vec![Box::new(AlreadyDelivered::new(sent_before))];
        for (name, feed) in names.iter().zip(feeds) {
            let surviving = filters::filter_feed(feed, &chain);
            assert_eq!(surviving.len(), 2);
            let feed_url = format!("http://example.com/{name}/");
            let stamp = SourceStamp::from_newest(name, &feed_url, &surviving).unwrap();
            store.replace_latest(&stamp, ts()).unwrap();
        }

        assert_eq!(store.snapshot_count().unwrap(), 4);
        let urls = store.latest_urls().unwrap();
        for name in names {
            assert!(urls.contains(&format!("http://example.com/{name}/0")), "{name}");
        }
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aggregations.db");
        let path = path.to_str().unwrap();

        {
            let mut store = SnapshotStore::open(path).unwrap();
            store
                .replace_latest(&stamp("Brain Damage", "http://example.com/persisted"), ts())
                .unwrap();
        }

        let store = SnapshotStore::open(path).unwrap();
        assert_eq!(
            store.latest_urls().unwrap(),
            HashSet::from(["http://example.com/persisted".to_string()])
        );
    }
}
