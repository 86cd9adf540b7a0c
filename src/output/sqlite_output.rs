//! SQLite export sink
//!
//! Each exported crawl appends one `crawls` row, one `pages` row per URL and
//! one `analysis` row, all in a single transaction.

use crate::analysis::CrawlAnalysis;
use crate::output::schema::initialize_schema;
use crate::output::traits::{ExportSink, OutputError, OutputResult, SiteReport};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Aggregate counters of a stored crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAnalysis {
    pub root: String,
    pub crawled_at: String,
    pub analysis: CrawlAnalysis,
}

/// SQLite-backed export sink
pub struct SqliteExport {
    conn: Mutex<Connection>,
}

impl SqliteExport {
    /// Opens (or creates) the export database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteExport)` - Database opened and schema ready
    /// * `Err(OutputError)` - Failed to open or initialize the database
    pub fn open(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> OutputResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| OutputError::Write(format!("Failed to lock database: {}", e)))
    }

    /// Returns the most recent analysis of every crawled root, ordered by root
    pub fn latest_analyses(&self) -> OutputResult<Vec<StoredAnalysis>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT c.root, c.crawled_at,
                    a.total_urls, a.status_2xx, a.status_3xx, a.status_4xx, a.status_5xx,
                    a.fetch_failures, a.blocked_by_robots, a.empty_titles, a.empty_descriptions,
                    a.missing_canonicals, a.noindex, a.orphans, a.non_indexable_canonicals
             FROM crawls c
             JOIN analysis a ON a.crawl_id = c.id
             WHERE c.id IN (SELECT MAX(id) FROM crawls GROUP BY root)
             ORDER BY c.root",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StoredAnalysis {
                root: row.get(0)?,
                crawled_at: row.get(1)?,
                analysis: analysis_from_row(row, 2)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Number of page rows stored for `root` across all its crawls
    pub fn page_count(&self, root: &str) -> OutputResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pages p JOIN crawls c ON p.crawl_id = c.id WHERE c.root = ?1",
            params![root],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl ExportSink for SqliteExport {
    fn export(&self, report: &SiteReport<'_>) -> OutputResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO crawls (root, crawled_at, config_hash) VALUES (?1, ?2, ?3)",
            params![report.root, report.crawled_at.to_rfc3339(), report.config_hash],
        )?;
        let crawl_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO pages (
                    crawl_id, url, status, depth, inlinks, outlinks, indexable, no_index,
                    canonical, title, title_length, description, description_length, h1,
                    h1_length, blocked_by_robots, is_orphan, is_self_canonicalizing,
                    is_canonical_indexable
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            )?;

            for (url, record) in report.result {
                stmt.execute(params![
                    crawl_id,
                    url,
                    record.status,
                    record.depth,
                    record.inlinks,
                    record.outlinks,
                    record.indexable,
                    record.no_index,
                    record.canonical,
                    record.title,
                    record.title_length as i64,
                    record.description,
                    record.description_length as i64,
                    record.h1,
                    record.h1_length as i64,
                    record.blocked_by_robots,
                    record.is_orphan,
                    record.is_self_canonicalizing,
                    record.is_canonical_indexable,
                ])?;
            }
        }

        let a = report.analysis;
        tx.execute(
            "INSERT INTO analysis (
                crawl_id, total_urls, status_2xx, status_3xx, status_4xx, status_5xx,
                fetch_failures, blocked_by_robots, empty_titles, empty_descriptions,
                missing_canonicals, noindex, orphans, non_indexable_canonicals
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                crawl_id,
                a.total_urls as i64,
                a.status_2xx as i64,
                a.status_3xx as i64,
                a.status_4xx as i64,
                a.status_5xx as i64,
                a.fetch_failures as i64,
                a.blocked_by_robots as i64,
                a.empty_titles as i64,
                a.empty_descriptions as i64,
                a.missing_canonicals as i64,
                a.noindex as i64,
                a.orphans as i64,
                a.non_indexable_canonicals as i64,
            ],
        )?;

        tx.commit()?;

        tracing::debug!(
            "Exported {} pages of {} to SQLite (crawl {})",
            report.result.len(),
            report.root,
            crawl_id
        );

        Ok(())
    }
}

/// Reads the 13 analysis counters starting at column `first`
fn analysis_from_row(row: &Row<'_>, first: usize) -> rusqlite::Result<CrawlAnalysis> {
    let count = |offset: usize| -> rusqlite::Result<usize> {
        row.get::<_, i64>(first + offset).map(|v| v as usize)
    };

    Ok(CrawlAnalysis {
        total_urls: count(0)?,
        status_2xx: count(1)?,
        status_3xx: count(2)?,
        status_4xx: count(3)?,
        status_5xx: count(4)?,
        fetch_failures: count(5)?,
        blocked_by_robots: count(6)?,
        empty_titles: count(7)?,
        empty_descriptions: count(8)?,
        missing_canonicals: count(9)?,
        noindex: count(10)?,
        orphans: count(11)?,
        non_indexable_canonicals: count(12)?,
    })
}
