//! Database schema for the SQLite export

/// SQL schema for the export database
pub const SCHEMA_SQL: &str = r#"
-- One row per exported site crawl
CREATE TABLE IF NOT EXISTS crawls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    root TEXT NOT NULL,
    crawled_at TEXT NOT NULL,
    config_hash TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crawls_root ON crawls(root);

-- One row per URL of a crawl
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    crawl_id INTEGER NOT NULL REFERENCES crawls(id),
    url TEXT NOT NULL,
    status INTEGER NOT NULL,
    depth INTEGER NOT NULL,
    inlinks INTEGER NOT NULL,
    outlinks INTEGER NOT NULL,
    indexable INTEGER NOT NULL,
    no_index INTEGER NOT NULL,
    canonical TEXT NOT NULL,
    title TEXT NOT NULL,
    title_length INTEGER NOT NULL,
    description TEXT NOT NULL,
    description_length INTEGER NOT NULL,
    h1 TEXT NOT NULL,
    h1_length INTEGER NOT NULL,
    blocked_by_robots INTEGER NOT NULL,
    is_orphan INTEGER NOT NULL,
    is_self_canonicalizing INTEGER NOT NULL,
    is_canonical_indexable INTEGER NOT NULL,
    UNIQUE(crawl_id, url)
);

CREATE INDEX IF NOT EXISTS idx_pages_crawl ON pages(crawl_id);

-- Aggregate counters, one row per crawl
CREATE TABLE IF NOT EXISTS analysis (
    crawl_id INTEGER PRIMARY KEY REFERENCES crawls(id),
    total_urls INTEGER NOT NULL,
    status_2xx INTEGER NOT NULL,
    status_3xx INTEGER NOT NULL,
    status_4xx INTEGER NOT NULL,
    status_5xx INTEGER NOT NULL,
    fetch_failures INTEGER NOT NULL,
    blocked_by_robots INTEGER NOT NULL,
    empty_titles INTEGER NOT NULL,
    empty_descriptions INTEGER NOT NULL,
    missing_canonicals INTEGER NOT NULL,
    noindex INTEGER NOT NULL,
    orphans INTEGER NOT NULL,
    non_indexable_canonicals INTEGER NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["crawls", "pages", "analysis"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
