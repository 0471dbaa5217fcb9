// Database schema: table creation.
//
// One row per (kind, day): the day's whole document as JSON in the content
// column, mirroring the upsert-by-date semantics the pipeline needs (last
// write for a date wins). A schema_version table is kept for future
// migrations.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet. Idempotent, safe to call on
/// every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- A day's scraped records, as ingested from the crawler
        CREATE TABLE IF NOT EXISTS scraped_days (
            day TEXT PRIMARY KEY,              -- YYYY-MM-DD
            content TEXT NOT NULL,             -- JSON array of records
            record_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- A day's fingerprint index: content fingerprint -> entry
        CREATE TABLE IF NOT EXISTS fingerprint_days (
            day TEXT PRIMARY KEY,
            content TEXT NOT NULL,             -- JSON object keyed by fingerprint
            entry_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Title groups rebuilt from the full historical record set
        CREATE TABLE IF NOT EXISTS title_group_days (
            day TEXT PRIMARY KEY,
            content TEXT NOT NULL,             -- JSON array of {title, urls}
            group_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- A day's mirror report: clusters plus summary
        CREATE TABLE IF NOT EXISTS mirror_days (
            day TEXT PRIMARY KEY,
            content TEXT NOT NULL,             -- JSON {mirror_clusters, summary}
            cluster_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Pipeline bookkeeping (e.g. the last completed run day)
        CREATE TABLE IF NOT EXISTS job_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
