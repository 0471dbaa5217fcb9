// Query functions: synchronous rusqlite operations on per-day documents.
//
// Free functions over &Connection, wrapped by the async Store trait in
// sqlite.rs. Serialization happens here so callers hand over structured
// documents and never see JSON.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::db::models::ScrapedRecord;
use crate::fingerprint::index::FingerprintEntry;
use crate::mirror::summary::MirrorReport;
use crate::titles::TitleGroup;

// --- Scraped records ---

pub fn upsert_scraped_day(conn: &Connection, day: &str, records: &[ScrapedRecord]) -> Result<()> {
    let content = serde_json::to_string(records)?;
    conn.execute(
        "INSERT INTO scraped_days (day, content, record_count, updated_at)
         VALUES (?1, ?2, ?3, datetime('now'))
         ON CONFLICT(day) DO UPDATE SET
             content = excluded.content,
             record_count = excluded.record_count,
             updated_at = datetime('now')",
        rusqlite::params![day, content, records.len() as i64],
    )
    .with_context(|| format!("Failed to upsert scraped records for {day}"))?;
    Ok(())
}

pub fn get_scraped_day(conn: &Connection, day: &str) -> Result<Option<Vec<ScrapedRecord>>> {
    let content: Option<String> = conn
        .query_row(
            "SELECT content FROM scraped_days WHERE day = ?1",
            [day],
            |row| row.get(0),
        )
        .optional()?;
    content
        .map(|json| serde_json::from_str(&json).context("Corrupt scraped_days document"))
        .transpose()
}

pub fn scraped_days(conn: &Connection) -> Result<Vec<String>> {
    list_days(conn, "SELECT day FROM scraped_days ORDER BY day")
}

// --- Fingerprint index ---

pub fn upsert_fingerprint_day(
    conn: &Connection,
    day: &str,
    index: &BTreeMap<String, FingerprintEntry>,
) -> Result<()> {
    let content = serde_json::to_string(index)?;
    conn.execute(
        "INSERT INTO fingerprint_days (day, content, entry_count, updated_at)
         VALUES (?1, ?2, ?3, datetime('now'))
         ON CONFLICT(day) DO UPDATE SET
             content = excluded.content,
             entry_count = excluded.entry_count,
             updated_at = datetime('now')",
        rusqlite::params![day, content, index.len() as i64],
    )
    .with_context(|| format!("Failed to upsert fingerprint index for {day}"))?;
    Ok(())
}

pub fn get_fingerprint_day(
    conn: &Connection,
    day: &str,
) -> Result<Option<BTreeMap<String, FingerprintEntry>>> {
    let content: Option<String> = conn
        .query_row(
            "SELECT content FROM fingerprint_days WHERE day = ?1",
            [day],
            |row| row.get(0),
        )
        .optional()?;
    content
        .map(|json| serde_json::from_str(&json).context("Corrupt fingerprint_days document"))
        .transpose()
}

pub fn fingerprint_days(conn: &Connection) -> Result<Vec<String>> {
    list_days(conn, "SELECT day FROM fingerprint_days ORDER BY day")
}

// --- Title groups ---

pub fn upsert_title_groups(conn: &Connection, day: &str, groups: &[TitleGroup]) -> Result<()> {
    let content = serde_json::to_string(groups)?;
    conn.execute(
        "INSERT INTO title_group_days (day, content, group_count, updated_at)
         VALUES (?1, ?2, ?3, datetime('now'))
         ON CONFLICT(day) DO UPDATE SET
             content = excluded.content,
             group_count = excluded.group_count,
             updated_at = datetime('now')",
        rusqlite::params![day, content, groups.len() as i64],
    )
    .with_context(|| format!("Failed to upsert title groups for {day}"))?;
    Ok(())
}

pub fn get_title_groups(conn: &Connection, day: &str) -> Result<Option<Vec<TitleGroup>>> {
    let content: Option<String> = conn
        .query_row(
            "SELECT content FROM title_group_days WHERE day = ?1",
            [day],
            |row| row.get(0),
        )
        .optional()?;
    content
        .map(|json| serde_json::from_str(&json).context("Corrupt title_group_days document"))
        .transpose()
}

// --- Mirror reports ---

pub fn upsert_mirror_report(conn: &Connection, day: &str, report: &MirrorReport) -> Result<()> {
    let content = serde_json::to_string(report)?;
    conn.execute(
        "INSERT INTO mirror_days (day, content, cluster_count, updated_at)
         VALUES (?1, ?2, ?3, datetime('now'))
         ON CONFLICT(day) DO UPDATE SET
             content = excluded.content,
             cluster_count = excluded.cluster_count,
             updated_at = datetime('now')",
        rusqlite::params![day, content, report.mirror_clusters.len() as i64],
    )
    .with_context(|| format!("Failed to upsert mirror report for {day}"))?;
    Ok(())
}

pub fn get_mirror_report(conn: &Connection, day: &str) -> Result<Option<MirrorReport>> {
    let content: Option<String> = conn
        .query_row(
            "SELECT content FROM mirror_days WHERE day = ?1",
            [day],
            |row| row.get(0),
        )
        .optional()?;
    content
        .map(|json| serde_json::from_str(&json).context("Corrupt mirror_days document"))
        .transpose()
}

pub fn mirror_days(conn: &Connection) -> Result<Vec<String>> {
    list_days(conn, "SELECT day FROM mirror_days ORDER BY day")
}

// --- Job state ---

pub fn get_job_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM job_state WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

pub fn set_job_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO job_state (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             updated_at = datetime('now')",
        [key, value],
    )?;
    Ok(())
}

fn list_days(conn: &Connection, sql: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let days = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(days)
}
