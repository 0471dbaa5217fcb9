// SqliteStore: rusqlite backend implementing the Store trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is
// !Send. Trait methods lock the mutex, do synchronous rusqlite work, and
// return. The lock is never held across .await points.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::traits::Store;
use crate::db::models::ScrapedRecord;
use crate::fingerprint::index::FingerprintEntry;
use crate::mirror::summary::MirrorReport;
use crate::titles::TitleGroup;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn upsert_scraped_day(&self, day: &str, records: &[ScrapedRecord]) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_scraped_day(&conn, day, records)
    }

    async fn get_scraped_day(&self, day: &str) -> Result<Option<Vec<ScrapedRecord>>> {
        let conn = self.conn.lock().await;
        super::queries::get_scraped_day(&conn, day)
    }

    async fn scraped_days(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        super::queries::scraped_days(&conn)
    }

    async fn upsert_fingerprint_day(
        &self,
        day: &str,
        index: &BTreeMap<String, FingerprintEntry>,
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_fingerprint_day(&conn, day, index)
    }

    async fn get_fingerprint_day(
        &self,
        day: &str,
    ) -> Result<Option<BTreeMap<String, FingerprintEntry>>> {
        let conn = self.conn.lock().await;
        super::queries::get_fingerprint_day(&conn, day)
    }

    async fn fingerprint_days(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        super::queries::fingerprint_days(&conn)
    }

    async fn upsert_title_groups(&self, day: &str, groups: &[TitleGroup]) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_title_groups(&conn, day, groups)
    }

    async fn get_title_groups(&self, day: &str) -> Result<Option<Vec<TitleGroup>>> {
        let conn = self.conn.lock().await;
        super::queries::get_title_groups(&conn, day)
    }

    async fn upsert_mirror_report(&self, day: &str, report: &MirrorReport) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_mirror_report(&conn, day, report)
    }

    async fn get_mirror_report(&self, day: &str) -> Result<Option<MirrorReport>> {
        let conn = self.conn.lock().await;
        super::queries::get_mirror_report(&conn, day)
    }

    async fn mirror_days(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        super::queries::mirror_days(&conn)
    }

    async fn get_job_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_job_state(&conn, key)
    }

    async fn set_job_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_job_state(&conn, key, value)
    }
}
