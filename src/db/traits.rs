// Store trait: backend-agnostic async interface for per-day documents.
//
// The pipeline exchanges whole-day documents with its storage collaborator:
// fetch-by-date, fetch-all-days, and upsert-by-date (last write for a date
// wins). All methods are async so a sync backend (rusqlite via Mutex) and a
// native async one can sit behind the same interface. A store failure is
// the only hard error a pipeline step propagates.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::db::models::ScrapedRecord;
use crate::fingerprint::index::FingerprintEntry;
use crate::mirror::summary::MirrorReport;
use crate::titles::TitleGroup;

#[async_trait]
pub trait Store: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Scraped records ---

    async fn upsert_scraped_day(&self, day: &str, records: &[ScrapedRecord]) -> Result<()>;
    async fn get_scraped_day(&self, day: &str) -> Result<Option<Vec<ScrapedRecord>>>;
    /// All days with scraped records, ascending.
    async fn scraped_days(&self) -> Result<Vec<String>>;

    // --- Fingerprint index ---

    async fn upsert_fingerprint_day(
        &self,
        day: &str,
        index: &BTreeMap<String, FingerprintEntry>,
    ) -> Result<()>;
    async fn get_fingerprint_day(
        &self,
        day: &str,
    ) -> Result<Option<BTreeMap<String, FingerprintEntry>>>;
    /// All days with a fingerprint index, ascending.
    async fn fingerprint_days(&self) -> Result<Vec<String>>;

    // --- Title groups ---

    async fn upsert_title_groups(&self, day: &str, groups: &[TitleGroup]) -> Result<()>;
    async fn get_title_groups(&self, day: &str) -> Result<Option<Vec<TitleGroup>>>;

    // --- Mirror reports ---

    async fn upsert_mirror_report(&self, day: &str, report: &MirrorReport) -> Result<()>;
    async fn get_mirror_report(&self, day: &str) -> Result<Option<MirrorReport>>;
    /// All days with a mirror report, ascending.
    async fn mirror_days(&self) -> Result<Vec<String>>;

    // --- Job state ---

    /// Get a bookkeeping value by key (e.g. "last_run_day").
    async fn get_job_state(&self, key: &str) -> Result<Option<String>>;

    /// Set a bookkeeping value (upsert).
    async fn set_job_state(&self, key: &str, value: &str) -> Result<()>;
}
