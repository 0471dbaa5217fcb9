// Ingestion: load a day's scraped-records file into the store.
//
// The crawler hands over a JSON array of records; this is the boundary
// where the document shape is validated into the typed schema. Records
// with malformed timestamps are kept (collected_at becomes None) rather
// than rejected; the taxonomy treats that as a local, non-fatal anomaly.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::db::models::ScrapedRecord;
use crate::db::Store;

/// Ingest a scraped-records JSON file under the given day.
/// Returns the number of records stored.
pub async fn run(store: &Arc<dyn Store>, path: &Path, day: &str) -> Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<ScrapedRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid scraped-records array", path.display()))?;

    store.upsert_scraped_day(day, &records).await?;
    info!(day, records = records.len(), "scraped records ingested");
    Ok(records.len())
}
