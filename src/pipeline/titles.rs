// Title-grouping step: rebuild title groups across all fingerprinted days.
//
// Groups are built from the full historical record set, not just the
// current day: a mirror often shows up days after the original was first
// observed.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::db::models::ScrapedRecord;
use crate::db::Store;
use crate::titles::group_by_title;

/// Rebuild title groups from every stored fingerprint day and upsert them
/// under the given day. Returns the number of groups (≥2 distinct URLs).
pub async fn run(store: &Arc<dyn Store>, day: &str) -> Result<usize> {
    let mut records: Vec<ScrapedRecord> = Vec::new();
    for fingerprint_day in store.fingerprint_days().await? {
        if let Some(index) = store.get_fingerprint_day(&fingerprint_day).await? {
            for entry in index.values() {
                records.extend(entry.records.iter().cloned());
            }
        }
    }

    let groups = group_by_title(&records);
    store.upsert_title_groups(day, &groups).await?;

    info!(day, records = records.len(), groups = groups.len(), "title groups rebuilt");
    Ok(groups.len())
}
