// Fingerprint step: build and persist a day's fingerprint index.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::db::Store;
use crate::fingerprint::index::build_index;
use crate::topics::lexicon::LexiconClassifier;

/// Build the fingerprint index for the day's scraped records and upsert it.
/// Returns the number of distinct fingerprint entries. A day with no
/// scraped records yields zero entries, not an error.
pub async fn run(store: &Arc<dyn Store>, day: &str) -> Result<usize> {
    let Some(records) = store.get_scraped_day(day).await? else {
        warn!(day, "no scraped records for day, skipping fingerprint step");
        return Ok(0);
    };

    let index = build_index(&records, &LexiconClassifier);
    store.upsert_fingerprint_day(day, &index).await?;

    info!(
        day,
        records = records.len(),
        entries = index.len(),
        "fingerprint index built"
    );
    Ok(index.len())
}
