// Per-day batch pipeline steps.
//
// Each step takes the store and its inputs explicitly, reads the documents
// it needs, runs a pure core function, and upserts the result under the
// processing day. Per-record and per-group anomalies are absorbed inside
// the steps; only store failures propagate.

pub mod fingerprints;
pub mod ingest;
pub mod mirrors;
pub mod titles;

use std::sync::Arc;

use anyhow::Result;

use crate::db::Store;
use crate::mirror::engine::MirrorThresholds;
use crate::mirror::summary::MirrorReport;

/// Job-state key recording the last day the full chain completed.
pub const LAST_RUN_DAY: &str = "last_run_day";

/// Run the full chain for one day: fingerprints -> title groups -> mirror
/// detection. Records the day in job state on success.
pub async fn run_day(
    store: &Arc<dyn Store>,
    day: &str,
    concurrency: usize,
) -> Result<MirrorReport> {
    fingerprints::run(store, day).await?;
    titles::run(store, day).await?;
    let report = mirrors::run(store, day, concurrency, MirrorThresholds::default()).await?;
    store.set_job_state(LAST_RUN_DAY, day).await?;
    Ok(report)
}
