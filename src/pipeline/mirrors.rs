// Mirror-detection step: cluster each title group, then number and
// summarize the results.
//
// Group clustering is embarrassingly parallel: every group's union-find,
// pairwise comparisons, and vectorization are local to that group, so the
// groups fan out over spawn_blocking workers. Cluster ids are assigned
// afterwards in a single ordered pass over the completed results, keeping
// the output identical regardless of which worker finished first.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::db::models::ScrapedRecord;
use crate::db::Store;
use crate::mirror::engine::{detect_in_group, GroupCluster, MirrorThresholds};
use crate::mirror::summary::{summarize, MirrorCluster, MirrorReport, MirrorSummary};

/// Detect mirror clusters for a day's title groups and persist the report.
///
/// The URL -> record lookup spans every fingerprinted day, so a group can
/// match today's page against content first seen weeks ago.
pub async fn run(
    store: &Arc<dyn Store>,
    day: &str,
    concurrency: usize,
    thresholds: MirrorThresholds,
) -> Result<MirrorReport> {
    let Some(groups) = store.get_title_groups(day).await? else {
        warn!(day, "no title groups for day, skipping mirror detection");
        let report = MirrorReport {
            mirror_clusters: Vec::new(),
            summary: MirrorSummary::default(),
        };
        store.upsert_mirror_report(day, &report).await?;
        return Ok(report);
    };

    let lookup = Arc::new(build_scraped_lookup(store).await?);
    info!(groups = groups.len(), urls = lookup.len(), "analyzing title groups for mirrors");

    let pb = ProgressBar::new(groups.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Groups [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let results: Vec<Result<(usize, Vec<GroupCluster>)>> =
        stream::iter(groups.iter().enumerate().map(|(position, group)| {
            let title = group.title.clone();
            let urls = group.urls.clone();
            let lookup = Arc::clone(&lookup);
            let pb = pb.clone();
            async move {
                let clusters = tokio::task::spawn_blocking(move || {
                    detect_in_group(&title, &urls, &lookup, &thresholds)
                })
                .await
                .context("group clustering task failed")?;
                pb.inc(1);
                Ok((position, clusters))
            }
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    pb.finish_and_clear();

    // Deterministic id assignment: groups in stored order, components in
    // the order the engine emitted them, ids from a single counter.
    let mut ordered: Vec<(usize, Vec<GroupCluster>)> =
        results.into_iter().collect::<Result<_>>()?;
    ordered.sort_by_key(|(position, _)| *position);

    let mut clusters: Vec<MirrorCluster> = Vec::new();
    for (_, group_clusters) in ordered {
        for cluster in group_clusters {
            let id = clusters.len() as u32 + 1;
            clusters.push(MirrorCluster::from_group(id, cluster));
        }
    }

    let summary = summarize(&clusters, groups.len());
    let report = MirrorReport {
        mirror_clusters: clusters,
        summary,
    };
    store.upsert_mirror_report(day, &report).await?;

    info!(
        day,
        clusters = report.summary.total_mirror_clusters,
        domains = report.summary.total_mirrored_domains,
        "mirror detection complete"
    );
    Ok(report)
}

/// Index every fingerprinted record by URL: the historical scraped lookup
/// the engine resolves group URLs against.
async fn build_scraped_lookup(store: &Arc<dyn Store>) -> Result<HashMap<String, ScrapedRecord>> {
    let mut lookup: HashMap<String, ScrapedRecord> = HashMap::new();
    for day in store.fingerprint_days().await? {
        if let Some(index) = store.get_fingerprint_day(&day).await? {
            for entry in index.values() {
                for record in &entry.records {
                    if !record.url.is_empty() {
                        lookup.insert(record.url.clone(), record.clone());
                    }
                }
            }
        }
    }
    Ok(lookup)
}
