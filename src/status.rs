// System status display: DB stats, stored days per document kind, last run.

use std::sync::Arc;

use anyhow::Result;

use crate::db::Store;
use crate::pipeline::LAST_RUN_DAY;

/// Display system status to the terminal. The caller has already opened
/// the database; db_display_path is only used for the size readout.
pub async fn show(store: &Arc<dyn Store>, db_display_path: &str) -> Result<()> {
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    let scraped = store.scraped_days().await?;
    let fingerprinted = store.fingerprint_days().await?;
    let mirrored = store.mirror_days().await?;

    println!(
        "Scraped days: {}{}",
        scraped.len(),
        span_of(&scraped).unwrap_or_default()
    );
    println!("Fingerprinted days: {}", fingerprinted.len());
    println!("Mirror reports: {}", mirrored.len());

    if let Some(latest) = mirrored.last() {
        if let Some(report) = store.get_mirror_report(latest).await? {
            println!(
                "Latest report ({}): {} clusters across {} domains",
                latest,
                report.summary.total_mirror_clusters,
                report.summary.total_mirrored_domains
            );
        }
    }

    match store.get_job_state(LAST_RUN_DAY).await? {
        Some(day) => println!("Last full run: {}", day),
        None => {
            println!("Last full run: never");
            println!("  Run `mirage run` to process a day");
        }
    }

    Ok(())
}

fn span_of(days: &[String]) -> Option<String> {
    let first = days.first()?;
    let last = days.last()?;
    Some(format!(" ({first} to {last})"))
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
