// Colored terminal output for mirror reports.
//
// This module handles all terminal-specific formatting; the main.rs
// display paths delegate here.

use colored::Colorize;

use crate::mirror::engine::MirrorType;
use crate::mirror::summary::MirrorReport;

/// Display a day's mirror report: clusters first, then the summary block.
pub fn display_mirror_report(day: &str, report: &MirrorReport) {
    println!(
        "\n{}",
        format!(
            "=== Mirror Report for {} ({} clusters) ===",
            day, report.summary.total_mirror_clusters
        )
        .bold()
    );

    if report.mirror_clusters.is_empty() {
        println!("\nNo mirror clusters detected.");
    }

    for cluster in &report.mirror_clusters {
        let type_str = colorize_match(cluster.mirror_type);
        println!(
            "\n  {:>4}. {} ({}, conf {:.4})",
            cluster.cluster_id,
            super::truncate_chars(&cluster.title, 60).bold(),
            type_str,
            cluster.confidence,
        );
        for domain in cluster.domains.iter().take(5) {
            println!("        - {domain}");
        }
        if cluster.domains.len() > 5 {
            println!("        … and {} more", cluster.domains.len() - 5);
        }
        if !cluster.shared_metadata.is_empty() {
            let shared = cluster.shared_metadata.join(", ");
            println!("        shared: {}", super::truncate_chars(&shared, 100).dimmed());
        }
    }

    let summary = &report.summary;
    println!();
    println!("  Groups analyzed:    {}", summary.total_groups_analyzed);
    println!("  Mirror clusters:    {}", summary.total_mirror_clusters);
    println!("  Mirrored domains:   {}", summary.total_mirrored_domains);
    println!("  ├─ Exact matches:   {}", summary.exact_matches);
    println!("  ├─ Near matches:    {}", summary.near_matches);
    println!("  └─ Operator-linked: {}", summary.operator_linked);
}

/// Colorize a match type by signal strength.
fn colorize_match(kind: MirrorType) -> colored::ColoredString {
    match kind {
        MirrorType::Exact => kind.as_str().bright_green(),
        MirrorType::Near => kind.as_str().bright_yellow(),
        MirrorType::OperatorLinked => kind.as_str().bright_blue(),
    }
}
