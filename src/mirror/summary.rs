// Day-level mirror report: numbered clusters plus aggregate counts.
//
// Cluster ids are assigned here, after all groups have been analyzed, in a
// fixed traversal order (groups as stored, components as the engine emitted
// them), keeping id assignment deterministic even when group analysis ran
// in parallel.

use serde::{Deserialize, Serialize};

use super::engine::{GroupCluster, MirrorType};

/// A persisted mirror cluster. Never mutated after creation; superseded by
/// the next day's run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorCluster {
    pub cluster_id: u32,
    pub title: String,
    pub mirror_type: MirrorType,
    pub confidence: f64,
    pub domains: Vec<String>,
    pub urls: Vec<String>,
    pub shared_metadata: Vec<String>,
}

impl MirrorCluster {
    pub fn from_group(cluster_id: u32, cluster: GroupCluster) -> Self {
        Self {
            cluster_id,
            title: cluster.title,
            mirror_type: cluster.mirror_type,
            confidence: cluster.confidence,
            domains: cluster.domains,
            urls: cluster.urls,
            shared_metadata: cluster.shared_metadata,
        }
    }
}

/// Aggregate counts over one day's clusters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MirrorSummary {
    pub total_groups_analyzed: usize,
    pub total_mirror_clusters: usize,
    /// Sum of each cluster's distinct-domain count.
    pub total_mirrored_domains: usize,
    pub exact_matches: usize,
    pub near_matches: usize,
    pub operator_linked: usize,
}

/// The per-day document persisted for the reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorReport {
    pub mirror_clusters: Vec<MirrorCluster>,
    pub summary: MirrorSummary,
}

/// Aggregate a day's clusters. Simple counting, no failure modes.
pub fn summarize(clusters: &[MirrorCluster], groups_analyzed: usize) -> MirrorSummary {
    MirrorSummary {
        total_groups_analyzed: groups_analyzed,
        total_mirror_clusters: clusters.len(),
        total_mirrored_domains: clusters.iter().map(|c| c.domains.len()).sum(),
        exact_matches: count_of(clusters, MirrorType::Exact),
        near_matches: count_of(clusters, MirrorType::Near),
        operator_linked: count_of(clusters, MirrorType::OperatorLinked),
    }
}

fn count_of(clusters: &[MirrorCluster], kind: MirrorType) -> usize {
    clusters.iter().filter(|c| c.mirror_type == kind).count()
}
