// Mirror clustering engine: three-signal merge within one title group.
//
// Signals are applied in strict priority order: exact content hash, then
// TF-IDF cosine similarity, then operator-identifier overlap. A pair's
// relationship, once recorded, is never overwritten by a lower-priority
// layer. Pairs on the same base domain never union; same-site paths are
// not mirrors of each other.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use super::tfidf::{cosine, TfIdfVectorizer};
use super::unionfind::UnionFind;
use crate::db::models::ScrapedRecord;
use crate::fingerprint::hasher::content_fingerprint;
use crate::identifiers::{identifier_set, jaccard};

/// Merge thresholds for the three signal layers.
#[derive(Debug, Clone, Copy)]
pub struct MirrorThresholds {
    /// Minimum cosine similarity for the near-duplicate layer (inclusive).
    pub near_similarity: f64,
    /// Raw text must be longer than this to participate in the near layer.
    pub min_text_len: usize,
    /// Identifier Jaccard must exceed this for the operator layer (exclusive).
    pub operator_jaccard: f64,
}

impl Default for MirrorThresholds {
    fn default() -> Self {
        Self {
            near_similarity: 0.85,
            min_text_len: 50,
            operator_jaccard: 0.5,
        }
    }
}

/// How a cluster's members were judged to mirror each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MirrorType {
    Exact,
    Near,
    OperatorLinked,
}

impl MirrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorType::Exact => "exact",
            MirrorType::Near => "near",
            MirrorType::OperatorLinked => "operator-linked",
        }
    }
}

impl std::fmt::Display for MirrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A mirror cluster as produced within one title group, before the
/// day-level id assignment pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCluster {
    pub title: String,
    pub mirror_type: MirrorType,
    pub confidence: f64,
    /// Distinct base domains, first-appearance order. Always ≥ 2.
    pub domains: Vec<String>,
    pub urls: Vec<String>,
    /// Deduplicated operator identifiers shared by linked pairs.
    pub shared_metadata: Vec<String>,
}

/// The relationship recorded for one unordered pair of records.
struct PairInfo {
    kind: MirrorType,
    confidence: f64,
    shared_identifiers: Vec<String>,
}

/// The unit of "siteness": host[:port] of the URL, or the leading path
/// segment when the URL has no recognizable host (schemeless onion links).
pub fn base_domain(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            return match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
        }
    }
    url.split('/').next().unwrap_or_default().to_string()
}

/// Detect mirror clusters within a single title group.
///
/// URLs without a record in the scraped lookup are dropped; fewer than two
/// surviving records yields no clusters. The outcome is deterministic for a
/// fixed input order: components are materialized by smallest member index,
/// members ascending.
pub fn detect_in_group(
    title: &str,
    urls: &[String],
    lookup: &HashMap<String, ScrapedRecord>,
    thresholds: &MirrorThresholds,
) -> Vec<GroupCluster> {
    let valid: Vec<(&str, &ScrapedRecord)> = urls
        .iter()
        .filter_map(|url| lookup.get(url).map(|record| (url.as_str(), record)))
        .collect();

    if valid.len() < 2 {
        return Vec::new();
    }

    let n = valid.len();
    let domains: Vec<String> = valid.iter().map(|(url, _)| base_domain(url)).collect();
    let mut uf = UnionFind::new(n);
    let mut pairs: HashMap<(usize, usize), PairInfo> = HashMap::new();

    // Layer 1: exact content hash.
    let mut hash_groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, (_, record)) in valid.iter().enumerate() {
        let hash = match record.text_hash.as_deref() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => content_fingerprint(&record.raw_text),
        };
        hash_groups.entry(hash).or_default().push(idx);
    }
    for indices in hash_groups.values() {
        for (i, &a) in indices.iter().enumerate() {
            for &b in &indices[i + 1..] {
                if domains[a] != domains[b] {
                    uf.union(a, b);
                    pairs.insert(
                        (a, b),
                        PairInfo {
                            kind: MirrorType::Exact,
                            confidence: 1.0,
                            shared_identifiers: Vec::new(),
                        },
                    );
                }
            }
        }
    }

    // Layer 2: TF-IDF cosine similarity. Records without enough raw text
    // simply sit this layer out; a vectorization failure skips the layer
    // for this group only.
    let mut texts: Vec<&str> = Vec::new();
    let mut text_indices: Vec<usize> = Vec::new();
    for (idx, (_, record)) in valid.iter().enumerate() {
        let text = record.raw_text.trim();
        if text.len() > thresholds.min_text_len {
            texts.push(text);
            text_indices.push(idx);
        }
    }
    if texts.len() >= 2 {
        match TfIdfVectorizer::default().fit_transform(&texts) {
            Ok(vectors) => {
                for i in 0..vectors.len() {
                    for j in (i + 1)..vectors.len() {
                        let similarity = cosine(&vectors[i], &vectors[j]);
                        if similarity < thresholds.near_similarity {
                            continue;
                        }
                        let (a, b) = (text_indices[i], text_indices[j]);
                        // Exact-layer pairs are never downgraded to near
                        if domains[a] != domains[b] && !pairs.contains_key(&(a, b)) {
                            uf.union(a, b);
                            pairs.insert(
                                (a, b),
                                PairInfo {
                                    kind: MirrorType::Near,
                                    confidence: round4(similarity),
                                    shared_identifiers: Vec::new(),
                                },
                            );
                        }
                    }
                }
            }
            Err(e) => {
                warn!(title, error = %e, "near-duplicate layer skipped for group");
            }
        }
    }

    // Layer 3: operator-identifier overlap.
    let identifier_sets: Vec<BTreeSet<String>> =
        valid.iter().map(|(_, record)| identifier_set(record)).collect();
    for a in 0..n {
        if identifier_sets[a].is_empty() {
            continue;
        }
        for b in (a + 1)..n {
            if identifier_sets[b].is_empty() {
                continue;
            }
            let similarity = jaccard(&identifier_sets[a], &identifier_sets[b]);
            if similarity > thresholds.operator_jaccard
                && domains[a] != domains[b]
                && !pairs.contains_key(&(a, b))
            {
                let shared: Vec<String> = identifier_sets[a]
                    .intersection(&identifier_sets[b])
                    .cloned()
                    .collect();
                uf.union(a, b);
                pairs.insert(
                    (a, b),
                    PairInfo {
                        kind: MirrorType::OperatorLinked,
                        confidence: round4(similarity),
                        shared_identifiers: shared,
                    },
                );
            }
        }
    }

    // Materialize components into clusters.
    let mut clusters = Vec::new();
    for component in uf.components() {
        if component.len() < 2 {
            continue;
        }

        let cluster_urls: Vec<String> =
            component.iter().map(|&i| valid[i].0.to_string()).collect();
        let mut cluster_domains: Vec<String> = Vec::new();
        for &i in &component {
            if !cluster_domains.contains(&domains[i]) {
                cluster_domains.push(domains[i].clone());
            }
        }
        // A component reached transitively can still collapse to one
        // domain; such components are not mirror clusters.
        if cluster_domains.len() < 2 {
            continue;
        }

        // Scan every recorded pair among the members: any exact pair makes
        // the whole cluster exact at confidence 1.0; otherwise the highest
        // near/operator confidence wins, first encountered keeping ties.
        let mut best_type = MirrorType::Near;
        let mut best_confidence = 0.0;
        let mut shared_metadata: BTreeSet<String> = BTreeSet::new();
        for (pos, &a) in component.iter().enumerate() {
            for &b in &component[pos + 1..] {
                let Some(info) = pairs.get(&(a, b)) else {
                    continue;
                };
                if info.kind == MirrorType::Exact {
                    best_type = MirrorType::Exact;
                    best_confidence = 1.0;
                } else if info.confidence > best_confidence && best_type != MirrorType::Exact {
                    best_type = info.kind;
                    best_confidence = info.confidence;
                }
                shared_metadata.extend(info.shared_identifiers.iter().cloned());
            }
        }
        // A component unioned without any surviving direct pair record
        // defaults to a conservative confidence.
        let confidence = if best_confidence > 0.0 { best_confidence } else { 0.85 };

        clusters.push(GroupCluster {
            title: title.to_string(),
            mirror_type: best_type,
            confidence,
            domains: cluster_domains,
            urls: cluster_urls,
            shared_metadata: shared_metadata.into_iter().collect(),
        });
    }

    clusters
}

/// Round a similarity to 4 decimal places for stable persisted output.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
