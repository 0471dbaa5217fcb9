// Fingerprint index builder: one entry per unique piece of content.
//
// A day's scraped records are bucketed by content fingerprint; each bucket
// becomes a FingerprintEntry carrying every record that shared the content,
// the observation span, a topic classification, and the rolled-up operator
// identifiers.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hasher::content_fingerprint;
use crate::db::models::ScrapedRecord;
use crate::identifiers::identifier_set;
use crate::topics::traits::{TopicClassifier, TopicScore};

/// One unique piece of content and everything observed about it in a day.
/// Written once per processing run; the next run's entry for the same
/// fingerprint supersedes it rather than merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintEntry {
    /// All records that shared this fingerprint.
    pub records: Vec<ScrapedRecord>,
    /// Topic classification, descending score. Classified from the first
    /// record's title + keywords; one representative stands in for the
    /// whole bucket. A deliberate cost/accuracy tradeoff, not a bug.
    pub classification: Vec<TopicScore>,
    /// Operator identifiers rolled up across all records, deduplicated and
    /// sorted. Same namespaced encoding the mirror engine compares.
    pub identifiers: Vec<String>,
    /// None when no record in the bucket carried a parseable timestamp.
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Build the fingerprint index for one day of scraped records.
///
/// Records that already carry a text_hash keep it; the rest are hashed from
/// raw_text, falling back to the snippet for records with no raw text.
/// Missing html hashes are filled from the snippet the same way.
pub fn build_index(
    records: &[ScrapedRecord],
    classifier: &dyn TopicClassifier,
) -> BTreeMap<String, FingerprintEntry> {
    let mut buckets: BTreeMap<String, Vec<ScrapedRecord>> = BTreeMap::new();

    for record in records {
        let mut record = record.clone();
        let text_hash = match record.text_hash.as_deref() {
            Some(hash) if !hash.is_empty() => hash.to_string(),
            _ if !record.raw_text.is_empty() => content_fingerprint(&record.raw_text),
            _ => content_fingerprint(&record.snippet),
        };
        if record.html_hash.as_deref().is_none_or(str::is_empty) {
            record.html_hash = Some(content_fingerprint(&record.snippet));
        }
        record.text_hash = Some(text_hash.clone());
        buckets.entry(text_hash).or_default().push(record);
    }

    buckets
        .into_iter()
        .map(|(fingerprint, records)| {
            let sample = records
                .first()
                .map(|r| format!("{} {}", r.title, r.keywords.join(" ")))
                .unwrap_or_default();
            let classification = classifier.classify(&sample);

            let first_seen = records.iter().filter_map(|r| r.collected_at).min();
            let last_seen = records.iter().filter_map(|r| r.collected_at).max();

            let identifiers: BTreeSet<String> =
                records.iter().flat_map(|r| identifier_set(r)).collect();

            let entry = FingerprintEntry {
                records,
                classification,
                identifiers: identifiers.into_iter().collect(),
                first_seen,
                last_seen,
            };
            (fingerprint, entry)
        })
        .collect()
}
