// Title grouping: the candidate partition for mirror analysis.
//
// Mirrors almost always keep the page title verbatim, so grouping all known
// records by exact (trimmed) title bounds the expensive pairwise work to
// same-title candidates. Groups and their URLs keep first-appearance order,
// which later fixes the cluster-id traversal order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::db::models::ScrapedRecord;

/// One set of distinct URLs observed under the same page title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleGroup {
    pub title: String,
    pub urls: Vec<String>,
}

/// Group every known record by exact title.
///
/// Titles are trimmed; empty titles and empty URLs are excluded. Only
/// groups with at least 2 distinct URLs survive, since a single URL cannot
/// form a mirror.
pub fn group_by_title<'a, I>(records: I) -> Vec<TitleGroup>
where
    I: IntoIterator<Item = &'a ScrapedRecord>,
{
    let mut groups: Vec<TitleGroup> = Vec::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();
    let mut seen_urls: Vec<HashSet<String>> = Vec::new();

    for record in records {
        let title = record.title.trim();
        let url = record.url.trim();
        if title.is_empty() || url.is_empty() {
            continue;
        }

        let idx = *by_title.entry(title.to_string()).or_insert_with(|| {
            groups.push(TitleGroup {
                title: title.to_string(),
                urls: Vec::new(),
            });
            seen_urls.push(HashSet::new());
            groups.len() - 1
        });

        if seen_urls[idx].insert(url.to_string()) {
            groups[idx].urls.push(url.to_string());
        }
    }

    groups.retain(|g| g.urls.len() >= 2);
    groups
}
