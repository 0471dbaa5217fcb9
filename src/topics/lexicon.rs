// Lexicon-based topic classifier.
//
// Scores a document against a fixed keyword table by counting
// case-insensitive substring occurrences. Zero model calls, runs locally,
// fully deterministic. The right cost point for tagging thousands of
// fingerprint entries per day.

use super::traits::{TopicClassifier, TopicScore};

/// Category -> lexical triggers. Table order doubles as the tie-break for
/// categories with equal raw scores, so it is part of the contract.
const LEXICON: &[(&str, &[&str])] = &[
    ("drugs", &["drug", "fentanyl", "heroin", "cocaine", "meth", "weed", "opiate"]),
    ("weapons", &["weapon", "gun", "firearm", "explosive", "silencer"]),
    ("fraud", &["fraud", "scam", "phishing", "carding", "ccv"]),
    ("hacking", &["exploit", "vulnerability", "rce", "sql injection", "xss", "dox"]),
    ("leak", &["leak", "leaked", "dumps", "credentials", "database"]),
    ("malware", &["malware", "trojan", "ransomware", "botnet"]),
    ("stolen data", &["stolen", "dump", "credit card", "ssn", "credentials"]),
    ("marketplace", &["vendor", "market", "purchase", "escrow", "vendor fee"]),
];

/// The default classifier over the fixed category lexicon.
pub struct LexiconClassifier;

impl TopicClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Vec<TopicScore> {
        let lower = text.to_lowercase();

        // Raw score per category: sum of non-overlapping trigger occurrence
        // counts. Collected in lexicon order so the stable sort below keeps
        // that order for ties.
        let mut raw: Vec<(&str, u32)> = Vec::new();
        for (category, triggers) in LEXICON {
            let count: u32 = triggers
                .iter()
                .map(|t| lower.matches(t).count() as u32)
                .sum();
            if count > 0 {
                raw.push((category, count));
            }
        }

        let total: u32 = raw.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return Vec::new();
        }

        raw.sort_by(|a, b| b.1.cmp(&a.1));

        raw.into_iter()
            .map(|(category, count)| TopicScore {
                category: category.to_string(),
                score: f64::from(count) / f64::from(total),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_sum_to_one_for_matched_categories() {
        let scores =
            LexiconClassifier.classify("Vendor selling heroin and cocaine, escrow accepted");
        assert!(!scores.is_empty());
        let sum: f64 = scores.iter().map(|s| s.score).sum();
        assert!((sum - 1.0).abs() < 1e-9, "Scores sum to {sum}");
    }

    #[test]
    fn unmatched_categories_are_omitted() {
        let scores = LexiconClassifier.classify("fentanyl fentanyl weed");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].category, "drugs");
        assert!((scores[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ordered_by_descending_raw_score() {
        // "drug" x1 vs "gun" x3
        let scores = LexiconClassifier.classify("gun gun gun drug");
        assert_eq!(scores[0].category, "weapons");
        assert_eq!(scores[1].category, "drugs");
        assert!(scores[0].score > scores[1].score);
    }

    #[test]
    fn ties_keep_lexicon_order() {
        // One trigger hit each: drugs before weapons, as in the table
        let scores = LexiconClassifier.classify("drug gun");
        assert_eq!(scores[0].category, "drugs");
        assert_eq!(scores[1].category, "weapons");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let scores = LexiconClassifier.classify("RANSOMWARE Botnet");
        assert_eq!(scores[0].category, "malware");
    }

    #[test]
    fn no_match_yields_empty_output() {
        assert!(LexiconClassifier.classify("a perfectly ordinary page").is_empty());
    }
}
