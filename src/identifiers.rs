// Operator identifiers: the non-content linkage signal.
//
// Wallets, emails, PGP key material, and social handles are combined into
// one namespaced set per record, so a wallet address can never collide
// with an email of the same spelling. The same sets feed both the
// fingerprint entries (rolled up for reporting) and the mirror engine's
// operator-linkage layer.

use std::collections::BTreeSet;

use crate::db::models::ScrapedRecord;

/// How much of a PGP key block to keep as a stable short identifier.
const PGP_PREFIX_LEN: usize = 64;

/// Build the combined identifier set for one record.
pub fn identifier_set(record: &ScrapedRecord) -> BTreeSet<String> {
    let mut items = BTreeSet::new();
    for wallet in &record.metadata.btc_wallets {
        items.insert(format!("btc:{wallet}"));
    }
    for email in &record.metadata.emails {
        items.insert(format!("email:{email}"));
    }
    for pgp in &record.metadata.pgp_keys {
        let prefix: String = pgp.chars().take(PGP_PREFIX_LEN).collect();
        items.insert(format!("pgp:{prefix}"));
    }
    for handle in &record.social_handles.telegram {
        items.insert(format!("tg:{handle}"));
    }
    for handle in &record.social_handles.x {
        items.insert(format!("x:{handle}"));
    }
    items
}

/// Jaccard similarity between two identifier sets: |A ∩ B| / |A ∪ B|.
/// Two empty sets score 0.0, not 1.0. No evidence is not a link.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}
