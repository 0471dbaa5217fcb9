// The content fingerprint: SHA-256 over normalized text, lowercase hex.
//
// Two pages whose text differs only in letter case or whitespace layout
// must produce the same digest, so normalization lowercases the text and
// collapses every whitespace run to a single ASCII space before hashing.

use sha2::{Digest, Sha256};

/// Compute the content fingerprint of a document's text.
///
/// Deterministic, no failure modes. The empty string is valid input and
/// yields the digest of the empty normalized string.
pub fn content_fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(text).as_bytes());
    hex::encode(hasher.finalize())
}

/// Lowercase and collapse all whitespace runs to single spaces, trimming
/// the ends.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
