// Content fingerprinting: exact-duplicate detection by content address.
//
// hasher computes the normalized SHA-256 digest of a document's text;
// index buckets a day's scraped records by that digest into one
// FingerprintEntry per unique piece of content.

pub mod hasher;
pub mod index;
