// Data models: the scraped-record schema shared by every pipeline stage.
//
// These are separate from the database queries so the pure engine modules
// can use them without depending on rusqlite. The crawler's output is
// validated into this shape once, at the ingestion boundary; downstream
// code never guesses at document structure.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Sentiment scores attached by the crawler's text analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Operator identifiers the crawler extracted from page text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub pgp_keys: Vec<String>,
    #[serde(default)]
    pub btc_wallets: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

/// Social handles the crawler extracted from page HTML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialHandles {
    #[serde(default)]
    pub telegram: Vec<String>,
    #[serde(default)]
    pub x: Vec<String>,
    #[serde(default)]
    pub discord: Vec<String>,
}

/// One successfully fetched page. Produced once per fetch by the crawler,
/// immutable thereafter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedRecord {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub raw_text: String,
    /// First ~2000 characters of the page text.
    #[serde(default)]
    pub snippet: String,
    /// None when the crawler recorded a missing or malformed timestamp.
    /// Such records still participate in fingerprinting, just not in
    /// first/last-seen computation.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub metadata: RecordMetadata,
    #[serde(default)]
    pub social_handles: SocialHandles,
    #[serde(default)]
    pub html_hash: Option<String>,
    #[serde(default)]
    pub text_hash: Option<String>,
}

/// Parse the timestamp formats the crawler has emitted over time.
/// RFC 3339 first, then the bare "YYYY-MM-DD HH:MM:SS" form (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Deserialize a timestamp that may be absent, null, or malformed.
/// Anything unparseable becomes None rather than failing the whole record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
