use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. The core
/// pipeline takes everything else (records, lookups, thresholds) as explicit
/// parameters, with no ambient state beyond the store location.
pub struct Config {
    pub db_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Only db_path is needed; it defaults to ./mirage.db.
    pub fn load() -> Result<Self> {
        Ok(Self {
            db_path: env::var("MIRAGE_DB_PATH").unwrap_or_else(|_| "./mirage.db".to_string()),
        })
    }
}
