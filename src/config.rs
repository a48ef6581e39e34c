use std::fmt;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "TENDER";

/// Runtime settings, read once at startup from `TENDER_*` variables.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub store_url: String,
    pub store_key: String,
    pub api_key: String,
    pub table: String,
    pub bind: String,
    pub default_limit: usize,
    pub max_limit: usize,
    pub api_key_header: String,
    pub cors_origin: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("table", "tenders")?
            .set_default("bind", "0.0.0.0:5000")?
            .set_default("default_limit", 20)?
            .set_default("max_limit", 100)?
            .set_default("api_key_header", "x-api-key")?
            .set_default("cors_origin", "*")?
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Row limit for a list request. Missing, unparsable or non-positive
    /// values fall back to the default; large ones are capped.
    pub fn resolve_limit(&self, raw: Option<&str>) -> usize {
        raw.and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("store_url", &self.store_url)
            .field("store_key", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .field("bind", &self.bind)
            .field("default_limit", &self.default_limit)
            .field("max_limit", &self.max_limit)
            .field("api_key_header", &self.api_key_header)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

#[cfg(test)]
pub fn test_settings() -> Settings {
    Settings {
        store_url: "http://localhost:54321".into(),
        store_key: "service-key".into(),
        api_key: "secret-key".into(),
        table: "tenders".into(),
        bind: "127.0.0.1:0".into(),
        default_limit: 20,
        max_limit: 100,
        api_key_header: "x-api-key".into(),
        cors_origin: "*".into(),
    }
}
