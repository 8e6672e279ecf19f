use std::env;
use std::path::Path;

use serde::Deserialize;

use crate::errors::StoreError;

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";
pub const DEFAULT_KEY_PREFIX: &str = "ink";

/// Runtime configuration: store connection, key namespace, and the admin
/// passkey that gates the administrative surface.
///
/// Resolution order: defaults, then `inkstream.toml` (if present), then
/// `INKSTREAM_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub redis_url: String,
    pub key_prefix: String,
    pub admin_passkey: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            admin_passkey: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, StoreError> {
        let mut config = Self::default();
        if Path::new("inkstream.toml").exists() {
            config = Self::from_file("inkstream.toml")?;
        }
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|err| StoreError::other(format!("failed to read config file: {err}")))?;
        toml::from_str(&raw).map_err(|err| StoreError::other(format!("failed to parse config file: {err}")))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("INKSTREAM_REDIS_URL") {
            self.redis_url = url;
        }
        if let Ok(prefix) = env::var("INKSTREAM_KEY_PREFIX") {
            self.key_prefix = prefix;
        }
        if let Ok(passkey) = env::var("INKSTREAM_ADMIN_PASSKEY") {
            self.admin_passkey = Some(passkey);
        }
    }

    /// True only when a passkey is configured and the candidate matches it.
    pub fn check_admin_passkey(&self, candidate: &str) -> bool {
        match &self.admin_passkey {
            Some(expected) => !expected.is_empty() && expected == candidate,
            None => false,
        }
    }
}
