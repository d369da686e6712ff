//! Client settings loaded via OrthoConfig.
//!
//! Values come from `LOSTFOUND_*` environment variables, an optional
//! configuration file, and command-line flags, in increasing precedence.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{CachePolicy, DEFAULT_CACHE_TTL};

/// Settings shared by every binary embedding the session store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOSTFOUND")]
pub struct ClientSettings {
    /// Freshness window for cached resources, in seconds.
    pub cache_ttl_secs: Option<u64>,
    /// Directory holding the persisted profile snapshot. Kept in memory
    /// when unset.
    pub snapshot_dir: Option<PathBuf>,
    /// Emit logs as JSON lines.
    #[ortho_config(default = false)]
    pub log_json: bool,
}

impl ClientSettings {
    /// Configured cache TTL, falling back to five minutes.
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map_or(DEFAULT_CACHE_TTL, Duration::from_secs)
    }

    /// Cache policy built from [`Self::cache_ttl`].
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy::new(self.cache_ttl())
    }
}
