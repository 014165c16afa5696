//! Client configuration
//!
//! Defaults match a stock device on the LAN. A TOML file may override any
//! subset of keys:
//!
//! ```toml
//! host = "192.168.7.80"
//! timeout_secs = 15.0
//!
//! [batch]
//! max_commands = 60
//! max_bytes = 8192
//! pause_ms = 20
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Address of a factory-configured HoloCube.
pub const DEFAULT_HOST: &str = "192.168.7.80";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

/// Commands per batch request the device handles reliably.
pub const MAX_COMMANDS_PER_BATCH: usize = 60;

/// Serialised `commands` payload budget per batch request.
pub const MAX_BATCH_BYTES: usize = 8 * 1024;

/// Pause after each batch request so the device can catch up.
pub const BATCH_PAUSE_MS: u64 = 20;

/// How command lists are split into batch requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchPolicy {
    /// Maximum commands in one request.
    pub max_commands: usize,
    /// Maximum serialised size of one request body.
    pub max_bytes: usize,
    /// Breather after each request, in milliseconds.
    pub pause_ms: u64,
}

impl BatchPolicy {
    /// `pause_ms` as a duration.
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            max_commands: MAX_COMMANDS_PER_BATCH,
            max_bytes: MAX_BATCH_BYTES,
            pause_ms: BATCH_PAUSE_MS,
        }
    }
}

/// Top-level configuration for a [`HoloCube`](crate::HoloCube) client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Device IP or host name, optionally with an `http://` prefix.
    pub host: String,
    /// Per-request timeout in seconds; unset means the 5 s default.
    pub timeout_secs: Option<f64>,
    /// Limits for [`send_batched`](crate::HoloCube::send_batched).
    pub batch: BatchPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout_secs: None,
            batch: BatchPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at `host`.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Request timeout. Unset, non-finite or negative values fall back to
    /// the default.
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }

    /// `http://<host>` without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        }
    }
}
