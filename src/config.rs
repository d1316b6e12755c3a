//! Configuration for the oscilloscope viewer.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! command line flags (see `main.rs`).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::line::ValueFormat;
use crate::error::{Result, ScopeError};

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_HOST: &str = "192.168.1.66";
pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_MAX_SAMPLES: usize = 250;

// ─────────────────────────────────────────────────────────────────────────────
// ScopeConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the viewer needs to connect, decode and draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Address of the sample endpoint.
    pub host: String,
    /// TCP port of the sample endpoint.
    pub port: u16,
    /// Number of samples kept in the rolling buffer (and the x axis width).
    pub max_samples: usize,
    /// Give up connecting after this many milliseconds.
    pub connect_timeout_ms: u64,
    /// Redraw cadence of the plot.
    pub redraw_interval_ms: u64,
    /// Socket read timeout used by the reader so it can observe the stop flag.
    pub read_poll_ms: u64,
    /// Upper bound on how long shutdown waits for the peer to close.
    pub drain_timeout_ms: u64,
    /// Numeric base of the value field.
    pub value_format: ValueFormat,
    /// Treat hex values as 24-bit two's complement.
    pub sign_extend_24: bool,
    /// Sent once right after connecting.
    pub start_command: String,
    /// Window title.
    pub title: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_samples: DEFAULT_MAX_SAMPLES,
            connect_timeout_ms: 5_000,
            redraw_interval_ms: 100,
            read_poll_ms: 100,
            drain_timeout_ms: 2_000,
            value_format: ValueFormat::Decimal,
            sign_extend_24: false,
            start_command: "d\n".to_string(),
            title: "Oscilloscope".to_string(),
        }
    }
}

impl ScopeConfig {
    /// Load a (possibly partial) configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ScopeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: ScopeConfig = serde_json::from_str(text)?;
        Ok(cfg)
    }

    /// `host:port` as used for resolving and for display.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms)
    }

    pub fn read_poll(&self) -> Duration {
        Duration::from_millis(self.read_poll_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    /// Reject values that would make the buffer or socket timeouts meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ScopeError::Config("host must not be empty".into()));
        }
        if self.max_samples == 0 {
            return Err(ScopeError::Config("max_samples must be at least 1".into()));
        }
        // Zero durations are rejected by set_read_timeout / connect_timeout.
        if self.connect_timeout_ms == 0 || self.read_poll_ms == 0 || self.drain_timeout_ms == 0 {
            return Err(ScopeError::Config("timeouts must be non-zero".into()));
        }
        if self.redraw_interval_ms == 0 {
            return Err(ScopeError::Config("redraw interval must be non-zero".into()));
        }
        Ok(())
    }
}
