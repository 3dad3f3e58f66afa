//! Configuration types
//!
//! Board-agnostic boot configuration. The firmware build validates
//! `mycap.toml` on the host and bakes the result into the image, so these
//! types only need to deserialize on the host (`serde` feature).

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::poller::DEFAULT_STATUS_POLL_INTERVAL_MS;
use crate::tracker::{ConfigError, TrackerKind, MAX_TRACKER_COUNT};

/// Default serial baudrate
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Default time to wait for the rest of a line once bytes are available (ms)
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 50;

/// One boot-time tracker entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackerConfig {
    /// Registry slot
    pub index: u8,
    /// Device kind
    pub kind: TrackerKind,
    /// 7-bit I2C address
    pub address: u8,
    /// Abort boot if this tracker fails setup
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: bool,
}

impl TrackerConfig {
    pub const fn new(index: u8, kind: TrackerKind, address: u8, required: bool) -> Self {
        Self {
            index,
            kind,
            address,
            required,
        }
    }
}

/// Service loop timing and serial settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServiceConfig {
    /// Minimum time between status polls (ms)
    pub status_poll_interval_ms: u64,
    /// Serial line read timeout (ms)
    pub read_timeout_ms: u32,
    /// Serial baudrate
    pub baudrate: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            status_poll_interval_ms: DEFAULT_STATUS_POLL_INTERVAL_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            baudrate: DEFAULT_BAUDRATE,
        }
    }
}

/// Complete boot configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub service: ServiceConfig,
    /// Trackers, one `[[tracker]]` table each
    #[cfg_attr(feature = "serde", serde(default, rename = "tracker"))]
    pub trackers: Vec<TrackerConfig, MAX_TRACKER_COUNT>,
}

impl BootConfig {
    /// Check slot indexes are in range and unique
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = [false; MAX_TRACKER_COUNT];
        for tracker in &self.trackers {
            let index = tracker.index;
            let slot = seen
                .get_mut(index as usize)
                .ok_or(ConfigError::IndexOutOfRange { index })?;
            if *slot {
                return Err(ConfigError::DuplicateIndex { index });
            }
            *slot = true;
        }
        Ok(())
    }

    /// Number of trackers whose setup failure aborts boot
    pub fn required_count(&self) -> usize {
        self.trackers.iter().filter(|t| t.required).count()
    }
}
