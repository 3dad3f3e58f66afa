//! Fixed-capacity tracker registry
//!
//! Slots are indexed by position. Each slot exclusively owns at most one
//! tracker; registering into an occupied slot drops the previous occupant.

use mycap_protocol::TrackerStatus;

use super::{DeviceError, FromKind, Tracker, TrackerDriver, TrackerKind};
use crate::config::TrackerConfig;

/// Number of tracker slots
pub const MAX_TRACKER_COUNT: usize = 8;

/// Invalid tracker registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Slot index is not below [`MAX_TRACKER_COUNT`]
    IndexOutOfRange { index: u8 },
    /// Two boot-time entries claim the same slot
    DuplicateIndex { index: u8 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::IndexOutOfRange { index } => write!(
                f,
                "tracker index {} out of range (max {})",
                index,
                MAX_TRACKER_COUNT - 1
            ),
            ConfigError::DuplicateIndex { index } => {
                write!(f, "tracker index {} configured twice", index)
            }
        }
    }
}

/// Fatal failure during tracker bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// A tracker marked as required could not be initialized
    RequiredTrackerFailed { index: u8, error: DeviceError },
}

impl core::fmt::Display for SetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SetupError::RequiredTrackerFailed { index, error } => {
                write!(f, "required tracker {} failed setup: {}", index, error)
            }
        }
    }
}

/// Table of tracker slots plus the status poll timestamp
#[derive(Debug)]
pub struct TrackerRegistry<D> {
    slots: [Option<Tracker<D>>; MAX_TRACKER_COUNT],
    /// Time of the last status poll (ms); written by the status poller only
    last_status_poll: u64,
}

impl<D> Default for TrackerRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> TrackerRegistry<D> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            last_status_poll: 0,
        }
    }

    /// Register a tracker in slot `index`
    ///
    /// Builds the driver for `kind` and replaces any previous occupant of
    /// the slot. The bus is not touched until [`TrackerRegistry::setup`].
    pub fn register(
        &mut self,
        index: u8,
        kind: TrackerKind,
        address: u8,
        required: bool,
    ) -> Result<(), ConfigError>
    where
        D: FromKind,
    {
        let slot = self
            .slots
            .get_mut(index as usize)
            .ok_or(ConfigError::IndexOutOfRange { index })?;

        *slot = Some(Tracker::new(
            index,
            kind,
            address,
            required,
            D::from_kind(kind),
        ));
        Ok(())
    }

    /// Register every tracker of a boot-time table, in order
    ///
    /// Stops at the first invalid entry; entries before it stay registered.
    pub fn register_all(&mut self, configs: &[TrackerConfig]) -> Result<(), ConfigError>
    where
        D: FromKind,
    {
        for config in configs {
            self.register(config.index, config.kind, config.address, config.required)?;
        }
        Ok(())
    }

    /// Take the tracker out of slot `index`, leaving it empty
    pub fn release(&mut self, index: u8) -> Option<Tracker<D>> {
        self.slots.get_mut(index as usize)?.take()
    }

    /// Get the tracker in slot `index`
    pub fn get(&self, index: u8) -> Option<&Tracker<D>> {
        self.slots.get(index as usize)?.as_ref()
    }

    /// All slots in index order
    pub fn slots(&self) -> &[Option<Tracker<D>>] {
        &self.slots
    }

    /// Occupied slots in index order
    pub fn trackers(&self) -> impl Iterator<Item = &Tracker<D>> + '_ {
        self.slots.iter().flatten()
    }

    pub(crate) fn trackers_mut(&mut self) -> impl Iterator<Item = &mut Tracker<D>> + '_ {
        self.slots.iter_mut().flatten()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.trackers().count()
    }

    /// Check if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Time of the last status poll (ms)
    pub fn last_status_poll(&self) -> u64 {
        self.last_status_poll
    }

    pub(crate) fn set_last_status_poll(&mut self, now_ms: u64) {
        self.last_status_poll = now_ms;
    }

    /// Per-tracker status for the server, in index order
    pub fn status_reports(&self) -> impl Iterator<Item = (u8, TrackerStatus)> + '_ {
        self.trackers().map(|t| (t.index(), t.report_status()))
    }

    /// Initialize every registered tracker in index order
    ///
    /// A failing tracker that is not required is marked degraded and setup
    /// moves on. A failing required tracker aborts setup; trackers after it
    /// stay registered but uninitialized.
    pub fn setup<BUS>(&mut self, bus: &mut BUS) -> Result<(), SetupError>
    where
        D: TrackerDriver<BUS>,
    {
        for tracker in self.trackers_mut() {
            let Err(error) = tracker.setup(bus) else {
                continue;
            };

            if tracker.is_required() {
                return Err(SetupError::RequiredTrackerFailed {
                    index: tracker.index(),
                    error,
                });
            }

            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Tracker {} ({}) at {:#x} failed setup: {}",
                tracker.index(),
                tracker.kind(),
                tracker.address(),
                error
            );
            tracker.mark_degraded();
        }
        Ok(())
    }

    /// Shut down and release every tracker
    pub fn teardown<BUS>(&mut self, bus: &mut BUS)
    where
        D: TrackerDriver<BUS>,
    {
        for slot in self.slots.iter_mut() {
            if let Some(mut tracker) = slot.take() {
                tracker.shutdown(bus);
            }
        }
    }
}
