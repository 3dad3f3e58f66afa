//! Tracker model
//!
//! A tracker is one IMU hanging off the node's I2C bus. The registry owns
//! trackers; drivers implement [`TrackerDriver`] for the bus type of the
//! board.
//!
//! Lifecycle:
//! ```text
//! (empty slot) ──register──▶ Registered ──setup ok──▶ Initialized
//!                                 │                        │
//!                                 │ setup failed           │ status poll
//!                                 ▼ (not required)         ▼
//!                             Degraded ◀──────────────▶ Healthy
//! ```

pub mod registry;

pub use registry::{ConfigError, SetupError, TrackerRegistry, MAX_TRACKER_COUNT};

use mycap_protocol::TrackerStatus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Supported tracker device kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrackerKind {
    /// InvenSense MPU-6050 6-axis IMU
    Mpu6050,
    /// TDK InvenSense ICM-20948 9-axis IMU
    Icm20948,
}

/// Tracker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackerState {
    /// In the registry, bus untouched
    Registered,
    /// Setup succeeded, not polled yet
    Initialized,
    /// Last status poll was clean
    Healthy,
    /// Setup failed (not required) or last status poll reported a problem
    Degraded,
}

/// Result of one status check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceStatus {
    /// Device answered and identified itself
    Ok,
    /// Device answered wrongly or the bus reported an error
    Error,
    /// Device did not acknowledge its address
    Off,
}

impl From<DeviceStatus> for TrackerStatus {
    fn from(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::Ok => TrackerStatus::Ok,
            DeviceStatus::Error => TrackerStatus::Error,
            DeviceStatus::Off => TrackerStatus::Off,
        }
    }
}

/// Errors a device can report during setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// Nothing acknowledged the address
    NoAcknowledge,
    /// Other bus failure (arbitration loss, overrun, timeout)
    Bus,
    /// Identity register did not hold the expected value
    IdentityMismatch { found: u8 },
}

impl DeviceError {
    /// Status a device in this error condition reports
    pub fn status(self) -> DeviceStatus {
        match self {
            DeviceError::NoAcknowledge => DeviceStatus::Off,
            DeviceError::Bus | DeviceError::IdentityMismatch { .. } => DeviceStatus::Error,
        }
    }
}

impl core::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::NoAcknowledge => f.write_str("no acknowledge"),
            DeviceError::Bus => f.write_str("bus error"),
            DeviceError::IdentityMismatch { found } => {
                write!(f, "unexpected identity 0x{:02x}", found)
            }
        }
    }
}

/// Trait for tracker device drivers
///
/// `BUS` is the shared bus the device sits on; the registry lends it for
/// the duration of each call.
pub trait TrackerDriver<BUS> {
    /// Probe and initialize the device at `address`
    fn setup(&mut self, bus: &mut BUS, address: u8) -> Result<(), DeviceError>;

    /// Check that the device is still alive
    ///
    /// Only called after a successful [`TrackerDriver::setup`].
    fn poll_status(&mut self, bus: &mut BUS) -> DeviceStatus;

    /// Put the device into a low-power state before it is released
    fn shutdown(&mut self, _bus: &mut BUS) {}
}

/// Builds the driver variant for a tracker kind
pub trait FromKind {
    fn from_kind(kind: TrackerKind) -> Self;
}

/// A registered tracker and its driver
#[derive(Debug)]
pub struct Tracker<D> {
    index: u8,
    kind: TrackerKind,
    address: u8,
    required: bool,
    state: TrackerState,
    /// Whether setup succeeded; only such trackers are polled
    initialized: bool,
    last_status: Option<DeviceStatus>,
    last_error: Option<DeviceError>,
    driver: D,
}

impl<D> Tracker<D> {
    pub(crate) fn new(index: u8, kind: TrackerKind, address: u8, required: bool, driver: D) -> Self {
        Self {
            index,
            kind,
            address,
            required,
            state: TrackerState::Registered,
            initialized: false,
            last_status: None,
            last_error: None,
            driver,
        }
    }

    /// Slot index
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Device kind
    pub fn kind(&self) -> TrackerKind {
        self.kind
    }

    /// Bus address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Whether a setup failure of this tracker is fatal
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Current lifecycle state
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Whether setup succeeded
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Status from the most recent setup failure or status poll
    pub fn last_status(&self) -> Option<DeviceStatus> {
        self.last_status
    }

    /// Error from the most recent failed setup
    pub fn last_error(&self) -> Option<DeviceError> {
        self.last_error
    }

    /// Borrow the driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Status as reported to the server
    pub fn report_status(&self) -> TrackerStatus {
        match self.state {
            TrackerState::Initialized | TrackerState::Healthy => TrackerStatus::Ok,
            TrackerState::Registered => TrackerStatus::Off,
            TrackerState::Degraded => self
                .last_status
                .map(TrackerStatus::from)
                .unwrap_or(TrackerStatus::Error),
        }
    }

    pub(crate) fn setup<BUS>(&mut self, bus: &mut BUS) -> Result<(), DeviceError>
    where
        D: TrackerDriver<BUS>,
    {
        match self.driver.setup(bus, self.address) {
            Ok(()) => {
                self.initialized = true;
                self.last_error = None;
                self.state = TrackerState::Initialized;
                Ok(())
            }
            Err(error) => {
                self.initialized = false;
                self.last_error = Some(error);
                self.last_status = Some(error.status());
                Err(error)
            }
        }
    }

    pub(crate) fn mark_degraded(&mut self) {
        self.state = TrackerState::Degraded;
    }

    pub(crate) fn poll<BUS>(&mut self, bus: &mut BUS) -> DeviceStatus
    where
        D: TrackerDriver<BUS>,
    {
        let status = self.driver.poll_status(bus);
        self.last_status = Some(status);
        self.state = match status {
            DeviceStatus::Ok => TrackerState::Healthy,
            DeviceStatus::Error | DeviceStatus::Off => TrackerState::Degraded,
        };
        status
    }

    pub(crate) fn shutdown<BUS>(&mut self, bus: &mut BUS)
    where
        D: TrackerDriver<BUS>,
    {
        self.driver.shutdown(bus);
    }
}
