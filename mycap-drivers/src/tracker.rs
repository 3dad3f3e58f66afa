//! Tracker driver selection by configured kind

use embedded_hal::i2c::I2c;
use mycap_core::tracker::{DeviceError, DeviceStatus, FromKind, TrackerDriver, TrackerKind};

use crate::imu::{Icm20948, Mpu6050};

/// Driver for any supported tracker kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyTracker {
    Mpu6050(Mpu6050),
    Icm20948(Icm20948),
}

impl AnyTracker {
    pub fn kind(&self) -> TrackerKind {
        match self {
            AnyTracker::Mpu6050(_) => TrackerKind::Mpu6050,
            AnyTracker::Icm20948(_) => TrackerKind::Icm20948,
        }
    }
}

impl FromKind for AnyTracker {
    fn from_kind(kind: TrackerKind) -> Self {
        match kind {
            TrackerKind::Mpu6050 => AnyTracker::Mpu6050(Mpu6050::new()),
            TrackerKind::Icm20948 => AnyTracker::Icm20948(Icm20948::new()),
        }
    }
}

impl<I2C: I2c> TrackerDriver<I2C> for AnyTracker {
    fn setup(&mut self, bus: &mut I2C, address: u8) -> Result<(), DeviceError> {
        match self {
            AnyTracker::Mpu6050(d) => d.setup(bus, address),
            AnyTracker::Icm20948(d) => d.setup(bus, address),
        }
    }

    fn poll_status(&mut self, bus: &mut I2C) -> DeviceStatus {
        match self {
            AnyTracker::Mpu6050(d) => d.poll_status(bus),
            AnyTracker::Icm20948(d) => d.poll_status(bus),
        }
    }

    fn shutdown(&mut self, bus: &mut I2C) {
        match self {
            AnyTracker::Mpu6050(d) => d.shutdown(bus),
            AnyTracker::Icm20948(d) => d.shutdown(bus),
        }
    }
}
