//! MPU-6050 6-axis IMU
//!
//! The part boots asleep. Setup checks `WHO_AM_I` and then clears the sleep
//! bit while selecting the X gyro PLL as clock source. `WHO_AM_I` reads
//! 0x68 whatever the AD0 strap, so the same check works at 0x68 and 0x69.

use embedded_hal::i2c::I2c;
use mycap_core::tracker::{DeviceError, DeviceStatus, TrackerDriver};

use super::{check_identity, status_of, write_register};

/// MPU-6050 register addresses
pub mod reg {
    /// Power management 1
    pub const PWR_MGMT_1: u8 = 0x6B;
    /// Device identity
    pub const WHO_AM_I: u8 = 0x75;
}

/// Expected `WHO_AM_I` contents
pub const DEVICE_ID: u8 = 0x68;

/// PWR_MGMT_1: awake, clock from X gyro PLL
const PWR_WAKE: u8 = 0x01;
/// PWR_MGMT_1: sleep bit set
const PWR_SLEEP: u8 = 0x40;

/// MPU-6050 driver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mpu6050 {
    /// Bus address, known once setup succeeded
    address: Option<u8>,
}

impl Mpu6050 {
    pub const fn new() -> Self {
        Self { address: None }
    }

    pub fn address(&self) -> Option<u8> {
        self.address
    }
}

impl<I2C: I2c> TrackerDriver<I2C> for Mpu6050 {
    fn setup(&mut self, bus: &mut I2C, address: u8) -> Result<(), DeviceError> {
        check_identity(bus, address, reg::WHO_AM_I, DEVICE_ID)?;
        write_register(bus, address, reg::PWR_MGMT_1, PWR_WAKE)?;
        self.address = Some(address);
        Ok(())
    }

    fn poll_status(&mut self, bus: &mut I2C) -> DeviceStatus {
        match self.address {
            Some(address) => status_of(check_identity(bus, address, reg::WHO_AM_I, DEVICE_ID)),
            None => DeviceStatus::Off,
        }
    }

    fn shutdown(&mut self, bus: &mut I2C) {
        if let Some(address) = self.address.take() {
            // Best effort, the device may already be gone
            let _ = write_register(bus, address, reg::PWR_MGMT_1, PWR_SLEEP);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeI2c;

    fn mpu(address: u8) -> FakeI2c {
        let mut bus = FakeI2c::new(address);
        bus.set_register(reg::WHO_AM_I, DEVICE_ID);
        bus.set_register(reg::PWR_MGMT_1, PWR_SLEEP);
        bus
    }

    #[test]
    fn test_setup_wakes_device() {
        let mut bus = mpu(0x68);
        let mut driver = Mpu6050::new();

        driver.setup(&mut bus, 0x68).unwrap();

        assert_eq!(driver.address(), Some(0x68));
        assert_eq!(bus.register(reg::PWR_MGMT_1), PWR_WAKE);
        assert_eq!(&bus.writes[..], &[(reg::PWR_MGMT_1, PWR_WAKE)]);
    }

    #[test]
    fn test_setup_wrong_identity() {
        let mut bus = mpu(0x68);
        bus.set_register(reg::WHO_AM_I, 0x70);
        let mut driver = Mpu6050::new();

        assert_eq!(
            driver.setup(&mut bus, 0x68),
            Err(DeviceError::IdentityMismatch { found: 0x70 })
        );
        assert_eq!(driver.address(), None);
        assert!(bus.writes.is_empty());
    }

    #[test]
    fn test_setup_absent_device() {
        let mut bus = mpu(0x68);
        let mut driver = Mpu6050::new();

        assert_eq!(driver.setup(&mut bus, 0x69), Err(DeviceError::NoAcknowledge));
    }

    #[test]
    fn test_poll_status() {
        let mut bus = mpu(0x69);
        let mut driver = Mpu6050::new();
        assert_eq!(driver.poll_status(&mut bus), DeviceStatus::Off);

        driver.setup(&mut bus, 0x69).unwrap();
        assert_eq!(driver.poll_status(&mut bus), DeviceStatus::Ok);

        bus.set_register(reg::WHO_AM_I, 0x00);
        assert_eq!(driver.poll_status(&mut bus), DeviceStatus::Error);

        bus.unplug();
        assert_eq!(driver.poll_status(&mut bus), DeviceStatus::Off);

        bus.fail_with_bus_error();
        assert_eq!(driver.poll_status(&mut bus), DeviceStatus::Error);
    }

    #[test]
    fn test_shutdown_sleeps_once() {
        let mut bus = mpu(0x68);
        let mut driver = Mpu6050::new();
        driver.setup(&mut bus, 0x68).unwrap();

        driver.shutdown(&mut bus);
        driver.shutdown(&mut bus);

        assert_eq!(bus.register(reg::PWR_MGMT_1), PWR_SLEEP);
        assert_eq!(bus.writes.len(), 2);
        assert_eq!(driver.address(), None);
    }
}
