//! ICM-20948 9-axis IMU
//!
//! Registers are split into four banks selected through `REG_BANK_SEL`,
//! which is mapped in every bank. Identity and power management live in
//! bank 0; the driver selects it before each access since a reset or
//! another bus user may have switched banks.

use embedded_hal::i2c::I2c;
use mycap_core::tracker::{DeviceError, DeviceStatus, TrackerDriver};

use super::{check_identity, status_of, write_register};

/// ICM-20948 register addresses (bank 0)
pub mod reg {
    /// Device identity
    pub const WHO_AM_I: u8 = 0x00;
    /// Power management 1
    pub const PWR_MGMT_1: u8 = 0x06;
    /// Bank select, present in all banks
    pub const REG_BANK_SEL: u8 = 0x7F;
}

/// Expected `WHO_AM_I` contents
pub const DEVICE_ID: u8 = 0xEA;

/// REG_BANK_SEL value for bank 0
const BANK_0: u8 = 0x00;
/// PWR_MGMT_1: awake, best available clock
const PWR_WAKE: u8 = 0x01;
/// PWR_MGMT_1: sleep bit set, clock selection kept
const PWR_SLEEP: u8 = 0x41;

/// ICM-20948 driver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Icm20948 {
    address: Option<u8>,
}

impl Icm20948 {
    pub const fn new() -> Self {
        Self { address: None }
    }

    pub fn address(&self) -> Option<u8> {
        self.address
    }

    fn check<I2C: I2c>(bus: &mut I2C, address: u8) -> Result<(), DeviceError> {
        write_register(bus, address, reg::REG_BANK_SEL, BANK_0)?;
        check_identity(bus, address, reg::WHO_AM_I, DEVICE_ID)
    }
}

impl<I2C: I2c> TrackerDriver<I2C> for Icm20948 {
    fn setup(&mut self, bus: &mut I2C, address: u8) -> Result<(), DeviceError> {
        Self::check(bus, address)?;
        write_register(bus, address, reg::PWR_MGMT_1, PWR_WAKE)?;
        self.address = Some(address);
        Ok(())
    }

    fn poll_status(&mut self, bus: &mut I2C) -> DeviceStatus {
        match self.address {
            Some(address) => status_of(Self::check(bus, address)),
            None => DeviceStatus::Off,
        }
    }

    fn shutdown(&mut self, bus: &mut I2C) {
        if let Some(address) = self.address.take() {
            let _ = write_register(bus, address, reg::REG_BANK_SEL, BANK_0)
                .and_then(|()| write_register(bus, address, reg::PWR_MGMT_1, PWR_SLEEP));
        }
    }
}
