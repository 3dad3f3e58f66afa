//! IMU tracker drivers
//!
//! Both supported parts speak plain register I2C: write the register
//! address, then read or write one byte. Status checks re-read the identity
//! register, which is cheap and catches unplugged or reset sensors.

pub mod icm20948;
pub mod mpu6050;

pub use icm20948::Icm20948;
pub use mpu6050::Mpu6050;

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use mycap_core::tracker::{DeviceError, DeviceStatus};

/// Map a bus error onto the tracker error model
pub(crate) fn bus_error<E: embedded_hal::i2c::Error>(error: E) -> DeviceError {
    match error.kind() {
        ErrorKind::NoAcknowledge(_) => DeviceError::NoAcknowledge,
        _ => DeviceError::Bus,
    }
}

pub(crate) fn read_register<I2C: I2c>(
    bus: &mut I2C,
    address: u8,
    register: u8,
) -> Result<u8, DeviceError> {
    let mut value = [0u8];
    bus.write_read(address, &[register], &mut value)
        .map_err(bus_error)?;
    Ok(value[0])
}

pub(crate) fn write_register<I2C: I2c>(
    bus: &mut I2C,
    address: u8,
    register: u8,
    value: u8,
) -> Result<(), DeviceError> {
    bus.write(address, &[register, value]).map_err(bus_error)
}

/// Read an identity register and compare it with the expected value
pub(crate) fn check_identity<I2C: I2c>(
    bus: &mut I2C,
    address: u8,
    register: u8,
    expected: u8,
) -> Result<(), DeviceError> {
    match read_register(bus, address, register)? {
        found if found == expected => Ok(()),
        found => Err(DeviceError::IdentityMismatch { found }),
    }
}

pub(crate) fn status_of(result: Result<(), DeviceError>) -> DeviceStatus {
    match result {
        Ok(()) => DeviceStatus::Ok,
        Err(e) => e.status(),
    }
}
