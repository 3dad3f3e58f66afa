//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in mycap-core and mycap-hal:
//!
//! - IMU tracker drivers (MPU-6050, ICM-20948) over `embedded-hal` I2C
//! - Tracker driver dispatch by configured kind
//! - ESP-AT Wi-Fi modem link

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod imu;
pub mod net;
pub mod tracker;

pub use tracker::AnyTracker;

#[cfg(test)]
mod testing;
