//! Board-agnostic core logic for the tracker firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Tracker model and driver trait
//! - Fixed-capacity tracker registry
//! - Time-gated status poller
//! - Cooperative service tick (command input + status polling)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod poller;
pub mod service;
pub mod tracker;

#[cfg(test)]
mod testing;
