//! mycap Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the tracker firmware talks to.
//! Chip-specific code (the RP2040 firmware, host test doubles) implements
//! them so the command protocol and tracker logic never reach for global
//! peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (mycap-firmware, tests)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  mycap-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-io   │       │ Wi-Fi modem   │
//! │ serial port   │       │ (ESP-AT etc.) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::LineTransport`] - Line-oriented serial input
//! - [`net::NetworkLink`] - Wireless network association
//! - [`clock::Clock`] - Monotonic millisecond clock

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod net;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use net::NetworkLink;
pub use serial::{IoLineTransport, LineRead, LineTransport};
