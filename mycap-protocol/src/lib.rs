//! mycap Serial Command Protocol
//!
//! This crate defines the line-based control protocol spoken over the
//! tracker node's serial port, and the status packets the node reports to
//! the mycap server.
//!
//! # Command Wire Format
//!
//! One command per line. Arguments are separated by a single null byte and
//! the line ends with `\n`:
//! ```text
//! ┌──────┬────┬──────┬────┬───────┬────┬────┐
//! │ NAME │ \0 │ ARG0 │ \0 │ ARG1  │ \0 │ \n │
//! └──────┴────┴──────┴────┴───────┴────┴────┘
//! ```
//!
//! A line may hold at most [`FRAME_CAPACITY`]` - 1` bytes. Longer lines
//! (including their tails), lines cut short by a read timeout, empty
//! lines, unknown commands and commands missing arguments are dropped
//! without any reply; the protocol has no acknowledgement channel.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod telemetry;
pub mod token;

pub use command::{
    builtin_commands, wifi_command, Args, CommandDescriptor, CommandError, DispatchOutcome,
    Dispatcher, MAX_ARGS,
};
pub use frame::{CommandFrame, LineReader, FRAME_CAPACITY, LINE_TERMINATOR};
pub use telemetry::{DevicePacket, PacketWriter, TelemetryError, TrackerStatus};
pub use token::{Token, Tokenizer};
