//! Status telemetry packets (tracker node → mycap server)
//!
//! Packet layout, all multi-byte fields little-endian:
//! - Heartbeat: TYPE (0x00), PACKET_NUMBER (4 bytes)
//! - Handshake: TYPE (0x01), "MYCAP-DEVICE", MAC (6 bytes)
//! - Tracker status: TYPE (0x02), PACKET_NUMBER (4 bytes), TRACKER_INDEX, STATUS
//!
//! The server drops any packet whose number is not greater than the last
//! one it saw from the same device, so numbers must strictly increase.
//! Handshakes carry no number because they open the session, and the
//! server restarts its count on each one. Once `u32::MAX` has been used,
//! [`PacketWriter`] hands out no more numbered packets until a new
//! handshake is built.

use heapless::Vec;

pub const PACKET_HEARTBEAT: u8 = 0x00;
pub const PACKET_HANDSHAKE: u8 = 0x01;
pub const PACKET_TRACKER_STATUS: u8 = 0x02;

/// Magic sent by the device in its handshake
pub const DEVICE_MAGIC: &[u8] = b"MYCAP-DEVICE";

/// Magic the server answers a handshake with
pub const SERVER_MAGIC: &[u8] = b"MYCAP-SERVER";

/// Largest packet this module produces (handshake)
pub const MAX_PACKET_SIZE: usize = 1 + DEVICE_MAGIC.len() + 6;

/// Errors that can occur while encoding packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryError {
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Tracker status as reported to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TrackerStatus {
    /// Tracker is responding normally
    Ok = 0,
    /// Tracker responded with errors
    Error = 1,
    /// Tracker is not responding at all
    Off = 2,
}

impl TrackerStatus {
    /// Get the wire value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TrackerStatus::Ok),
            1 => Some(TrackerStatus::Error),
            2 => Some(TrackerStatus::Off),
            _ => None,
        }
    }
}

/// Packets sent from the tracker node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DevicePacket {
    /// Keep-alive
    Heartbeat { packet_number: u32 },
    /// Session opener identifying the node by MAC address
    Handshake { mac: [u8; 6] },
    /// Status of one local tracker
    TrackerStatus {
        packet_number: u32,
        tracker_index: u8,
        status: TrackerStatus,
    },
}

impl DevicePacket {
    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        match self {
            DevicePacket::Heartbeat { .. } => 1 + 4,
            DevicePacket::Handshake { .. } => MAX_PACKET_SIZE,
            DevicePacket::TrackerStatus { .. } => 1 + 4 + 2,
        }
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, TelemetryError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(TelemetryError::BufferTooSmall);
        }

        match *self {
            DevicePacket::Heartbeat { packet_number } => {
                buffer[0] = PACKET_HEARTBEAT;
                buffer[1..5].copy_from_slice(&packet_number.to_le_bytes());
            }
            DevicePacket::Handshake { mac } => {
                let magic_end = 1 + DEVICE_MAGIC.len();
                buffer[0] = PACKET_HANDSHAKE;
                buffer[1..magic_end].copy_from_slice(DEVICE_MAGIC);
                buffer[magic_end..len].copy_from_slice(&mac);
            }
            DevicePacket::TrackerStatus {
                packet_number,
                tracker_index,
                status,
            } => {
                buffer[0] = PACKET_TRACKER_STATUS;
                buffer[1..5].copy_from_slice(&packet_number.to_le_bytes());
                buffer[5] = tracker_index;
                buffer[6] = status.as_u8();
            }
        }

        Ok(len)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_PACKET_SIZE>, TelemetryError> {
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| TelemetryError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Check whether `bytes` is the server's handshake answer
pub fn is_server_handshake(bytes: &[u8]) -> bool {
    bytes.split_first().is_some_and(|(&kind, magic)| {
        kind == PACKET_HANDSHAKE && magic == SERVER_MAGIC
    })
}

/// Stamps outgoing packets with increasing packet numbers
#[derive(Debug, Clone)]
pub struct PacketWriter {
    next_packet_number: u32,
}

impl Default for PacketWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketWriter {
    /// Create a writer; the first numbered packet gets number 1
    pub fn new() -> Self {
        Self {
            next_packet_number: 1,
        }
    }

    /// Check whether the session has used up its packet numbers
    pub fn needs_handshake(&self) -> bool {
        self.next_packet_number == 0
    }

    // 0 marks an exhausted session; the server never accepts it anyway
    fn take_number(&mut self) -> Option<u32> {
        if self.needs_handshake() {
            return None;
        }
        let number = self.next_packet_number;
        self.next_packet_number = number.wrapping_add(1);
        Some(number)
    }

    /// Build a handshake packet, opening a new session numbered from 1
    pub fn handshake(&mut self, mac: [u8; 6]) -> DevicePacket {
        self.next_packet_number = 1;
        DevicePacket::Handshake { mac }
    }

    /// Build the next heartbeat packet
    ///
    /// Returns `None` once the session needs a new handshake.
    pub fn heartbeat(&mut self) -> Option<DevicePacket> {
        Some(DevicePacket::Heartbeat {
            packet_number: self.take_number()?,
        })
    }

    /// Build the next tracker status packet
    ///
    /// Returns `None` once the session needs a new handshake.
    pub fn tracker_status(
        &mut self,
        tracker_index: u8,
        status: TrackerStatus,
    ) -> Option<DevicePacket> {
        Some(DevicePacket::TrackerStatus {
            packet_number: self.take_number()?,
            tracker_index,
            status,
        })
    }
}
