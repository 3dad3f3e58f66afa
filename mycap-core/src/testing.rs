//! Test doubles shared by the unit tests of this crate

use heapless::Vec;

use crate::tracker::{DeviceError, DeviceStatus, FromKind, TrackerDriver, TrackerKind};

/// Bus that records every call and answers from a script keyed by address
#[derive(Debug, Default)]
pub struct FakeBus {
    /// Addresses whose setup fails, and how
    pub setup_failures: Vec<(u8, DeviceError), 8>,
    /// Addresses whose status poll is not `Ok`
    pub poll_results: Vec<(u8, DeviceStatus), 8>,
    pub setups: Vec<u8, 16>,
    pub polls: Vec<u8, 64>,
    pub shutdowns: Vec<u8, 16>,
}

impl FakeBus {
    pub fn fail_setup(&mut self, address: u8, error: DeviceError) {
        self.setup_failures.push((address, error)).unwrap();
    }

    pub fn set_poll_result(&mut self, address: u8, status: DeviceStatus) {
        self.poll_results.retain(|(a, _)| *a != address);
        self.poll_results.push((address, status)).unwrap();
    }
}

/// Driver delegating everything to [`FakeBus`]
#[derive(Debug, PartialEq, Eq)]
pub struct FakeDriver {
    pub kind: TrackerKind,
    address: u8,
}

impl FromKind for FakeDriver {
    fn from_kind(kind: TrackerKind) -> Self {
        Self { kind, address: 0 }
    }
}

impl TrackerDriver<FakeBus> for FakeDriver {
    fn setup(&mut self, bus: &mut FakeBus, address: u8) -> Result<(), DeviceError> {
        self.address = address;
        bus.setups.push(address).unwrap();
        match bus.setup_failures.iter().find(|(a, _)| *a == address) {
            Some(&(_, error)) => Err(error),
            None => Ok(()),
        }
    }

    fn poll_status(&mut self, bus: &mut FakeBus) -> DeviceStatus {
        bus.polls.push(self.address).unwrap();
        bus.poll_results
            .iter()
            .find(|(a, _)| *a == self.address)
            .map(|&(_, status)| status)
            .unwrap_or(DeviceStatus::Ok)
    }

    fn shutdown(&mut self, bus: &mut FakeBus) {
        bus.shutdowns.push(self.address).unwrap();
    }
}
