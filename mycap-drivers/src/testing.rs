//! Test doubles shared by the driver tests

use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use heapless::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeI2cError(pub ErrorKind);

impl i2c::Error for FakeI2cError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Single register-file device on an I2C bus
pub struct FakeI2c {
    address: u8,
    registers: [u8; 256],
    pointer: u8,
    fault: Option<ErrorKind>,
    /// Register writes in order, as (register, value)
    pub writes: Vec<(u8, u8), 32>,
}

impl FakeI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            pointer: 0,
            fault: None,
            writes: Vec::new(),
        }
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers[register as usize] = value;
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    /// Stop acknowledging the device address
    pub fn unplug(&mut self) {
        self.fault = Some(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    }

    pub fn replug(&mut self) {
        self.fault = None;
    }

    pub fn fail_with_bus_error(&mut self) {
        self.fault = Some(ErrorKind::Bus);
    }
}

impl ErrorType for FakeI2c {
    type Error = FakeI2cError;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if let Some(kind) = self.fault {
            return Err(FakeI2cError(kind));
        }
        if address != self.address {
            return Err(FakeI2cError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&register, values)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = register;
                    for &value in values.iter() {
                        self.registers[self.pointer as usize] = value;
                        self.writes.push((self.pointer, value)).unwrap();
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}
