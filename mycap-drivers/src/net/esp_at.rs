//! ESP-AT Wi-Fi modem link
//!
//! Drives an ESP8266/ESP32 running Espressif's AT firmware over a UART.
//! Association is fire-and-forget: the join command is written and the
//! modem's `OK`/`FAIL` reply is left unread.
//!
//! # Command Sequence
//!
//! ```text
//! AT+CWMODE=1\r\n                   station mode
//! AT+CWJAP="<ssid>","<password>"\r\n join
//! ```
//!
//! Inside quoted parameters the AT parser requires `"`, `,` and `\` to be
//! escaped with a backslash.

use embedded_io::Write;
use mycap_hal::NetworkLink;

const STATION_MODE: &[u8] = b"AT+CWMODE=1\r\n";
const JOIN_PREFIX: &[u8] = b"AT+CWJAP=";
const LINE_END: &[u8] = b"\r\n";

/// Errors from the ESP-AT link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EspAtError<E> {
    /// UART write failed
    Io(E),
    /// SSID or password contains a byte the modem cannot take (CR, LF, NUL)
    UnsupportedCharacter,
}

/// Link over the modem's command UART
pub struct EspAtLink<W> {
    uart: W,
    station_mode: bool,
}

impl<W: Write> EspAtLink<W> {
    pub fn new(uart: W) -> Self {
        Self {
            uart,
            station_mode: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.uart
    }

    fn write_quoted(&mut self, value: &str) -> Result<(), W::Error> {
        self.uart.write_all(b"\"")?;
        for &byte in value.as_bytes() {
            if matches!(byte, b'"' | b',' | b'\\') {
                self.uart.write_all(&[b'\\', byte])?;
            } else {
                self.uart.write_all(&[byte])?;
            }
        }
        self.uart.write_all(b"\"")
    }

    fn send_join(&mut self, ssid: &str, password: &str) -> Result<(), W::Error> {
        if !self.station_mode {
            self.uart.write_all(STATION_MODE)?;
            self.station_mode = true;
        }

        self.uart.write_all(JOIN_PREFIX)?;
        self.write_quoted(ssid)?;
        self.uart.write_all(b",")?;
        self.write_quoted(password)?;
        self.uart.write_all(LINE_END)?;
        self.uart.flush()
    }
}

fn is_sendable(value: &str) -> bool {
    !value.bytes().any(|b| matches!(b, b'\r' | b'\n' | 0))
}

impl<W: Write> NetworkLink for EspAtLink<W> {
    type Error = EspAtError<W::Error>;

    fn associate(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error> {
        if !is_sendable(ssid) || !is_sendable(password) {
            return Err(EspAtError::UnsupportedCharacter);
        }

        self.send_join(ssid, password).map_err(EspAtError::Io)?;

        #[cfg(feature = "defmt")]
        defmt::info!("Joining network {=str}", ssid);

        Ok(())
    }
}
