//! Network association abstraction

/// Wireless network link
///
/// Implemented by whatever owns the radio. Association is requested and
/// then left to complete in the background; callers do not wait for the
/// link to come up.
pub trait NetworkLink {
    /// Error type for association requests
    type Error;

    /// Request association with the given network
    ///
    /// # Arguments
    /// * `ssid` - Network name
    /// * `password` - Passphrase, empty for open networks
    fn associate(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error>;
}

impl<T: NetworkLink + ?Sized> NetworkLink for &mut T {
    type Error = T::Error;

    fn associate(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error> {
        (**self).associate(ssid, password)
    }
}
