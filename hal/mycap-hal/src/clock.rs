//! Monotonic time source

/// Monotonic millisecond clock
///
/// The value only has meaning relative to earlier readings. Consumers
/// compare readings with wrapping subtraction, so a counter that wraps
/// is tolerated.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
