//! Time-gated tracker status polling
//!
//! The poller is driven from the service loop with the current uptime. It
//! walks the registry at most once per interval; calls in between are
//! no-ops. Interval math uses wrapping subtraction so a wrapped clock
//! still yields a correct elapsed time.

use crate::tracker::{DeviceStatus, TrackerDriver, TrackerRegistry};

/// Default minimum time between status polls (ms)
pub const DEFAULT_STATUS_POLL_INTERVAL_MS: u64 = 1000;

/// Outcome of one status poll pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollSummary {
    /// Trackers whose status was checked
    pub polled: u8,
    /// Of those, how many reported something other than `Ok`
    pub degraded: u8,
}

impl PollSummary {
    pub fn all_ok(&self) -> bool {
        self.degraded == 0
    }
}

/// Rate-limits status polls over a [`TrackerRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct StatusPoller {
    interval_ms: u64,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_POLL_INTERVAL_MS)
    }
}

impl StatusPoller {
    pub const fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Check whether a poll is due at `now_ms`
    pub fn is_due<D>(&self, registry: &TrackerRegistry<D>, now_ms: u64) -> bool {
        now_ms.wrapping_sub(registry.last_status_poll()) >= self.interval_ms
    }

    /// Poll every initialized tracker if the interval has elapsed
    ///
    /// Returns `None` when not due. Trackers whose setup failed are skipped.
    /// The poll timestamp is updated once per pass, after the walk.
    pub fn poll_if_due<D, BUS>(
        &self,
        registry: &mut TrackerRegistry<D>,
        bus: &mut BUS,
        now_ms: u64,
    ) -> Option<PollSummary>
    where
        D: TrackerDriver<BUS>,
    {
        if !self.is_due(registry, now_ms) {
            return None;
        }

        let mut summary = PollSummary::default();
        for tracker in registry.trackers_mut().filter(|t| t.is_initialized()) {
            let status = tracker.poll(bus);
            summary.polled += 1;
            if status != DeviceStatus::Ok {
                summary.degraded += 1;
                #[cfg(feature = "defmt")]
                defmt::warn!("Tracker {} reports {}", tracker.index(), status);
            }
        }

        registry.set_last_status_poll(now_ms);
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBus, FakeDriver};
    use crate::tracker::{DeviceError, TrackerKind, TrackerState};
    use proptest::prelude::*;

    fn registry_with(addresses: &[u8]) -> TrackerRegistry<FakeDriver> {
        let mut registry = TrackerRegistry::new();
        for (index, &address) in addresses.iter().enumerate() {
            registry
                .register(index as u8, TrackerKind::Mpu6050, address, false)
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_not_due_at_boot() {
        let mut registry = registry_with(&[0x68]);
        let mut bus = FakeBus::default();
        registry.setup(&mut bus).unwrap();
        let poller = StatusPoller::default();

        assert_eq!(poller.poll_if_due(&mut registry, &mut bus, 999), None);
        assert!(bus.polls.is_empty());
        assert_eq!(registry.last_status_poll(), 0);
    }

    #[test]
    fn test_once_per_interval() {
        let mut registry = registry_with(&[0x68, 0x69]);
        let mut bus = FakeBus::default();
        registry.setup(&mut bus).unwrap();
        let poller = StatusPoller::new(1000);

        let summary = poller.poll_if_due(&mut registry, &mut bus, 1000).unwrap();
        assert_eq!(summary, PollSummary { polled: 2, degraded: 0 });
        assert_eq!(registry.last_status_poll(), 1000);

        // Still inside the window
        assert_eq!(poller.poll_if_due(&mut registry, &mut bus, 1500), None);
        assert_eq!(poller.poll_if_due(&mut registry, &mut bus, 1999), None);
        assert_eq!(bus.polls.len(), 2);

        assert!(poller.poll_if_due(&mut registry, &mut bus, 2000).is_some());
        assert_eq!(&bus.polls[..], &[0x68, 0x69, 0x68, 0x69]);
        assert_eq!(registry.last_status_poll(), 2000);
    }

    #[test]
    fn test_skips_failed_setup() {
        let mut registry = registry_with(&[0x68, 0x69]);
        let mut bus = FakeBus::default();
        bus.fail_setup(0x68, DeviceError::NoAcknowledge);
        registry.setup(&mut bus).unwrap();

        let summary = StatusPoller::new(10)
            .poll_if_due(&mut registry, &mut bus, 10)
            .unwrap();

        assert_eq!(summary.polled, 1);
        assert_eq!(&bus.polls[..], &[0x69]);
        assert_eq!(registry.get(0).unwrap().state(), TrackerState::Degraded);
    }

    #[test]
    fn test_skips_uninitialized() {
        // Registered but setup never ran
        let mut registry = registry_with(&[0x68]);
        let mut bus = FakeBus::default();

        let summary = StatusPoller::new(10)
            .poll_if_due(&mut registry, &mut bus, 50)
            .unwrap();

        assert_eq!(summary, PollSummary::default());
        assert!(bus.polls.is_empty());
        assert_eq!(registry.last_status_poll(), 50);
    }

    #[test]
    fn test_status_transitions() {
        let mut registry = registry_with(&[0x68]);
        let mut bus = FakeBus::default();
        registry.setup(&mut bus).unwrap();
        let poller = StatusPoller::new(100);

        bus.set_poll_result(0x68, DeviceStatus::Off);
        let summary = poller.poll_if_due(&mut registry, &mut bus, 100).unwrap();
        assert!(!summary.all_ok());
        assert_eq!(registry.get(0).unwrap().state(), TrackerState::Degraded);

        bus.set_poll_result(0x68, DeviceStatus::Ok);
        let summary = poller.poll_if_due(&mut registry, &mut bus, 200).unwrap();
        assert!(summary.all_ok());
        assert_eq!(registry.get(0).unwrap().state(), TrackerState::Healthy);
    }

    #[test]
    fn test_empty_registry_still_stamps() {
        let mut registry = TrackerRegistry::<FakeDriver>::new();
        let mut bus = FakeBus::default();

        let summary = StatusPoller::new(5).poll_if_due(&mut registry, &mut bus, 5);
        assert_eq!(summary, Some(PollSummary::default()));
        assert_eq!(registry.last_status_poll(), 5);
    }

    #[test]
    fn test_clock_wraparound() {
        let mut registry = registry_with(&[0x68]);
        let mut bus = FakeBus::default();
        registry.setup(&mut bus).unwrap();
        registry.set_last_status_poll(u64::MAX - 100);
        let poller = StatusPoller::new(1000);

        // 500 ms elapsed across the wrap
        assert_eq!(poller.poll_if_due(&mut registry, &mut bus, 399), None);
        // 1000 ms elapsed across the wrap
        assert!(poller.poll_if_due(&mut registry, &mut bus, 899).is_some());
    }

    proptest! {
        #[test]
        fn prop_at_most_one_poll_per_interval(
            interval in 1u64..5_000,
            steps in proptest::collection::vec(0u64..2_000, 1..40),
        ) {
            let mut registry = registry_with(&[0x68]);
            let mut bus = FakeBus::default();
            registry.setup(&mut bus).unwrap();
            let poller = StatusPoller::new(interval);

            let mut now = 0u64;
            let mut last_poll: Option<u64> = None;
            for step in steps {
                now += step;
                if poller.poll_if_due(&mut registry, &mut bus, now).is_some() {
                    if let Some(previous) = last_poll {
                        prop_assert!(now - previous >= interval);
                    }
                    last_poll = Some(now);
                }
            }
        }
    }
}
