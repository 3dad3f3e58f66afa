//! Cooperative service loop body
//!
//! One [`Service::tick`] handles at most one command line and then gives
//! the status poller its chance. Nothing in a tick blocks past the
//! transport's read timeout, so commands and polling interleave on a
//! single executor task.

use mycap_hal::LineTransport;
use mycap_protocol::{CommandDescriptor, DispatchOutcome, Dispatcher, LineReader};

use crate::config::ServiceConfig;
use crate::poller::{PollSummary, StatusPoller};
use crate::tracker::{TrackerDriver, TrackerRegistry};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Outcome of the command line read this tick, if any was framed
    pub command: Option<DispatchOutcome>,
    /// Summary of the status poll, if one was due
    pub poll: Option<PollSummary>,
}

impl TickReport {
    /// Check if the tick did nothing
    pub fn is_idle(&self) -> bool {
        self.command.is_none() && self.poll.is_none()
    }
}

/// Command input plus tracker upkeep
///
/// `C` is the context command handlers act on; `D` is the tracker driver.
pub struct Service<'t, C, D> {
    lines: LineReader,
    dispatcher: Dispatcher<'t, C>,
    registry: TrackerRegistry<D>,
    poller: StatusPoller,
}

impl<'t, C, D> Service<'t, C, D> {
    pub fn new(
        commands: &'t [CommandDescriptor<C>],
        registry: TrackerRegistry<D>,
        poller: StatusPoller,
    ) -> Self {
        Self {
            lines: LineReader::new(),
            dispatcher: Dispatcher::new(commands),
            registry,
            poller,
        }
    }

    /// Create a service with the poll interval from `config`
    pub fn with_config(
        commands: &'t [CommandDescriptor<C>],
        registry: TrackerRegistry<D>,
        config: &ServiceConfig,
    ) -> Self {
        Self::new(
            commands,
            registry,
            StatusPoller::new(config.status_poll_interval_ms),
        )
    }

    pub fn registry(&self) -> &TrackerRegistry<D> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TrackerRegistry<D> {
        &mut self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher<'t, C> {
        &self.dispatcher
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    /// Run one iteration of the service loop
    pub fn tick<T, BUS>(
        &mut self,
        transport: &mut T,
        ctx: &mut C,
        bus: &mut BUS,
        now_ms: u64,
    ) -> TickReport
    where
        T: LineTransport,
        D: TrackerDriver<BUS>,
    {
        let command = self.lines.try_read_line(transport).map(|frame| {
            let outcome = self.dispatcher.dispatch(&frame, ctx);
            #[cfg(feature = "defmt")]
            match outcome {
                DispatchOutcome::Executed => defmt::info!("Command executed: {}", frame),
                _ => defmt::debug!("Command dropped ({}): {}", outcome, frame),
            }
            outcome
        });

        let poll = self.poller.poll_if_due(&mut self.registry, bus, now_ms);

        TickReport { command, poll }
    }
}
