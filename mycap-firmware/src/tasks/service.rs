//! Service task
//!
//! Runs the cooperative service loop: every tick reads at most one command
//! line from the command UART, then polls tracker status when due. After
//! each poll the per-tracker status packets are built and logged.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{Duration, Ticker};

use mycap_core::service::Service;
use mycap_drivers::net::EspAtLink;
use mycap_drivers::AnyTracker;
use mycap_hal::{Clock, IoLineTransport};
use mycap_protocol::PacketWriter;

use crate::clock::EmbassyClock;

/// Service loop period in milliseconds
pub const SERVICE_TICK_MS: u64 = 10;

/// Modem link the command handlers act on
pub type WifiLink = EspAtLink<BufferedUartTx>;

/// Tracker bus
pub type TrackerBus = I2c<'static, I2C0, Blocking>;

/// Everything the service loop owns
pub struct ServiceResources {
    pub service: Service<'static, WifiLink, AnyTracker>,
    pub transport: IoLineTransport<BufferedUartRx, EmbassyClock>,
    pub link: WifiLink,
    pub bus: TrackerBus,
}

#[embassy_executor::task]
pub async fn service_task(resources: ServiceResources) {
    info!("Service task started");

    let ServiceResources {
        mut service,
        mut transport,
        mut link,
        mut bus,
    } = resources;

    let clock = EmbassyClock;
    let mut packets = PacketWriter::new();
    let mut ticker = Ticker::every(Duration::from_millis(SERVICE_TICK_MS));

    loop {
        let report = service.tick(&mut transport, &mut link, &mut bus, clock.now_ms());

        if let Some(poll) = report.poll {
            trace!("Status poll: {}", poll);
            for (index, status) in service.registry().status_reports() {
                let Some(packet) = packets.tracker_status(index, status) else {
                    warn!("Packet numbers exhausted, status packets stop until a new handshake");
                    break;
                };
                match packet.encode_to_vec() {
                    Ok(bytes) => debug!("Status packet: {=[u8]:x}", bytes.as_slice()),
                    Err(e) => warn!("Status packet encoding failed: {}", e),
                }
            }
        }

        ticker.next().await;
    }
}
