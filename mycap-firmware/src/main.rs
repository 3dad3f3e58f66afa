//! mycap - Motion Capture Tracker Node Firmware
//!
//! Firmware binary for RP2040-based tracker nodes. A node carries up to
//! eight IMU trackers on one I2C bus, takes commands over a serial line and
//! joins Wi-Fi through an ESP-AT modem.
//!
//! Pin assignments:
//! - UART0 (GPIO0 TX, GPIO1 RX): command line
//! - UART1 (GPIO8 TX, GPIO9 RX): ESP-AT modem
//! - I2C0 (GPIO4 SDA, GPIO5 SCL): trackers

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mycap_core::service::Service;
use mycap_core::tracker::TrackerRegistry;
use mycap_drivers::net::EspAtLink;
use mycap_drivers::AnyTracker;
use mycap_hal::IoLineTransport;
use mycap_protocol::{builtin_commands, CommandDescriptor};

use crate::clock::EmbassyClock;
use crate::tasks::service::WifiLink;

mod clock;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// I2C bus clock for the trackers
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Built-in serial commands
static COMMANDS: [CommandDescriptor<WifiLink>; 1] = builtin_commands();

// Static cells for UART buffers (must live forever)
static CMD_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CMD_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static MODEM_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static MODEM_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("mycap firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let service_config = config::SERVICE;

    // Command UART
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = service_config.baudrate;
        cfg
    };
    let cmd_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config).into_buffered(
        Irqs,
        CMD_TX_BUF.init([0u8; 64]),
        CMD_RX_BUF.init([0u8; 256]),
    );
    let (_cmd_tx, cmd_rx) = cmd_uart.split();
    let transport = IoLineTransport::new(cmd_rx, EmbassyClock, service_config.read_timeout_ms);

    info!(
        "Command UART initialized ({} baud, {} ms line timeout)",
        service_config.baudrate, service_config.read_timeout_ms
    );

    // Modem UART, ESP-AT firmware defaults to 115200
    let modem_uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, UartConfig::default())
        .into_buffered(
            Irqs,
            MODEM_TX_BUF.init([0u8; 256]),
            MODEM_RX_BUF.init([0u8; 64]),
        );
    let (modem_tx, _modem_rx) = modem_uart.split();
    let link = EspAtLink::new(modem_tx);

    info!("Modem UART initialized");

    // Tracker bus
    let i2c_config = {
        let mut cfg = i2c::Config::default();
        cfg.frequency = I2C_FREQUENCY_HZ;
        cfg
    };
    let mut bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    // Tracker bring-up
    let mut registry = TrackerRegistry::<AnyTracker>::new();
    if let Err(e) = registry.register_all(&config::TRACKERS) {
        defmt::panic!("Invalid tracker table: {}", e);
    }
    if let Err(e) = registry.setup(&mut bus) {
        defmt::panic!("Tracker bring-up failed: {}", e);
    }

    for tracker in registry.trackers() {
        info!(
            "Tracker {}: {} at {:#x} is {}",
            tracker.index(),
            tracker.kind(),
            tracker.address(),
            tracker.state()
        );
    }

    let service = Service::with_config(&COMMANDS, registry, &service_config);
    info!(
        "Service ready, polling tracker status every {} ms",
        service.poller().interval_ms()
    );

    spawner
        .spawn(tasks::service_task(tasks::ServiceResources {
            service,
            transport,
            link,
            bus,
        }))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
