//! RoomNode Firmware: Main Entry Point
//!
//! Hexagonal architecture: every hardware and network dependency enters
//! the domain core through a port trait.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  WifiLink      MqttBroker    Aht10        LightDriver    │
//! │  (NetworkLink) (BrokerPort)  (SensorPort) (ActuatorPort) │
//! │  NodeClock     LogEventSink                              │
//! │  (Time/Delay)  (EventSink)                               │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            NodeService (pure logic)            │      │
//! │  │     session · command router · cadence         │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use esp_idf_hal::gpio::{OutputPin as _, Pin as _};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::prelude::*;

use roomnode::adapters::light::LightDriver;
use roomnode::adapters::log_sink::LogEventSink;
use roomnode::adapters::mqtt::MqttBroker;
use roomnode::adapters::time::NodeClock;
use roomnode::adapters::wifi::WifiLink;
use roomnode::app::ports::{NetworkLink, SensorPort, TimePort};
use roomnode::app::retry::converge;
use roomnode::app::service::NodeService;
use roomnode::config::NodeConfig;
use roomnode::sensors::aht10::Aht10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("RoomNode v{}", env!("CARGO_PKG_VERSION"));

    let config = NodeConfig::default();
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let clock = NodeClock::new();

    // ── 2. Sensor cold start ──────────────────────────────────
    // The AHT10 hangs off I2C0 on the stock Wire pins. Cold start blocks
    // until the part reports its calibration coefficients loaded, 5 s
    // between attempts; the node has nothing to publish without it.
    let sda = peripherals.pins.gpio21;
    let scl = peripherals.pins.gpio22;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(100.kHz().into()),
    )?;
    let mut sensor = Aht10::new(i2c, config.sensor_i2c_addr, clock);
    converge("aht10", config.sensor_retry_delay_ms, &clock, || {
        sensor.try_init()
    });

    // ── 3. Network association ────────────────────────────────
    // Blocks until associated, 500 ms between attempts. The device has
    // no other job while offline.
    let mut link = WifiLink::new(peripherals.modem, sysloop, nvs, &config)?;
    converge("wifi", config.link_retry_delay_ms, &clock, || {
        link.try_associate()
    });

    // ── 4. Remaining adapters + service ───────────────────────
    let light_pin = peripherals.pins.gpio4;
    debug_assert_eq!(light_pin.pin(), config.light_gpio);
    let mut light = LightDriver::new(light_pin.downgrade_output())?;

    let mut broker = MqttBroker::new(&config);
    let mut sink = LogEventSink::new();
    let mut service = NodeService::new(&config);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    // Session convergence blocks inside tick() while the broker is
    // unreachable; otherwise the tick rate is paced by the inbound poll.
    loop {
        service.tick(
            clock.uptime_ms(),
            &mut broker,
            &mut sensor,
            &mut light,
            &clock,
            &mut sink,
        );
    }
}
