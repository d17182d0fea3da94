//! Node service: the control loop core.
//!
//! One [`tick`](NodeService::tick) is a single iteration of the main loop:
//! converge the session, drain and apply inbound commands, then publish
//! telemetry if the cadence interval elapsed. Command delivery always
//! precedes any publish attempt within the same tick, and no publish ever
//! occurs while the session is not Connected.
//!
//! ```text
//!  BrokerPort ⇄ ┌─────────────────────────────┐ ──▶ EventSink
//!  SensorPort ─▶│         NodeService          │
//!               │  session · router · cadence  │
//! ActuatorPort ◀└─────────────────────────────┘
//! ```

use log::{debug, warn};

use crate::config::{NodeConfig, TOPIC_HUMIDITY, TOPIC_LIGHTS, TOPIC_TEMPERATURE};

use super::commands::ActuatorDirective;
use super::events::NodeEvent;
use super::ports::{ActuatorPort, BrokerPort, DelayPort, EventSink, SensorPort};
use super::router;
use super::session::{SessionManager, SessionState};
use super::telemetry::{format_scalar, Reading};

/// Orchestrates session liveness, command handling and the publish
/// cadence. Single-threaded and cooperative: there is exactly one logical
/// thread of control, so no field here needs locking.
pub struct NodeService {
    session: SessionManager,
    publish_interval_ms: u32,
    /// Monotonic instant of the last publish *attempt* (not success).
    last_publish_at_ms: u64,
    tick_count: u64,
}

impl NodeService {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            session: SessionManager::new(config, TOPIC_LIGHTS),
            publish_interval_ms: config.publish_interval_ms,
            last_publish_at_ms: 0,
            tick_count: 0,
        }
    }

    /// Run one full control cycle.
    ///
    /// Blocks inside session convergence while the broker is unreachable;
    /// an accepted tradeoff: correctness (never publish without a live
    /// session) over liveness of the telemetry cadence during outages.
    pub fn tick(
        &mut self,
        now_ms: u64,
        broker: &mut impl BrokerPort,
        sensor: &mut impl SensorPort,
        light: &mut impl ActuatorPort,
        delay: &impl DelayPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Session liveness: blocking until Connected.
        if !self.session.is_connected() {
            self.session.ensure_connected(broker, delay, sink);
        }

        // 2. Drain inbound commands, strictly before any publish.
        let commands = self.session.pump(broker, sink);
        for cmd in &commands {
            match router::route(cmd) {
                ActuatorDirective::TurnOn => {
                    light.set(true);
                    sink.emit(&NodeEvent::Actuated { on: true });
                }
                ActuatorDirective::TurnOff => {
                    light.set(false);
                    sink.emit(&NodeEvent::Actuated { on: false });
                }
                ActuatorDirective::Unrecognized => {
                    debug!("ignoring command on '{}'", cmd.topic);
                    sink.emit(&NodeEvent::CommandIgnored);
                }
            }
        }

        // 3. Telemetry cadence.
        let elapsed = now_ms.saturating_sub(self.last_publish_at_ms);
        if elapsed > u64::from(self.publish_interval_ms) {
            // Stamp before the read: a slow or failing read must not
            // re-trigger on the very next tick.
            self.last_publish_at_ms = now_ms;
            self.publish_reading(now_ms, broker, sensor, sink);
        }
    }

    /// Read both scalars and publish them on their fixed topics.
    /// Either scalar not ready skips the whole reading; one publish
    /// failing does not block the other.
    fn publish_reading(
        &self,
        now_ms: u64,
        broker: &mut impl BrokerPort,
        sensor: &mut impl SensorPort,
        sink: &mut impl EventSink,
    ) {
        let temperature_c = match sensor.read_temperature() {
            Ok(v) => v,
            Err(e) => {
                warn!("skipping publish: {}", e);
                return;
            }
        };
        let humidity_pct = match sensor.read_humidity() {
            Ok(v) => v,
            Err(e) => {
                warn!("skipping publish: {}", e);
                return;
            }
        };

        let reading = Reading {
            temperature_c,
            humidity_pct,
            taken_at_ms: now_ms,
        };

        let temp_payload = format_scalar(temperature_c);
        let hum_payload = format_scalar(humidity_pct);

        let temp_ok = self
            .session
            .publish(broker, TOPIC_TEMPERATURE, temp_payload.as_bytes())
            .is_ok();
        let hum_ok = self
            .session
            .publish(broker, TOPIC_HUMIDITY, hum_payload.as_bytes())
            .is_ok();

        if temp_ok || hum_ok {
            sink.emit(&NodeEvent::Published(reading));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current broker session state.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Monotonic instant of the last publish attempt.
    pub fn last_publish_at_ms(&self) -> u64 {
        self.last_publish_at_ms
    }
}
