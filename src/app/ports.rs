//! Port traits: the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService (domain)
//! ```
//!
//! Driven adapters (WiFi, MQTT client, AHT10, GPIO, logger) implement
//! these traits. The [`NodeService`](super::service::NodeService) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::error::{SensorError, SessionError, TransportError};

use super::commands::Command;
use super::events::NodeEvent;

/// Maximum number of inbound commands drained per pump round.
pub const INBOUND_BATCH: usize = 8;

/// One pump round's worth of drained inbound commands.
pub type CommandBatch = heapless::Vec<Command, INBOUND_BATCH>;

// ───────────────────────────────────────────────────────────────
// Network link port (driven adapter: WiFi STA → domain)
// ───────────────────────────────────────────────────────────────

/// The underlying network association, below the broker session.
///
/// A single attempt either succeeds or fails; the unbounded blocking retry
/// lives in the caller (via [`retry::converge`](super::retry::converge)),
/// not in the adapter.
pub trait NetworkLink {
    /// Make one association attempt.
    fn try_associate(&mut self) -> Result<(), TransportError>;

    /// Non-blocking association probe.
    fn is_associated(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Broker port (driven adapter: MQTT client → domain)
// ───────────────────────────────────────────────────────────────

/// Raw broker operations. Session state is *not* tracked here; that is
/// the [`SessionManager`](super::session::SessionManager)'s job; the
/// adapter only reports per-call success or failure.
pub trait BrokerPort {
    /// Open a broker connection under `client_id`.
    fn connect(&mut self, client_id: &str) -> Result<(), SessionError>;

    /// Subscribe to `topic` on the open connection.
    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError>;

    /// Deliver one message. Fire-and-forget: no broker-side retry.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError>;

    /// Service one round of keep-alive bookkeeping and drain any inbound
    /// messages into `out`. Must be called every tick or the broker side
    /// declares the session dead.
    fn poll(&mut self, out: &mut CommandBatch) -> Result<(), SessionError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: AHT10 → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain ambient measurements.
pub trait SensorPort {
    /// Make one cold-start initialization attempt. The unbounded blocking
    /// retry lives in the caller, same contract as [`NetworkLink`].
    fn try_init(&mut self) -> Result<(), SensorError>;

    /// Ambient temperature in degrees Celsius.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;

    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the light output.
pub trait ActuatorPort {
    /// Set the output level. Re-asserts the physical pin on every call,
    /// even when the new value equals the old one.
    fn set(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`NodeEvent`]s through this port. Adapters
/// decide where they go (serial log in production, a Vec in tests).
pub trait EventSink {
    fn emit(&mut self, event: &NodeEvent);
}

// ───────────────────────────────────────────────────────────────
// Time and delay ports
// ───────────────────────────────────────────────────────────────

/// Monotonic clock. The control loop compares milliseconds-since-boot to
/// gate the publish cadence.
pub trait TimePort {
    fn uptime_ms(&self) -> u64;
}

/// Blocking delay. Injected so tests can count sleeps instead of serving
/// them.
pub trait DelayPort {
    fn delay_ms(&self, ms: u32);
}
