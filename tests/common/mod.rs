//! Mock ports for integration tests.
//!
//! Records every broker, actuator and delay call so tests can assert on
//! the full interaction history without a live broker or real hardware.

use roomnode::app::commands::Command;
use roomnode::app::events::NodeEvent;
use roomnode::app::ports::{
    ActuatorPort, BrokerPort, CommandBatch, DelayPort, EventSink, SensorPort,
};
use roomnode::error::{SensorError, SessionError};
use std::cell::RefCell;
use std::collections::VecDeque;

// ── Broker mock ───────────────────────────────────────────────

/// Scriptable broker double. Every publish call lands in
/// `publish_attempts` whether accepted or refused, so tests can tell a
/// dropped reading apart from one that was never attempted.
pub struct MockBroker {
    pub connected: bool,
    /// Remaining connect attempts that will be refused.
    pub fail_connects: u32,
    /// When set, the next poll reports a transport failure and drops the
    /// connection.
    pub fail_next_poll: bool,
    /// When set, every publish is refused.
    pub fail_publishes: bool,
    /// Topics whose publishes are refused.
    pub fail_publish_on: Vec<String>,
    pub connect_attempts: u32,
    pub subscriptions: Vec<String>,
    pub inbound: VecDeque<Command>,
    /// Topic of every publish call, accepted or refused, in order.
    pub publish_attempts: Vec<String>,
    pub published: Vec<(String, Vec<u8>)>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self {
            connected: false,
            fail_connects: 0,
            fail_next_poll: false,
            fail_publishes: false,
            fail_publish_on: Vec::new(),
            connect_attempts: 0,
            subscriptions: Vec::new(),
            inbound: VecDeque::new(),
            publish_attempts: Vec::new(),
            published: Vec::new(),
        }
    }

    pub fn inject(&mut self, topic: &str, payload: &[u8]) {
        self.inbound
            .push_back(Command::new(topic, payload).expect("test message fits capacities"));
    }

    pub fn published_on(&self, topic: &str) -> Vec<&[u8]> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.as_slice())
            .collect()
    }
}

impl Default for MockBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerPort for MockBroker {
    fn connect(&mut self, _client_id: &str) -> Result<(), SessionError> {
        self.connect_attempts += 1;
        if self.fail_connects > 0 {
            self.fail_connects -= 1;
            return Err(SessionError::ConnectRefused);
        }
        self.connected = true;
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
        assert!(self.connected, "subscribe on a dead connection");
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        self.publish_attempts.push(topic.to_string());
        if !self.connected
            || self.fail_publishes
            || self.fail_publish_on.iter().any(|t| t == topic)
        {
            return Err(SessionError::PublishFailed);
        }
        self.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    fn poll(&mut self, out: &mut CommandBatch) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::KeepAliveTimeout);
        }
        if self.fail_next_poll {
            self.fail_next_poll = false;
            self.connected = false;
            return Err(SessionError::KeepAliveTimeout);
        }
        while let Some(cmd) = self.inbound.pop_front() {
            if out.push(cmd).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// ── Sensor mock ───────────────────────────────────────────────

/// Sensor double serving one settable measurement pair; tests flip the
/// value (or a NotReady fault) between ticks.
pub struct MockSensor {
    pub value: Result<(f32, f32), SensorError>,
    pub reads: u32,
}

impl MockSensor {
    pub fn always(temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            value: Ok((temperature_c, humidity_pct)),
            reads: 0,
        }
    }

    pub fn not_ready() -> Self {
        Self {
            value: Err(SensorError::NotReady),
            reads: 0,
        }
    }

    pub fn set(&mut self, temperature_c: f32, humidity_pct: f32) {
        self.value = Ok((temperature_c, humidity_pct));
    }
}

impl SensorPort for MockSensor {
    fn try_init(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        self.value.map(|(t, _)| t)
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        self.value.map(|(_, h)| h)
    }
}

// ── Actuator mock ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockLight {
    pub is_on: bool,
    pub set_calls: Vec<bool>,
}

impl MockLight {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActuatorPort for MockLight {
    fn set(&mut self, on: bool) {
        self.is_on = on;
        self.set_calls.push(on);
    }
}

// ── Delay mock ────────────────────────────────────────────────

/// Counts sleeps instead of serving them, so reconnect-backoff tests run
/// instantly.
#[derive(Default)]
pub struct CountingDelay {
    pub sleeps: RefCell<Vec<u32>>,
}

impl CountingDelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DelayPort for CountingDelay {
    fn delay_ms(&self, ms: u32) {
        self.sleeps.borrow_mut().push(ms);
    }
}

// ── Event sink mock ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<NodeEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &NodeEvent) {
        self.events.push(event.clone());
    }
}
