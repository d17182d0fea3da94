//! MQTT broker adapter.
//!
//! Implements [`BrokerPort`] on top of the ESP-IDF MQTT client. The
//! client delivers inbound messages on a dedicated connection handle; a
//! background thread forwards them into a channel which
//! [`BrokerPort::poll`] drains synchronously; the domain core never runs
//! inside a library callback.
//!
//! Session *state* is not tracked here; the adapter reports per-call
//! success or failure and the `SessionManager` owns the state machine.
//!
//! ## cfg gating
//!
//! - **`espidf` feature**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **host**: in-memory simulation stub with scriptable failures.

#[cfg(not(feature = "espidf"))]
use log::debug;
use log::warn;

use crate::app::commands::Command;
use crate::app::ports::{BrokerPort, CommandBatch};
use crate::config::NodeConfig;
use crate::error::SessionError;

#[cfg(feature = "espidf")]
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc, Arc,
};

#[cfg(feature = "espidf")]
use esp_idf_svc::mqtt::client::{
    EspMqttClient, EventPayload, MqttClientConfiguration, QoS,
};

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "espidf")]
pub struct MqttBroker {
    url: String,
    client: Option<EspMqttClient<'static>>,
    inbound_rx: Option<mpsc::Receiver<Command>>,
    connected: Arc<AtomicBool>,
    /// Poll granularity while waiting for the CONNACK flag.
    connect_poll_ms: u32,
    /// Give up on a single connect attempt after this many polls.
    connect_poll_limit: u32,
}

#[cfg(feature = "espidf")]
impl MqttBroker {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            url: format!("mqtt://{}:{}", config.broker_host, config.broker_port),
            client: None,
            inbound_rx: None,
            connected: Arc::new(AtomicBool::new(false)),
            connect_poll_ms: 100,
            connect_poll_limit: 100,
        }
    }

    fn spawn_event_pump(
        mut connection: esp_idf_svc::mqtt::client::EspMqttConnection,
        tx: mpsc::Sender<Command>,
        connected: Arc<AtomicBool>,
    ) {
        std::thread::Builder::new()
            .name("mqtt-events".into())
            .stack_size(6 * 1024)
            .spawn(move || {
                while let Ok(event) = connection.next() {
                    match event.payload() {
                        EventPayload::Connected(_) => {
                            connected.store(true, Ordering::Release);
                        }
                        EventPayload::Disconnected => {
                            connected.store(false, Ordering::Release);
                        }
                        EventPayload::Received {
                            topic: Some(topic),
                            data,
                            ..
                        } => {
                            match Command::new(topic, data) {
                                Some(cmd) => {
                                    // Receiver gone means the adapter was
                                    // dropped; exit the pump.
                                    if tx.send(cmd).is_err() {
                                        break;
                                    }
                                }
                                None => {
                                    warn!("mqtt: dropping oversized message on '{}'", topic);
                                }
                            }
                        }
                        _ => {}
                    }
                }
                connected.store(false, Ordering::Release);
            })
            .ok();
    }
}

#[cfg(feature = "espidf")]
impl BrokerPort for MqttBroker {
    fn connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        if self.client.is_none() {
            let conf = MqttClientConfiguration {
                client_id: Some(client_id),
                ..Default::default()
            };
            let (client, connection) = EspMqttClient::new(&self.url, &conf)
                .map_err(|_| SessionError::ConnectRefused)?;
            let (tx, rx) = mpsc::channel();
            Self::spawn_event_pump(connection, tx, Arc::clone(&self.connected));
            self.client = Some(client);
            self.inbound_rx = Some(rx);
        }

        // The client connects (and reconnects) in the background; wait a
        // bounded time for the CONNACK flag, then report the attempt's
        // outcome to the session state machine.
        for _ in 0..self.connect_poll_limit {
            if self.connected.load(Ordering::Acquire) {
                return Ok(());
            }
            esp_idf_hal::delay::FreeRtos::delay_ms(self.connect_poll_ms);
        }
        Err(SessionError::ConnectRefused)
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
        let client = self.client.as_mut().ok_or(SessionError::SubscribeFailed)?;
        client
            .subscribe(topic, QoS::AtMostOnce)
            .map(|_| ())
            .map_err(|_| SessionError::SubscribeFailed)
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(SessionError::PublishFailed);
        }
        let client = self.client.as_mut().ok_or(SessionError::PublishFailed)?;
        client
            .enqueue(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|_| SessionError::PublishFailed)
    }

    fn poll(&mut self, out: &mut CommandBatch) -> Result<(), SessionError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(SessionError::KeepAliveTimeout);
        }
        if let Some(rx) = &self.inbound_rx {
            while let Ok(cmd) = rx.try_recv() {
                if out.push(cmd).is_err() {
                    // Batch full; leave the rest for the next tick.
                    break;
                }
            }
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(feature = "espidf"))]
pub struct MqttBroker {
    url: String,
    connected: bool,
    fail_connects: u32,
    inbound: std::collections::VecDeque<Command>,
    published: Vec<(String, Vec<u8>)>,
}

#[cfg(not(feature = "espidf"))]
impl MqttBroker {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            url: format!("mqtt://{}:{}", config.broker_host, config.broker_port),
            connected: false,
            fail_connects: 0,
            inbound: std::collections::VecDeque::new(),
            published: Vec::new(),
        }
    }

    /// Script the next `n` connect attempts to fail.
    pub fn sim_fail_connects(&mut self, n: u32) {
        self.fail_connects = n;
    }

    /// Inject an inbound message for the next poll round.
    pub fn sim_inject(&mut self, topic: &str, payload: &[u8]) {
        if let Some(cmd) = Command::new(topic, payload) {
            self.inbound.push_back(cmd);
        }
    }

    /// Everything published so far, in order.
    pub fn sim_published(&self) -> &[(String, Vec<u8>)] {
        &self.published
    }
}

#[cfg(not(feature = "espidf"))]
impl BrokerPort for MqttBroker {
    fn connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        if self.fail_connects > 0 {
            self.fail_connects -= 1;
            return Err(SessionError::ConnectRefused);
        }
        self.connected = true;
        debug!("mqtt(sim): connected to {} as '{}'", self.url, client_id);
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::SubscribeFailed);
        }
        debug!("mqtt(sim): subscribed to '{}'", topic);
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::PublishFailed);
        }
        self.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    fn poll(&mut self, out: &mut CommandBatch) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::KeepAliveTimeout);
        }
        while let Some(cmd) = self.inbound.pop_front() {
            if out.push(cmd).is_err() {
                warn!("mqtt(sim): batch full, deferring remaining inbound");
                break;
            }
        }
        Ok(())
    }
}

#[cfg(all(test, not(feature = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn connect_failures_are_scriptable() {
        let mut b = MqttBroker::new(&NodeConfig::default());
        b.sim_fail_connects(2);
        assert!(b.connect("esp32-device").is_err());
        assert!(b.connect("esp32-device").is_err());
        assert!(b.connect("esp32-device").is_ok());
    }

    #[test]
    fn poll_drains_injected_inbound() {
        let mut b = MqttBroker::new(&NodeConfig::default());
        b.connect("esp32-device").unwrap();
        b.sim_inject("actuators/lights", b"ON");
        b.sim_inject("actuators/lights", b"OFF");

        let mut batch = CommandBatch::new();
        b.poll(&mut batch).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].payload.as_slice(), b"ON");
        assert_eq!(batch[1].payload.as_slice(), b"OFF");

        batch.clear();
        b.poll(&mut batch).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn publish_requires_connection() {
        let mut b = MqttBroker::new(&NodeConfig::default());
        assert_eq!(
            b.publish("sensors/temperature", b"21.50"),
            Err(SessionError::PublishFailed)
        );
    }
}
