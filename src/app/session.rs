//! Broker session lifecycle.
//!
//! [`SessionManager`] owns the [`SessionState`] machine exclusively.
//! Transitions happen only via connect-attempt outcome or a transport
//! failure detected during [`pump`](SessionManager::pump). A refused
//! publish is *not* a transition: the reading is dropped and a dead
//! transport surfaces on the next pump.

use log::{debug, warn};

use crate::config::NodeConfig;
use crate::error::SessionError;

use super::events::NodeEvent;
use super::ports::{BrokerPort, CommandBatch, DelayPort, EventSink};
use super::retry;

/// The logical connected state between node and broker, distinct from the
/// underlying network association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owns the broker session: connect, subscribe, disconnect detection,
/// reconnect with fixed backoff.
pub struct SessionManager {
    state: SessionState,
    client_id: heapless::String<32>,
    command_topic: &'static str,
    retry_delay_ms: u32,
}

impl SessionManager {
    pub fn new(config: &NodeConfig, command_topic: &'static str) -> Self {
        Self {
            state: SessionState::Disconnected,
            client_id: config.client_id.clone(),
            command_topic,
            retry_delay_ms: config.session_retry_delay_ms,
        }
    }

    /// Current state, for diagnostics and tests.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Non-blocking probe.
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Blocking convergence primitive: returns only once the session is
    /// Connected and subscribed to the command topic.
    ///
    /// Connect and subscribe form one atomic step; a subscribe failure
    /// returns the state to Disconnected and the whole step is retried
    /// after the fixed delay. While this runs, no telemetry publish can
    /// occur; never publishing without a live session is worth the
    /// stalled cadence during an outage.
    pub fn ensure_connected(
        &mut self,
        broker: &mut impl BrokerPort,
        delay: &impl DelayPort,
        sink: &mut impl EventSink,
    ) {
        if self.state == SessionState::Connected {
            return;
        }
        let retry_delay_ms = self.retry_delay_ms;
        retry::converge("session", retry_delay_ms, delay, || self.attempt(broker));
        sink.emit(&NodeEvent::SessionUp);
    }

    /// One connect-and-subscribe step. Success leaves the session
    /// Connected; any failure returns it to Disconnected for the
    /// inter-attempt sleep.
    fn attempt(&mut self, broker: &mut impl BrokerPort) -> Result<(), SessionError> {
        self.state = SessionState::Connecting;
        let step = broker
            .connect(self.client_id.as_str())
            .and_then(|()| broker.subscribe(self.command_topic));
        self.state = match step {
            Ok(()) => SessionState::Connected,
            Err(_) => SessionState::Disconnected,
        };
        step
    }

    /// Service exactly one round of inbound delivery and keep-alive
    /// bookkeeping, returning the drained commands.
    ///
    /// Must be invoked every tick regardless of the publish cadence. A
    /// transport failure flips the state to Disconnected; commands drained
    /// before the failure are still returned; they were delivered.
    pub fn pump(&mut self, broker: &mut impl BrokerPort, sink: &mut impl EventSink) -> CommandBatch {
        let mut batch = CommandBatch::new();
        if self.state != SessionState::Connected {
            return batch;
        }
        if let Err(e) = broker.poll(&mut batch) {
            warn!("session: lost during pump ({})", e);
            self.state = SessionState::Disconnected;
            sink.emit(&NodeEvent::SessionLost);
        } else if !batch.is_empty() {
            debug!("session: drained {} inbound command(s)", batch.len());
        }
        batch
    }

    /// Fire-and-forget publish. A refused publish drops the reading and
    /// is *not* retried here; the next cadence tick re-reads and
    /// re-publishes fresh data, so stale retried data is never sent. It
    /// is also not a detected disconnect: the state stays untouched and
    /// a dead transport shows up on the next pump.
    pub fn publish(
        &self,
        broker: &mut impl BrokerPort,
        topic: &str,
        payload: &[u8],
    ) -> Result<(), SessionError> {
        if self.state != SessionState::Connected {
            return Err(SessionError::PublishFailed);
        }
        match broker.publish(topic, payload) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("session: publish to '{}' refused ({})", topic, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::Command;

    struct NoDelay;
    impl DelayPort for NoDelay {
        fn delay_ms(&self, _ms: u32) {}
    }

    #[derive(Default)]
    struct RecordingSink(Vec<NodeEvent>);
    impl EventSink for RecordingSink {
        fn emit(&mut self, event: &NodeEvent) {
            self.0.push(event.clone());
        }
    }

    /// Broker stub that fails the first `fail_connects` connect attempts.
    struct FlakyBroker {
        fail_connects: u32,
        connects: u32,
        subscriptions: Vec<String>,
        inbound: Vec<Command>,
        poll_fails: bool,
        publish_fails: bool,
    }

    impl FlakyBroker {
        fn new(fail_connects: u32) -> Self {
            Self {
                fail_connects,
                connects: 0,
                subscriptions: Vec::new(),
                inbound: Vec::new(),
                poll_fails: false,
                publish_fails: false,
            }
        }
    }

    impl BrokerPort for FlakyBroker {
        fn connect(&mut self, _client_id: &str) -> Result<(), SessionError> {
            self.connects += 1;
            if self.connects <= self.fail_connects {
                Err(SessionError::ConnectRefused)
            } else {
                Ok(())
            }
        }

        fn subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
            self.subscriptions.push(topic.to_string());
            Ok(())
        }

        fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), SessionError> {
            if self.publish_fails {
                Err(SessionError::PublishFailed)
            } else {
                Ok(())
            }
        }

        fn poll(&mut self, out: &mut CommandBatch) -> Result<(), SessionError> {
            if self.poll_fails {
                return Err(SessionError::KeepAliveTimeout);
            }
            for cmd in self.inbound.drain(..) {
                let _ = out.push(cmd);
            }
            Ok(())
        }
    }

    fn manager() -> SessionManager {
        SessionManager::new(&NodeConfig::default(), crate::config::TOPIC_LIGHTS)
    }

    #[test]
    fn starts_disconnected() {
        assert_eq!(manager().state(), SessionState::Disconnected);
    }

    #[test]
    fn connects_and_subscribes_in_one_step() {
        let mut m = manager();
        let mut broker = FlakyBroker::new(0);
        let mut sink = RecordingSink::default();
        m.ensure_connected(&mut broker, &NoDelay, &mut sink);
        assert_eq!(m.state(), SessionState::Connected);
        assert_eq!(broker.subscriptions, vec!["actuators/lights"]);
        assert_eq!(sink.0, vec![NodeEvent::SessionUp]);
    }

    #[test]
    fn failed_attempt_returns_to_disconnected() {
        let mut m = manager();
        let mut broker = FlakyBroker::new(1);
        assert!(m.attempt(&mut broker).is_err());
        // Between attempts (during the backoff sleep) the state reads
        // Disconnected, never Connecting.
        assert_eq!(m.state(), SessionState::Disconnected);
        assert!(m.attempt(&mut broker).is_ok());
        assert_eq!(m.state(), SessionState::Connected);
    }

    #[test]
    fn retries_until_broker_accepts() {
        let mut m = manager();
        let mut broker = FlakyBroker::new(4);
        let mut sink = RecordingSink::default();
        m.ensure_connected(&mut broker, &NoDelay, &mut sink);
        assert_eq!(m.state(), SessionState::Connected);
        assert_eq!(broker.connects, 5);
    }

    #[test]
    fn poll_failure_flips_to_disconnected() {
        let mut m = manager();
        let mut broker = FlakyBroker::new(0);
        let mut sink = RecordingSink::default();
        m.ensure_connected(&mut broker, &NoDelay, &mut sink);

        broker.poll_fails = true;
        let batch = m.pump(&mut broker, &mut sink);
        assert!(batch.is_empty());
        assert_eq!(m.state(), SessionState::Disconnected);
        assert_eq!(sink.0.last(), Some(&NodeEvent::SessionLost));
    }

    #[test]
    fn pump_while_disconnected_is_empty_noop() {
        let mut m = manager();
        let mut broker = FlakyBroker::new(0);
        let mut sink = RecordingSink::default();
        let batch = m.pump(&mut broker, &mut sink);
        assert!(batch.is_empty());
        assert_eq!(m.state(), SessionState::Disconnected);
    }

    #[test]
    fn publish_while_disconnected_never_reaches_broker() {
        struct PanicBroker;
        impl BrokerPort for PanicBroker {
            fn connect(&mut self, _: &str) -> Result<(), SessionError> {
                Ok(())
            }
            fn subscribe(&mut self, _: &str) -> Result<(), SessionError> {
                Ok(())
            }
            fn publish(&mut self, _: &str, _: &[u8]) -> Result<(), SessionError> {
                panic!("publish must not be attempted while disconnected");
            }
            fn poll(&mut self, _: &mut CommandBatch) -> Result<(), SessionError> {
                Ok(())
            }
        }
        let m = manager();
        let r = m.publish(&mut PanicBroker, "sensors/temperature", b"21.50");
        assert_eq!(r, Err(SessionError::PublishFailed));
    }

    #[test]
    fn refused_publish_keeps_session_connected() {
        let mut m = manager();
        let mut broker = FlakyBroker::new(0);
        let mut sink = RecordingSink::default();
        m.ensure_connected(&mut broker, &NoDelay, &mut sink);

        broker.publish_fails = true;
        let r = m.publish(&mut broker, "sensors/temperature", b"21.50");
        assert_eq!(r, Err(SessionError::PublishFailed));
        assert_eq!(m.state(), SessionState::Connected);
        assert!(!sink.0.contains(&NodeEvent::SessionLost));
    }
}
