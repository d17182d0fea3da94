//! Inbound commands and resolved actuator directives.
//!
//! A [`Command`] is the raw topic/payload pair drained from the broker
//! during a pump round; it lives only for the duration of one dispatch.
//! The [`router`](super::router) resolves it into an [`ActuatorDirective`]
//! which the control loop applies to the actuator port.

/// Maximum stored topic length for an inbound message.
pub const MAX_TOPIC_LEN: usize = 64;
/// Maximum stored payload length for an inbound message.
pub const MAX_PAYLOAD_LEN: usize = 64;

/// One inbound broker message, scoped to a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub topic: heapless::String<MAX_TOPIC_LEN>,
    pub payload: heapless::Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Command {
    /// Build a command from wire data. Returns `None` when topic or
    /// payload exceed the fixed capacities; such messages could never
    /// match the routing table anyway.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let mut t = heapless::String::new();
        t.push_str(topic).ok()?;
        let mut p = heapless::Vec::new();
        p.extend_from_slice(payload).ok()?;
        Some(Self {
            topic: t,
            payload: p,
        })
    }
}

/// The resolved actuator action derived from an inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorDirective {
    /// Switch the light on.
    TurnOn,
    /// Switch the light off.
    TurnOff,
    /// Unknown topic or payload; deliberate no-op, never an error.
    Unrecognized,
}
