//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured node events to the
//! logger (UART / USB-CDC in production). A future dashboard or RPC
//! adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::NodeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`NodeEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::SessionUp => {
                info!("SESSION | connected and subscribed");
            }
            NodeEvent::SessionLost => {
                warn!("SESSION | lost, reconnecting on next tick");
            }
            NodeEvent::Published(r) => {
                info!(
                    "TELEM | T={:.2}\u{00b0}C RH={:.2}% | t={}ms",
                    r.temperature_c, r.humidity_pct, r.taken_at_ms
                );
            }
            NodeEvent::Actuated { on } => {
                info!("LIGHT | {}", if *on { "ON" } else { "OFF" });
            }
            NodeEvent::CommandIgnored => {
                info!("CMD | unrecognized, ignored");
            }
        }
    }
}
