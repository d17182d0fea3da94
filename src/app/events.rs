//! Outbound application events.
//!
//! The [`NodeService`](super::service::NodeService) and
//! [`SessionManager`](super::session::SessionManager) emit these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them; the production adapter logs them to
//! serial, tests record them in a Vec.

use super::telemetry::Reading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    /// The broker session reached Connected (subscription included).
    SessionUp,

    /// A transport failure was detected; the session is gone.
    SessionLost,

    /// A telemetry reading was published.
    Published(Reading),

    /// The light output was (re-)asserted.
    Actuated { on: bool },

    /// An inbound command matched nothing in the routing table.
    CommandIgnored,
}
