//! Command router: the fixed topic/payload decision table.
//!
//! | topic               | payload       | directive    |
//! |---------------------|---------------|--------------|
//! | `actuators/lights`  | `ON`          | TurnOn       |
//! | `actuators/lights`  | `OFF`         | TurnOff      |
//! | `actuators/lights`  | anything else | Unrecognized |
//! | any other topic     | any           | Unrecognized |
//!
//! Exact-match, case-sensitive byte comparison with no whitespace
//! tolerance. A mis-sent command must never halt telemetry, so anything
//! outside the table is silently ignored rather than treated as an error.

use crate::config::{PAYLOAD_OFF, PAYLOAD_ON, TOPIC_LIGHTS};

use super::commands::{ActuatorDirective, Command};

/// Resolve one inbound command. Total and side-effect free.
pub fn route(cmd: &Command) -> ActuatorDirective {
    if cmd.topic.as_str() != TOPIC_LIGHTS {
        return ActuatorDirective::Unrecognized;
    }
    if cmd.payload.as_slice() == PAYLOAD_ON {
        ActuatorDirective::TurnOn
    } else if cmd.payload.as_slice() == PAYLOAD_OFF {
        ActuatorDirective::TurnOff
    } else {
        ActuatorDirective::Unrecognized
    }
}
