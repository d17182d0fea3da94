//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the RoomNode: broker session
//! lifecycle, command routing, and the telemetry-scheduling control loop.
//! All interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals or a live broker.

pub mod commands;
pub mod events;
pub mod ports;
pub mod retry;
pub mod router;
pub mod service;
pub mod session;
pub mod telemetry;
