//! Sensor subsystem.
//!
//! One ambient sensor on this node: the AHT10 temperature/humidity part.
//! The driver is generic over `embedded_hal::i2c::I2c` so the wire
//! protocol and conversion math are unit-testable on the host.

pub mod aht10;
