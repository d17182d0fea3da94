//! RoomNode firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by the `espidf`
//! feature within each module; host builds get simulation stubs.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;

pub mod adapters;
pub mod sensors;
