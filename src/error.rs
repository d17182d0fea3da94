#![allow(dead_code)] // Top-level `Error` funnel and `Result` alias reserved for adapters spanning subsystems

//! Unified error types for the RoomNode firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be passed around without allocation.
//!
//! None of these are fatal: transport and sensor failures are recovered by
//! unbounded blocking retry inside their owning component, and session
//! failures are recovered by the next tick's reconnect. An unrecognized
//! inbound command is deliberately *not* represented here; it resolves to
//! a no-op directive and is never reported as an error.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The underlying network association is unavailable.
    Transport(TransportError),
    /// The broker session failed or was lost.
    Session(SessionError),
    /// The sensor could not produce a reading.
    Sensor(SensorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Session(e) => write!(f, "session: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// A single association attempt failed.
    AssociationFailed,
    /// The link dropped after having been associated.
    LinkDown,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssociationFailed => write!(f, "association attempt failed"),
            Self::LinkDown => write!(f, "link down"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The broker refused or never answered the connect.
    ConnectRefused,
    /// Subscribing to the command topic failed.
    SubscribeFailed,
    /// An outbound publish could not be delivered.
    PublishFailed,
    /// The broker declared the session dead (missed keep-alives).
    KeepAliveTimeout,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectRefused => write!(f, "broker connect refused"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::KeepAliveTimeout => write!(f, "keep-alive timeout"),
        }
    }
}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The part has not finished calibration yet (cold start).
    NotReady,
    /// The I2C transaction failed.
    BusFault,
    /// The measurement frame was malformed or the busy flag never cleared.
    InvalidData,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "sensor not ready"),
            Self::BusFault => write!(f, "I2C bus fault"),
            Self::InvalidData => write!(f, "invalid measurement data"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
