//! Telemetry readings and wire formatting.
//!
//! A [`Reading`] is produced on demand and consumed immediately by the
//! publish path; nothing is persisted. The wire format is the bare
//! decimal rendering with exactly two fractional digits and no unit
//! suffix, e.g. `23.46` or `-0.00`.

use core::fmt::Write as _;

/// Wire rendering of one scalar, e.g. `-123.45`.
pub type ScalarString = heapless::String<16>;

/// A point-in-time ambient measurement pair.
///
/// Invariant: a `Reading` only exists when *both* scalars were valid; a
/// not-ready sensor yields no `Reading` at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Ambient temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Relative humidity in percent.
    pub humidity_pct: f32,
    /// Monotonic milliseconds-since-boot when the reading was taken.
    pub taken_at_ms: u64,
}

/// Render a scalar with exactly two fractional digits.
pub fn format_scalar(value: f32) -> ScalarString {
    let mut out = ScalarString::new();
    // A f32 rendered at two fractional digits always fits 16 bytes.
    let _ = write!(out, "{value:.2}");
    out
}
