//! Blocking converge-with-backoff primitive.
//!
//! Network association, session establishment, and sensor cold start all
//! share the same recovery contract: unbounded retry with a fixed
//! inter-attempt delay, blocking the whole process until the resource is
//! up. This single-purpose device has no competing work to protect, so
//! there is no cancellation or timeout escape hatch.

use core::fmt;

use log::{info, warn};

use super::ports::DelayPort;

/// Retry `attempt` until it succeeds, sleeping `delay_ms` between
/// failures. Never returns failure, only success, by contract.
pub fn converge<E: fmt::Display>(
    label: &str,
    delay_ms: u32,
    delay: &impl DelayPort,
    mut attempt: impl FnMut() -> Result<(), E>,
) {
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        match attempt() {
            Ok(()) => {
                info!("{}: up after {} attempt(s)", label, attempts);
                return;
            }
            Err(e) => {
                warn!(
                    "{}: attempt {} failed ({}), retrying in {}ms",
                    label, attempts, e, delay_ms
                );
                delay.delay_ms(delay_ms);
            }
        }
    }
}
