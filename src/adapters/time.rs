//! Monotonic clock and blocking delay adapter.
//!
//! - **`espidf` feature**: wraps `esp_timer_get_time()` (microsecond
//!   precision, monotonic) and the FreeRTOS task delay.
//! - **host**: `std::time::Instant` and `std::thread::sleep` for tests
//!   and simulation.

use crate::app::ports::{DelayPort, TimePort};

/// Clock + delay source for the node. Cheap to copy so the sensor driver
/// and the main loop can each hold one.
#[derive(Clone, Copy)]
pub struct NodeClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for NodeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl TimePort for NodeClock {
    #[cfg(feature = "espidf")]
    fn uptime_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    #[cfg(not(feature = "espidf"))]
    fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl DelayPort for NodeClock {
    #[cfg(feature = "espidf")]
    fn delay_ms(&self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(feature = "espidf"))]
    fn delay_ms(&self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
