//! Light output adapter.
//!
//! Implements [`ActuatorPort`] over a single GPIO. Every call re-asserts
//! the pin level even when the logical state is unchanged, so an output
//! disturbed externally is corrected by the next directive.
//!
//! ## cfg gating
//!
//! - **`espidf` feature**: `esp_idf_hal::gpio::PinDriver` push-pull output.
//! - **host**: logical state plus an assertion counter for tests.

use log::info;

use crate::app::ports::ActuatorPort;

#[cfg(feature = "espidf")]
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

/// Binary light output on one GPIO.
pub struct LightDriver {
    is_on: bool,
    #[cfg(feature = "espidf")]
    pin: PinDriver<'static, AnyOutputPin, Output>,
    #[cfg(not(feature = "espidf"))]
    assertions: u32,
}

#[cfg(feature = "espidf")]
impl LightDriver {
    pub fn new(pin: AnyOutputPin) -> anyhow::Result<Self> {
        let mut pin = PinDriver::output(pin)?;
        pin.set_low()?;
        Ok(Self { is_on: false, pin })
    }
}

#[cfg(not(feature = "espidf"))]
impl Default for LightDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(feature = "espidf"))]
impl LightDriver {
    pub fn new() -> Self {
        Self {
            is_on: false,
            assertions: 0,
        }
    }

    /// Number of pin-level assertions so far (sim only).
    pub fn sim_assertions(&self) -> u32 {
        self.assertions
    }
}

impl LightDriver {
    /// Current logical output state.
    pub fn is_on(&self) -> bool {
        self.is_on
    }
}

#[cfg(feature = "espidf")]
impl ActuatorPort for LightDriver {
    fn set(&mut self, on: bool) {
        let r = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if r.is_ok() {
            self.is_on = on;
            info!("light: {}", if on { "ON" } else { "OFF" });
        }
    }
}

#[cfg(not(feature = "espidf"))]
impl ActuatorPort for LightDriver {
    fn set(&mut self, on: bool) {
        self.assertions += 1;
        self.is_on = on;
        info!("light(sim): {}", if on { "ON" } else { "OFF" });
    }
}
