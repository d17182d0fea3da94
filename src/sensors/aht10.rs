//! AHT10 temperature/humidity sensor driver.
//!
//! Generic over `embedded_hal::i2c::I2c`, so the same code runs against
//! the `esp-idf-hal` I2C driver on device and a mock bus in tests.
//!
//! Protocol (datasheet §5.4):
//! - init: `0xE1 0x08 0x00`, then check the calibration bit in the status
//!   byte. At cold boot the part can take a while to load its calibration
//!   coefficients; until the bit reads set, the sensor is NotReady.
//! - measure: `0xAC 0x33 0x00`, wait ~75 ms, read a 6-byte frame
//!   `[status, h1, h2, h1|t1, t2, t3]` carrying two 20-bit raw values.
//! - conversion: humidity = raw·100/2²⁰ %, temperature = raw·200/2²⁰ − 50 °C.

use embedded_hal::i2c::I2c;
use log::debug;

use crate::app::ports::{DelayPort, SensorPort};
use crate::error::SensorError;

const CMD_INIT: [u8; 3] = [0xE1, 0x08, 0x00];
const CMD_TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];

const STATUS_BUSY: u8 = 0x80;
const STATUS_CALIBRATED: u8 = 0x08;

/// Nominal measurement duration per the datasheet.
const MEASUREMENT_DELAY_MS: u32 = 80;
/// Grace wait if the busy flag is still set after the nominal delay.
const BUSY_RETRY_DELAY_MS: u32 = 20;

const RAW_FULL_SCALE: f32 = 1_048_576.0; // 2^20

/// AHT10 driver over any `embedded-hal` I2C bus.
pub struct Aht10<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
    initialized: bool,
}

impl<I2C: I2c, D: DelayPort> Aht10<I2C, D> {
    pub fn new(i2c: I2C, addr: u8, delay: D) -> Self {
        Self {
            i2c,
            delay,
            addr,
            initialized: false,
        }
    }

    fn read_status(&mut self) -> Result<u8, SensorError> {
        let mut status = [0u8; 1];
        self.i2c
            .read(self.addr, &mut status)
            .map_err(|_| SensorError::BusFault)?;
        Ok(status[0])
    }

    /// Trigger one measurement and return the raw 6-byte frame.
    fn measure(&mut self) -> Result<[u8; 6], SensorError> {
        if !self.initialized {
            return Err(SensorError::NotReady);
        }
        self.i2c
            .write(self.addr, &CMD_TRIGGER)
            .map_err(|_| SensorError::BusFault)?;
        self.delay.delay_ms(MEASUREMENT_DELAY_MS);

        let mut frame = [0u8; 6];
        self.i2c
            .read(self.addr, &mut frame)
            .map_err(|_| SensorError::BusFault)?;

        if frame[0] & STATUS_BUSY != 0 {
            // One grace round; a persistently busy part is a fault.
            self.delay.delay_ms(BUSY_RETRY_DELAY_MS);
            self.i2c
                .read(self.addr, &mut frame)
                .map_err(|_| SensorError::BusFault)?;
            if frame[0] & STATUS_BUSY != 0 {
                return Err(SensorError::InvalidData);
            }
        }
        Ok(frame)
    }

    fn raw_humidity(frame: &[u8; 6]) -> u32 {
        (u32::from(frame[1]) << 12) | (u32::from(frame[2]) << 4) | (u32::from(frame[3]) >> 4)
    }

    fn raw_temperature(frame: &[u8; 6]) -> u32 {
        (u32::from(frame[3] & 0x0F) << 16) | (u32::from(frame[4]) << 8) | u32::from(frame[5])
    }

    fn humidity_pct(frame: &[u8; 6]) -> f32 {
        Self::raw_humidity(frame) as f32 * 100.0 / RAW_FULL_SCALE
    }

    fn temperature_c(frame: &[u8; 6]) -> f32 {
        Self::raw_temperature(frame) as f32 * 200.0 / RAW_FULL_SCALE - 50.0
    }
}

impl<I2C: I2c, D: DelayPort> SensorPort for Aht10<I2C, D> {
    /// One cold-start attempt: send the init command and check the
    /// calibration bit. The unbounded retry loop (5 s cadence) lives in
    /// the caller, same contract as network association.
    fn try_init(&mut self) -> Result<(), SensorError> {
        self.i2c
            .write(self.addr, &CMD_INIT)
            .map_err(|_| SensorError::BusFault)?;
        let status = self.read_status()?;
        if status & STATUS_CALIBRATED == 0 {
            return Err(SensorError::NotReady);
        }
        self.initialized = true;
        debug!("aht10: calibrated (status=0x{:02x})", status);
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let frame = self.measure()?;
        Ok(Self::temperature_c(&frame))
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        let frame = self.measure()?;
        Ok(Self::humidity_pct(&frame))
    }
}
