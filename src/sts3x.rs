//! Driver for the Sensirion STS3x family (STS30, STS31, STS35) of I2C temperature sensors.

use log::{debug, info};
use std::time::{Duration, Instant};

use crate::{words, Delay, Error, Result, Transport};

/// Bus address of the sensor. The ADDR pin selects between 0x4A (low, the default) and 0x4B.
#[cfg(not(feature = "addr-pin-high"))]
pub const ADDRESS: u8 = 0x4A;
#[cfg(feature = "addr-pin-high")]
pub const ADDRESS: u8 = 0x4B;

/// Time a single-shot measurement takes at any repeatability. With clock stretching the sensor
/// holds SCL until the result is ready, so no extra wait is needed.
#[cfg(not(feature = "clock-stretching"))]
pub const MEASUREMENT_DURATION_USEC: u32 = 15_500;
#[cfg(feature = "clock-stretching")]
pub const MEASUREMENT_DURATION_USEC: u32 = 0;

pub const SERIAL_DURATION_USEC: u32 = 1_000;
pub const SOFT_RESET_DURATION_USEC: u32 = 1_500;

mod commands {
    #[cfg(not(feature = "clock-stretching"))]
    mod measure {
        pub const HIGH: u16 = 0x2400;
        pub const MEDIUM: u16 = 0x240B;
        pub const LOW: u16 = 0x2416;
    }
    #[cfg(feature = "clock-stretching")]
    mod measure {
        pub const HIGH: u16 = 0x2C06;
        pub const MEDIUM: u16 = 0x2C0D;
        pub const LOW: u16 = 0x2C10;
    }

    pub const MEASURE_HIGH: u16 = measure::HIGH;
    pub const MEASURE_MEDIUM: u16 = measure::MEDIUM;
    pub const MEASURE_LOW: u16 = measure::LOW;

    pub const READ_STATUS: u16 = 0xF32D;
    pub const CLEAR_STATUS: u16 = 0x3041;
    pub const HEATER_ON: u16 = 0x306D;
    pub const HEATER_OFF: u16 = 0x3066;
    pub const READ_SERIAL: u16 = 0x3780;
    pub const SOFT_RESET: u16 = 0x30A2;
}
use commands::*;

/// Measurement repeatability. Higher repeatability means less noise but more power per
/// measurement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Repeatability {
    #[default]
    High,
    Medium,
    Low,
}

impl Repeatability {
    pub fn command(self) -> u16 {
        match self {
            Repeatability::High => MEASURE_HIGH,
            Repeatability::Medium => MEASURE_MEDIUM,
            Repeatability::Low => MEASURE_LOW,
        }
    }
}

/// `0` = high, `1` = medium, `2` = low. Anything else selects high.
impl From<u8> for Repeatability {
    fn from(value: u8) -> Self {
        match value {
            2 => Repeatability::Low,
            1 => Repeatability::Medium,
            _ => Repeatability::High,
        }
    }
}

/// Temperature in millidegrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Temperature(i32);

impl Temperature {
    /// Converts raw sensor ticks, `T = 175 * ticks / 2^16 - 45` scaled by 1000 and evaluated in
    /// fixed point.
    pub const fn from_ticks(ticks: u16) -> Self {
        Self(((21875 * ticks as i32) >> 13) - 45000)
    }

    pub const fn milli_celsius(self) -> i32 {
        self.0
    }

    pub fn celsius(self) -> f32 {
        self.0 as f32 / 1000.0
    }
}

/// Contents of the sensor's status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister(pub u16);

impl StatusRegister {
    const ALERT_PENDING: u16 = 1 << 15;
    const HEATER_ON: u16 = 1 << 13;
    const TEMPERATURE_ALERT: u16 = 1 << 10;
    const RESET_DETECTED: u16 = 1 << 4;
    const COMMAND_FAILED: u16 = 1 << 1;
    const WRITE_CHECKSUM_FAILED: u16 = 1 << 0;

    pub fn alert_pending(self) -> bool {
        self.0 & Self::ALERT_PENDING != 0
    }

    pub fn heater_on(self) -> bool {
        self.0 & Self::HEATER_ON != 0
    }

    pub fn temperature_alert(self) -> bool {
        self.0 & Self::TEMPERATURE_ALERT != 0
    }

    /// Set after power-up, a soft reset or a brown-out until cleared with
    /// [`Sts3x::clear_status`].
    pub fn reset_detected(self) -> bool {
        self.0 & Self::RESET_DETECTED != 0
    }

    pub fn command_failed(self) -> bool {
        self.0 & Self::COMMAND_FAILED != 0
    }

    pub fn write_checksum_failed(self) -> bool {
        self.0 & Self::WRITE_CHECKSUM_FAILED != 0
    }
}

/// A single STS3x sensor on a bus. Every operation is a blocking request/response exchange;
/// the driver performs no retries.
pub struct Sts3x<T, D> {
    bus: T,
    delay: D,
    address: u8,
    repeatability: Repeatability,
    strict_timing: bool,
    ready_at: Option<Instant>,
}

impl<T: Transport, D: Delay> Sts3x<T, D> {
    pub fn new(bus: T, delay: D) -> Self {
        Self::with_address(bus, delay, ADDRESS)
    }

    pub fn with_address(bus: T, delay: D, address: u8) -> Self {
        Self {
            bus,
            delay,
            address,
            repeatability: Repeatability::default(),
            strict_timing: false,
            ready_at: None,
        }
    }

    /// When enabled, the driver remembers when a measurement started with
    /// [`start_measurement`](Self::start_measurement) will be done, and reading the result any
    /// earlier (or without a measurement in flight) fails with [`Error::NotReady`] instead of
    /// going to the bus.
    pub fn strict_timing(mut self, enabled: bool) -> Self {
        self.strict_timing = enabled;
        self
    }

    /// Gives back the bus and the delay.
    pub fn release(self) -> (T, D) {
        (self.bus, self.delay)
    }

    pub fn configured_address(&self) -> u8 {
        self.address
    }

    pub fn driver_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn repeatability(&self) -> Repeatability {
        self.repeatability
    }

    /// Selects the measurement command used from now on. Raw values outside `0..=2` fall back to
    /// [`Repeatability::High`].
    pub fn set_repeatability(&mut self, repeatability: impl Into<Repeatability>) {
        self.repeatability = repeatability.into();
    }

    /// Checks that a sensor answers at the configured address by reading its status register.
    pub fn probe(&mut self) -> Result<(), T::Error> {
        self.read_status()?;
        info!("sts3x found at {:#04x}", self.address);
        Ok(())
    }

    pub fn read_status(&mut self) -> Result<StatusRegister, T::Error> {
        let mut status = [0u16; 1];
        words::delayed_read_command(
            &mut self.bus,
            &mut self.delay,
            self.address,
            READ_STATUS,
            0,
            &mut status,
        )?;
        Ok(StatusRegister(status[0]))
    }

    pub fn clear_status(&mut self) -> Result<(), T::Error> {
        words::write_command(&mut self.bus, self.address, CLEAR_STATUS)
    }

    /// Triggers a single-shot measurement with the selected repeatability. The result is
    /// available [`MEASUREMENT_DURATION_USEC`] later through
    /// [`read_measurement`](Self::read_measurement).
    pub fn start_measurement(&mut self) -> Result<(), T::Error> {
        words::write_command(&mut self.bus, self.address, self.repeatability.command())?;
        self.ready_at =
            Some(Instant::now() + Duration::from_micros(MEASUREMENT_DURATION_USEC.into()));
        Ok(())
    }

    /// Fetches the result of a measurement started by
    /// [`start_measurement`](Self::start_measurement). Unless strict timing is enabled it is up
    /// to the caller to wait long enough; a sensor that is still busy NACKs the read.
    pub fn read_measurement(&mut self) -> Result<Temperature, T::Error> {
        self.read_ticks().map(Temperature::from_ticks)
    }

    /// Same as [`read_measurement`](Self::read_measurement) without the unit conversion.
    pub fn read_ticks(&mut self) -> Result<u16, T::Error> {
        if self.strict_timing {
            match self.ready_at {
                Some(deadline) if Instant::now() >= deadline => {}
                _ => return Err(Error::NotReady),
            }
        }
        self.fetch_ticks()
    }

    /// Starts a measurement, waits for it to complete and reads it out.
    pub fn measure_blocking_read(&mut self) -> Result<Temperature, T::Error> {
        self.start_measurement()?;
        if MEASUREMENT_DURATION_USEC > 0 {
            self.delay.delay_us(MEASUREMENT_DURATION_USEC);
        }
        self.fetch_ticks().map(Temperature::from_ticks)
    }

    /// The heater is meant for plausibility checks only: with it on, readings should rise by a
    /// few degrees.
    pub fn heater_on(&mut self) -> Result<(), T::Error> {
        words::write_command(&mut self.bus, self.address, HEATER_ON)
    }

    pub fn heater_off(&mut self) -> Result<(), T::Error> {
        words::write_command(&mut self.bus, self.address, HEATER_OFF)
    }

    pub fn read_serial(&mut self) -> Result<u32, T::Error> {
        words::write_command(&mut self.bus, self.address, READ_SERIAL)?;
        self.delay.delay_us(SERIAL_DURATION_USEC);
        let mut serial = [0u8; 4];
        words::read_bytes(&mut self.bus, self.address, &mut serial)?;
        Ok(u32::from_be_bytes(serial))
    }

    /// Resets the sensor's state machine and reloads calibration data. Repeatability is kept
    /// since it lives in the driver.
    pub fn soft_reset(&mut self) -> Result<(), T::Error> {
        words::write_command(&mut self.bus, self.address, SOFT_RESET)?;
        self.ready_at = None;
        self.delay.delay_us(SOFT_RESET_DURATION_USEC);
        Ok(())
    }

    fn fetch_ticks(&mut self) -> Result<u16, T::Error> {
        let mut ticks = [0u16; 1];
        words::read_words(&mut self.bus, self.address, &mut ticks)?;
        self.ready_at = None;
        debug!("ticks {}", ticks[0]);
        Ok(ticks[0])
    }
}
