//! # Introduction
//!
//! This is a platform agnostic Rust driver for the Bosch BME280 temperature /
//! pressure / humidity sensor, based on the
//! [`embedded-hal`](https://github.com/rust-embedded/embedded-hal) traits.
//!
//! All conversions use the integer compensation formulas of the datasheet, so
//! no FPU is needed and results are bit-identical to the vendor reference.
//!
//! ## Usage
//!
//! ### Setup
//!
//! Instantiate a new driver instance using a blocking I²C HAL implementation,
//! check that the sensor answers, and load its factory calibration. For
//! example, using `linux-embedded-hal`:
//!
//! ```no_run
//! use linux_embedded_hal::I2cdev;
//! use bme_sensor::Bme280;
//!
//! let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! let mut bme = Bme280::new(dev);
//!
//! assert!(bme.probe());
//! bme.load_calibration().unwrap();
//! println!("Sensor identity: {:#010x}", bme.identity().unwrap());
//! ```
//!
//! The identity is a hash of the calibration data, which is trimmed
//! individually for every chip. It tells sensors apart, and changes if the
//! calibration read back is corrupted.
//!
//! ### Measurements (Blocking)
//!
//! ```no_run
//! use linux_embedded_hal::{Delay, I2cdev};
//! use bme_sensor::{Bme280, Filter, Oversampling, Standby};
//!
//! let mut bme = Bme280::new(I2cdev::new("/dev/i2c-1").unwrap());
//! let mut delay = Delay;
//!
//! bme.load_calibration().unwrap();
//! bme.configure(Standby::Millis1000, Filter::Off).unwrap();
//!
//! let m = bme
//!     .measure_forced(Oversampling::X1, Oversampling::X1, Oversampling::X1, &mut delay)
//!     .unwrap();
//!
//! println!("Temperature: {} °C", m.temperature.as_degrees_celsius());
//! println!("Pressure: {} hPa", m.pressure.as_hectopascal());
//! println!("Humidity: {} %RH", m.humidity.as_percent());
//! ```
//!
//! ### Measurements (Non-Blocking)
//!
//! The driver never waits on its own outside of the blocking helpers. Start a
//! measurement, then poll [`is_busy`](crate::Bme280::is_busy()) until it
//! returns `false` before reading the result. Bounding that loop is up to the
//! caller.
//!
//! ```no_run
//! use linux_embedded_hal::I2cdev;
//! use bme_sensor::{Bme280, Filter, Mode, Oversampling, Standby};
//!
//! let mut bme = Bme280::new(I2cdev::new("/dev/i2c-1").unwrap());
//! bme.load_calibration().unwrap();
//! bme.configure(Standby::Millis125, Filter::X4).unwrap();
//! bme.start(Mode::Normal, Oversampling::X2, Oversampling::X16, Oversampling::X1)
//!     .unwrap();
//!
//! while bme.is_busy().unwrap() {}
//! let measurement = bme.read_measurement().unwrap();
//! ```
//!
//! The raw ADC counts are available through
//! [`read_sample`](crate::Bme280::read_sample()), and can be converted later
//! with the functions of the [`compensation`] module.
//!
//! ### Soft Reset
//!
//! A soft reset puts every register back to its power-on value. The loaded
//! calibration stays valid, but the sensor has to be configured again.
//!
//! ```no_run
//! use linux_embedded_hal::{Delay, I2cdev};
//! use bme_sensor::Bme280;
//! let mut bme = Bme280::new(I2cdev::new("/dev/i2c-1").unwrap());
//! let mut delay = Delay;
//! bme.reset(&mut delay).unwrap();
//! ```
#![deny(unsafe_code, missing_docs)]
#![no_std]

mod calibration;
pub mod compensation;
mod fnv;
mod registers;
mod settings;
mod types;

use bme_fmt::{debug, trace, warn};
use embedded_hal::{
    delay::DelayNs,
    i2c::{self, I2c, SevenBitAddress},
};

pub use calibration::{Calibration, HumCalibration, TpCalibration};
pub use settings::*;
pub use types::*;

use registers::*;

/// Expected content of the chip identifier register.
pub const CHIP_ID: u8 = 0x60;

/// Extra status polls done by [`Bme280::measure_forced`] once the maximum
/// measurement duration has elapsed.
const MAX_BUSY_POLLS: u8 = 10;
/// Delay between two of those polls, in microseconds.
const BUSY_POLL_INTERVAL_US: u32 = 500;

/// All possible errors in this crate
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E: i2c::Error> {
    /// I²C bus error
    I2c(E),
    /// The calibration has not been loaded yet.
    NotCalibrated,
    /// The sensor has not been configured yet.
    NotConfigured,
    /// The humidity oversampling was written, but writing the measurement
    /// control register failed. The sensor holds the new humidity setting
    /// with its previous mode; issue `start` again.
    StartIncomplete(E),
    /// The sensor was still busy after the maximum measurement duration.
    Timeout,
}

impl<E> From<E> for Error<E>
where
    E: i2c::Error,
{
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}

/// Measurement sequencer state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not configured since construction or the last reset.
    Uninitialized,
    /// Filter and standby period are set, no measurement was started yet.
    Configured,
    /// No measurement is running, results of the last one can be read.
    Idle,
    /// A measurement was started and has not been seen finished yet.
    Measuring,
}

/// Driver for the BME280 sensor.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bme280<I2C> {
    /// The concrete I²C device implementation.
    i2c: I2C,
    /// The I²C device address.
    address: u8,
    /// Factory calibration, once loaded.
    calibration: Option<Calibration>,
    /// Measurement sequencer state.
    state: State,
}

/// General functions.
impl<I2C> Bme280<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    /// Create a new instance of the driver at the default address, `0x76`.
    #[inline]
    pub const fn new(i2c: I2C) -> Self {
        Self::new_with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a new instance of the driver at the given 7-bit address.
    #[inline]
    pub const fn new_with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            calibration: None,
            state: State::Uninitialized,
        }
    }

    /// Destroy driver instance, return I²C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Return the I²C address of the sensor.
    #[inline(always)]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Return the current state of the measurement sequencer.
    #[inline(always)]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Returns the start-up duration after a reset, in microseconds.
    #[inline(always)]
    pub const fn reset_duration(&self) -> u32 {
        2000
    }

    /// Read a single register.
    fn read_register(&mut self, reg: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    /// Read consecutive registers into the provided buffer, starting at `reg`.
    ///
    /// On error the buffer content is unspecified.
    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.address, &[reg], buf)
    }

    /// Write a single register.
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[reg, value])
    }

    /// Return the chip identifier register.
    ///
    /// Should be [`CHIP_ID`] for the BME280.
    pub fn chip_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(self.read_register(ID)?)
    }

    /// Check whether a BME280 answers at the configured address.
    ///
    /// Returns `false` on a bus error as well as on an unexpected chip
    /// identifier. Does not change any state.
    pub fn probe(&mut self) -> bool {
        match self.chip_id() {
            Ok(CHIP_ID) => true,
            Ok(_id) => {
                debug!("unexpected chip id: {=u8:#x}", _id);
                false
            }
            Err(_) => false,
        }
    }

    /// Trigger a soft reset. (blocking)
    ///
    /// All registers go back to their power-on values, which puts the
    /// sequencer back to [`State::Uninitialized`]. The loaded calibration is
    /// kept, as the reset does not touch the sensor's NVM.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<I2C::Error>> {
        self.start_reset()?;
        delay.delay_us(self.reset_duration());
        Ok(())
    }

    /// Trigger a soft reset.
    ///
    /// Wait for [`reset_duration`](Self::reset_duration) before talking to
    /// the sensor again.
    pub fn start_reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_register(RESET, RESET_CMD)?;
        self.state = State::Uninitialized;
        debug!("soft reset");
        Ok(())
    }
}

/// Calibration functions.
impl<I2C> Bme280<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    /// Read and store the factory calibration of the sensor.
    ///
    /// Reads the temperature / pressure block, then `H1` and the humidity
    /// block. If any read fails, the previously stored calibration (if any)
    /// is left untouched.
    pub fn load_calibration(&mut self) -> Result<(), Error<I2C::Error>> {
        let calibration = self.read_calibration().inspect_err(|_| {
            warn!("failed to read calibration");
        })?;

        debug!(
            "calibration loaded, identity {=u32:#x}",
            calibration.identity()
        );
        self.calibration = Some(calibration);

        Ok(())
    }

    fn read_calibration(&mut self) -> Result<Calibration, I2C::Error> {
        let mut tp = [0; CALIB_TP_LEN];
        self.read_registers(CALIB_TP, &mut tp)?;

        let h1 = self.read_register(CALIB_H1)?;
        let mut hum = [0; CALIB_H_LEN];
        self.read_registers(CALIB_H, &mut hum)?;

        Ok(Calibration::new(
            TpCalibration::from_bytes(&tp),
            HumCalibration::from_registers(h1, &hum),
        ))
    }

    /// Return the loaded calibration.
    #[inline]
    pub const fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Return the sensor identity derived from the loaded calibration.
    #[inline]
    pub fn identity(&self) -> Option<u32> {
        self.calibration.as_ref().map(Calibration::identity)
    }

    fn require_calibration(&self) -> Result<&Calibration, Error<I2C::Error>> {
        self.calibration.as_ref().ok_or(Error::NotCalibrated)
    }
}

/// Non-blocking functions for configuring, starting and reading measurements.
impl<I2C> Bme280<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    /// Set the standby period of [`Mode::Normal`] and the IIR filter.
    ///
    /// Requires a loaded calibration.
    pub fn configure(
        &mut self,
        standby: Standby,
        filter: Filter,
    ) -> Result<(), Error<I2C::Error>> {
        self.require_calibration()?;

        let config = (u8::from(standby) << 5) | (u8::from(filter) << 2);
        trace!("config: {=u8:#b}", config);
        self.write_register(CONFIG, config)?;

        self.state = State::Configured;
        Ok(())
    }

    /// Start measuring in the given mode, with the given oversampling for
    /// temperature, pressure and humidity.
    ///
    /// The humidity oversampling only takes effect after a write to the
    /// measurement control register, so it is written first. If that second
    /// write fails, [`Error::StartIncomplete`] is returned and the call should
    /// be repeated.
    ///
    /// [`Mode::Forced`] runs a single measurement and has to be started again
    /// for the next one.
    pub fn start(
        &mut self,
        mode: Mode,
        temperature: Oversampling,
        pressure: Oversampling,
        humidity: Oversampling,
    ) -> Result<(), Error<I2C::Error>> {
        self.require_calibration()?;
        if self.state == State::Uninitialized {
            return Err(Error::NotConfigured);
        }

        self.write_register(CTRL_HUM, humidity.into())?;

        let ctrl_meas = (u8::from(temperature) << 5) | (u8::from(pressure) << 2) | u8::from(mode);
        trace!("ctrl_meas: {=u8:#b}", ctrl_meas);
        self.write_register(CTRL_MEAS, ctrl_meas).map_err(|e| {
            warn!("humidity oversampling set, but mode was not");
            Error::StartIncomplete(e)
        })?;

        self.state = match mode {
            Mode::Sleep => State::Idle,
            Mode::Forced | Mode::Normal => State::Measuring,
        };
        Ok(())
    }

    /// Check whether a conversion is running or the NVM is being copied.
    ///
    /// Results must not be read while this returns `true`.
    pub fn is_busy(&mut self) -> Result<bool, Error<I2C::Error>> {
        let status = self.read_register(STATUS)?;
        let busy = status & (STATUS_MEASURING | STATUS_IM_UPDATE) != 0;

        if !busy && self.state == State::Measuring {
            self.state = State::Idle;
        }

        Ok(busy)
    }

    /// Read the raw ADC counts of the last measurement.
    ///
    /// All three values are read in one burst, so they belong to the same
    /// acquisition cycle.
    pub fn read_sample(&mut self) -> Result<RawSample, Error<I2C::Error>> {
        let mut buf = [0; MEAS_LEN];
        self.read_registers(PRESS_MSB, &mut buf)?;
        Ok(RawSample::from_registers(&buf))
    }

    /// Read the last measurement and compensate it with the loaded calibration.
    pub fn read_measurement(&mut self) -> Result<Measurement, Error<I2C::Error>> {
        let calibration = *self.require_calibration()?;
        let raw = self.read_sample()?;

        Ok(compensation::compensate(&raw, &calibration))
    }
}

/// Blocking functions for doing measurements.
impl<I2C> Bme280<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    /// Return the maximum measurement duration for the given oversampling, in
    /// microseconds.
    ///
    /// From the BME280 datasheet, appendix B: 1.25 ms, plus 2.3 ms per
    /// temperature sample, plus 2.3 ms per pressure and humidity sample with
    /// 0.575 ms of overhead for each of those two that is enabled.
    pub const fn max_measurement_duration(
        temperature: Oversampling,
        pressure: Oversampling,
        humidity: Oversampling,
    ) -> u32 {
        const fn with_overhead(os: Oversampling) -> u32 {
            match os {
                Oversampling::Skip => 0,
                os => 2300 * os.samples() + 575,
            }
        }

        1250 + 2300 * temperature.samples() + with_overhead(pressure) + with_overhead(humidity)
    }

    /// Run a single [`Mode::Forced`] measurement and return the compensated
    /// result.
    ///
    /// This is a blocking function call. Waits for the maximum measurement
    /// duration, then polls the status a bounded number of times before
    /// giving up with [`Error::Timeout`].
    pub fn measure_forced(
        &mut self,
        temperature: Oversampling,
        pressure: Oversampling,
        humidity: Oversampling,
        delay: &mut impl DelayNs,
    ) -> Result<Measurement, Error<I2C::Error>> {
        self.start(Mode::Forced, temperature, pressure, humidity)?;
        delay.delay_us(Self::max_measurement_duration(
            temperature,
            pressure,
            humidity,
        ));

        let mut polls = 0;
        while self.is_busy()? {
            if polls == MAX_BUSY_POLLS {
                return Err(Error::Timeout);
            }
            polls += 1;
            delay.delay_us(BUSY_POLL_INTERVAL_US);
        }

        self.read_measurement()
    }
}
