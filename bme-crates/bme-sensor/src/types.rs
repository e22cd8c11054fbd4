use crate::registers::MEAS_LEN;

/// A temperature measurement, in hundredths of a degree Celsius.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Temperature(pub(crate) i32);

/// A pressure measurement, in Pascal as Q24.8 fixed point.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pressure(pub(crate) u32);

/// A relative humidity measurement, in %RH as Q22.10 fixed point.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Humidity(pub(crate) u32);

/// A combined temperature / pressure / humidity measurement.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// The measured temperature.
    pub temperature: Temperature,
    /// The measured pressure.
    pub pressure: Pressure,
    /// The measured humidity.
    pub humidity: Humidity,
}

/// The raw ADC counts of one acquisition cycle.
///
/// They require the compensation formulas (see [`compensation`](crate::compensation))
/// and the sensor's calibration for conversion to physical units.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// The measured temperature (20-bit raw value).
    pub temperature: u32,
    /// The measured pressure (20-bit raw value).
    pub pressure: u32,
    /// The measured humidity (16-bit raw value).
    pub humidity: u16,
}

/// The temperature intermediate shared by the pressure and humidity formulas
/// (`t_fine` in the datasheet).
///
/// Only valid together with the other raw values of the acquisition cycle it
/// was computed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FineTemperature(i32);

impl Temperature {
    /// Return temperature in hundredths of a degree celsius.
    pub const fn as_centidegrees_celsius(&self) -> i32 {
        self.0
    }

    /// Return temperature in degrees celsius.
    pub const fn as_degrees_celsius(&self) -> f32 {
        self.0 as f32 / 100.0
    }
}

impl Pressure {
    /// Return pressure as the raw Q24.8 fixed point value.
    pub const fn as_q24_8(&self) -> u32 {
        self.0
    }

    /// Return pressure in Pascal.
    pub const fn as_pascal(&self) -> f32 {
        self.0 as f32 / 256.0
    }

    /// Return pressure in hectopascal.
    pub const fn as_hectopascal(&self) -> f32 {
        self.0 as f32 / 25600.0
    }
}

impl Humidity {
    /// Return relative humidity as the raw Q22.10 fixed point value.
    pub const fn as_q22_10(&self) -> u32 {
        self.0
    }

    /// Return relative humidity in 1/1000 %RH.
    pub const fn as_millipercent(&self) -> u32 {
        ((self.0 as u64 * 1000) >> 10) as u32
    }

    /// Return relative humidity in %RH.
    pub const fn as_percent(&self) -> f32 {
        self.0 as f32 / 1024.0
    }
}

impl FineTemperature {
    /// Wrap a `t_fine` value computed elsewhere.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Return the raw `t_fine` value.
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl RawSample {
    /// Unpack the burst read of the measurement registers, 0xF7..=0xFE.
    pub(crate) const fn from_registers(buf: &[u8; MEAS_LEN]) -> Self {
        Self {
            pressure: convert_20bit(buf[0], buf[1], buf[2]),
            temperature: convert_20bit(buf[3], buf[4], buf[5]),
            humidity: u16::from_be_bytes([buf[6], buf[7]]),
        }
    }
}

/// Assemble a 20-bit ADC value from its `msb`, `lsb` and `xlsb` registers.
///
/// `xlsb` only carries data in its upper nibble.
#[inline]
const fn convert_20bit(msb: u8, lsb: u8, xlsb: u8) -> u32 {
    ((msb as u32) << 12) | ((lsb as u32) << 4) | ((xlsb as u32) >> 4)
}
