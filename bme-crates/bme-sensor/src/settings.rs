/// Default I²C address of the sensor.
pub const DEFAULT_ADDRESS: u8 = Address::Primary as u8;

/// I²C device address, selected by the level of the SDO pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Address {
    /// SDO connected to GND.
    Primary = 0x76,
    /// SDO connected to V<sub>DDIO</sub>.
    Secondary = 0x77,
}

/// Sensor operating mode, `mode[1:0]` of `ctrl_meas`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// No measurements are performed.
    Sleep = 0b00,
    /// A single measurement is performed, then the sensor returns to sleep.
    Forced = 0b01,
    /// Measurements are performed continuously, separated by the
    /// [`Standby`] period.
    Normal = 0b11,
}

/// Inactive duration between measurements in [`Mode::Normal`], `t_sb[2:0]` of `config`.
///
/// The register encoding does not follow the duration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Standby {
    Micros500 = 0b000,
    Micros62500 = 0b001,
    Millis125 = 0b010,
    Millis250 = 0b011,
    Millis500 = 0b100,
    Millis1000 = 0b101,
    Millis10 = 0b110,
    Millis20 = 0b111,
}

impl Standby {
    /// Return the standby period in microseconds.
    pub const fn duration_us(&self) -> u32 {
        match self {
            Standby::Micros500 => 500,
            Standby::Micros62500 => 62_500,
            Standby::Millis125 => 125_000,
            Standby::Millis250 => 250_000,
            Standby::Millis500 => 500_000,
            Standby::Millis1000 => 1_000_000,
            Standby::Millis10 => 10_000,
            Standby::Millis20 => 20_000,
        }
    }
}

/// IIR filter coefficient, `filter[2:0]` of `config`.
///
/// The filter smooths temperature and pressure over the given number of
/// samples. Humidity is not filtered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Filter {
    Off = 0b000,
    X2 = 0b001,
    X4 = 0b010,
    X8 = 0b011,
    X16 = 0b100,
}

/// Oversampling of a single measurand.
///
/// Higher oversampling reduces noise at the cost of longer measurements.
/// [`Oversampling::Skip`] disables the measurand; skipping temperature
/// disables the whole measurement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Oversampling {
    Skip = 0b000,
    X1 = 0b001,
    X2 = 0b010,
    X4 = 0b011,
    X8 = 0b100,
    X16 = 0b101,
}

impl Oversampling {
    /// Return the number of conversions averaged into one sample.
    pub const fn samples(&self) -> u32 {
        match self {
            Oversampling::Skip => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

impl From<Address> for u8 {
    fn from(x: Address) -> Self {
        x as u8
    }
}

impl From<Mode> for u8 {
    fn from(x: Mode) -> Self {
        x as u8
    }
}

impl From<Standby> for u8 {
    fn from(x: Standby) -> Self {
        x as u8
    }
}

impl From<Filter> for u8 {
    fn from(x: Filter) -> Self {
        x as u8
    }
}

impl From<Oversampling> for u8 {
    fn from(x: Oversampling) -> Self {
        x as u8
    }
}
