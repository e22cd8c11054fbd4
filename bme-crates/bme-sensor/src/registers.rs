//! BME280 register map (datasheet table 18, "Memory map").

/// Chip identifier register.
pub(crate) const ID: u8 = 0xD0;
/// Soft reset register.
pub(crate) const RESET: u8 = 0xE0;
/// Humidity oversampling control.
pub(crate) const CTRL_HUM: u8 = 0xF2;
/// Device status.
pub(crate) const STATUS: u8 = 0xF3;
/// Temperature / pressure oversampling and mode control.
pub(crate) const CTRL_MEAS: u8 = 0xF4;
/// IIR filter and standby period control.
pub(crate) const CONFIG: u8 = 0xF5;
/// First byte of the raw measurement block (pressure MSB).
pub(crate) const PRESS_MSB: u8 = 0xF7;
/// Start of the temperature / pressure calibration block.
pub(crate) const CALIB_TP: u8 = 0x88;
/// Humidity calibration H1.
pub(crate) const CALIB_H1: u8 = 0xA1;
/// Start of the bit-packed humidity calibration block (H2..H6).
pub(crate) const CALIB_H: u8 = 0xE1;

/// Value written to [`RESET`] to trigger a power-on-reset.
pub(crate) const RESET_CMD: u8 = 0xB6;

/// Size of the temperature / pressure calibration block, 0x88..=0x9F.
pub(crate) const CALIB_TP_LEN: usize = 24;
/// Size of the humidity calibration block, 0xE1..=0xE7.
pub(crate) const CALIB_H_LEN: usize = 7;
/// Size of the raw measurement block, 0xF7..=0xFE.
pub(crate) const MEAS_LEN: usize = 8;

/// Status bit: a conversion is running.
pub(crate) const STATUS_MEASURING: u8 = 0b0000_1000;
/// Status bit: NVM data is being copied to the image registers.
pub(crate) const STATUS_IM_UPDATE: u8 = 0b0000_0001;
