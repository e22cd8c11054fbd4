//! Conversion of raw ADC counts into physical units.
//!
//! These are the 32-bit (temperature, humidity) and 64-bit (pressure) integer
//! formulas from the BME280 datasheet, section 4.2.3. The shift amounts, the
//! operation order and the intermediate widths are part of the output: keep
//! them as they are, even where an expression looks simplifiable.
//!
//! All intermediates use two's complement wrapping, so out of range inputs
//! give the same result a 32/64-bit C implementation of the formulas gives,
//! instead of a panic.
//!
//! The temperature step produces a [`FineTemperature`] that the pressure and
//! humidity steps consume. It must come from the same [`RawSample`] as the
//! values it is used with.

use core::num::Wrapping;

use bme_fmt::trace;

use crate::calibration::{Calibration, HumCalibration, TpCalibration};
use crate::types::{FineTemperature, Humidity, Measurement, Pressure, RawSample, Temperature};

/// Upper saturation bound of the humidity formula before its final `>> 12`,
/// i.e. 100 %RH in Q22.22.
pub const HUMIDITY_LIMIT: i32 = 419_430_400;

/// Compensate a raw temperature reading.
///
/// Returns the temperature in hundredths of a degree and the `t_fine`
/// intermediate needed by [`compensate_pressure`] and [`compensate_humidity`].
pub fn compensate_temperature(raw: u32, cal: &TpCalibration) -> (Temperature, FineTemperature) {
    let adc = Wrapping(raw as i32);
    let t1 = Wrapping(cal.t1 as i32);
    let t2 = Wrapping(cal.t2 as i32);
    let t3 = Wrapping(cal.t3 as i32);

    let var1 = (((adc >> 3) - (t1 << 1)) * t2) >> 11;
    let var2 = (((((adc >> 4) - t1) * ((adc >> 4) - t1)) >> 12) * t3) >> 14;

    let t_fine = var1 + var2;
    let temperature = (t_fine * Wrapping(5) + Wrapping(128)) >> 8;

    (Temperature(temperature.0), FineTemperature::new(t_fine.0))
}

/// Compensate a raw pressure reading, returning Pascal in Q24.8.
///
/// A calibration that zeroes the divisor of the formula yields a pressure of 0.
pub fn compensate_pressure(raw: u32, t_fine: FineTemperature, cal: &TpCalibration) -> Pressure {
    let wide = |param: i16| Wrapping(param as i64);

    let mut var1 = Wrapping(t_fine.value() as i64) - Wrapping(128_000);
    let mut var2 = var1 * var1 * wide(cal.p6);
    var2 = var2 + ((var1 * wide(cal.p5)) << 17);
    var2 = var2 + (wide(cal.p4) << 35);
    var1 = ((var1 * var1 * wide(cal.p3)) >> 8) + ((var1 * wide(cal.p2)) << 12);
    var1 = ((Wrapping(1i64 << 47) + var1) * Wrapping(cal.p1 as i64)) >> 33;

    if var1.0 == 0 {
        trace!("pressure divisor is zero, returning 0");
        return Pressure(0);
    }

    // The subtraction happens on the 32-bit ADC value, before widening.
    let mut p = Wrapping((Wrapping(1_048_576i32) - Wrapping(raw as i32)).0 as i64);
    p = (((p << 31) - var2) * Wrapping(3125)) / var1;
    var1 = (wide(cal.p9) * (p >> 13) * (p >> 13)) >> 25;
    var2 = (wide(cal.p8) * p) >> 19;
    p = ((p + var1 + var2) >> 8) + (wide(cal.p7) << 4);

    Pressure(p.0 as u32)
}

/// Compensate a raw humidity reading, returning %RH in Q22.10.
pub fn compensate_humidity(raw: u16, t_fine: FineTemperature, cal: &HumCalibration) -> Humidity {
    Humidity((humidity_q22_22(raw, t_fine, cal) >> 12) as u32)
}

/// The humidity formula up to, and including, its saturation to `0..=HUMIDITY_LIMIT`.
fn humidity_q22_22(raw: u16, t_fine: FineTemperature, cal: &HumCalibration) -> i32 {
    let adc = Wrapping(raw as i32);
    let h1 = Wrapping(cal.h1 as i32);
    let h2 = Wrapping(cal.h2 as i32);
    let h3 = Wrapping(cal.h3 as i32);
    let h4 = Wrapping(cal.h4 as i32);
    let h5 = Wrapping(cal.h5 as i32);
    let h6 = Wrapping(cal.h6 as i32);

    let v = Wrapping(t_fine.value()) - Wrapping(76_800);
    let v = ((((adc << 14) - (h4 << 20) - (h5 * v)) + Wrapping(16_384)) >> 15)
        * (((((((v * h6) >> 10) * (((v * h3) >> 11) + Wrapping(32_768))) >> 10)
            + Wrapping(2_097_152))
            * h2
            + Wrapping(8_192))
            >> 14);
    let v = v - (((((v >> 15) * (v >> 15)) >> 7) * h1) >> 4);

    v.0.clamp(0, HUMIDITY_LIMIT)
}

/// Compensate all three values of one acquisition cycle.
pub fn compensate(raw: &RawSample, cal: &Calibration) -> Measurement {
    let (temperature, t_fine) = compensate_temperature(raw.temperature, cal.tp());

    Measurement {
        temperature,
        pressure: compensate_pressure(raw.pressure, t_fine, cal.tp()),
        humidity: compensate_humidity(raw.humidity, t_fine, cal.hum()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::tests::datasheet_calibration;

    /// `t_fine` of the datasheet temperature example.
    const T_FINE: FineTemperature = FineTemperature::new(128422);

    mod temperature {
        use super::*;

        /// Datasheet example: 25.08 °C.
        #[test]
        fn datasheet_example() {
            let cal = datasheet_calibration();
            let (temp, t_fine) = compensate_temperature(519888, cal.tp());
            assert_eq!(temp.as_centidegrees_celsius(), 2508);
            assert_eq!(t_fine, T_FINE);
        }

        #[test]
        fn output_5123_is_51_23_degrees() {
            let cal = datasheet_calibration();
            let (temp, t_fine) = compensate_temperature(603584, cal.tp());
            assert_eq!(temp.as_centidegrees_celsius(), 5123);
            assert_eq!(temp.as_degrees_celsius(), 51.23);
            assert_eq!(t_fine.value(), 262276);
        }

        #[test]
        fn extreme_raw_values() {
            let cal = datasheet_calibration();
            // Both ends of the ADC range must compute without panicking
            compensate_temperature(0, cal.tp());
            compensate_temperature(0xFFFFF, cal.tp());
            compensate_temperature(u32::MAX, cal.tp());
        }
    }

    mod pressure {
        use super::*;

        /// Datasheet example: 100653 Pa.
        #[test]
        fn datasheet_example() {
            let cal = datasheet_calibration();
            let press = compensate_pressure(415148, T_FINE, cal.tp());
            assert_eq!(press.as_q24_8(), 25767233);
        }

        #[test]
        fn output_24674867_is_963_862_hpa() {
            let cal = datasheet_calibration();
            let tp = TpCalibration {
                p7: 15512,
                ..*cal.tp()
            };
            let press = compensate_pressure(439890, T_FINE, &tp);
            assert_eq!(press.as_q24_8(), 24674867);
            assert!((press.as_hectopascal() - 963.862).abs() < 0.001);
        }

        #[test]
        fn zero_divisor_gives_zero() {
            let cal = datasheet_calibration();
            let tp = TpCalibration { p1: 0, ..*cal.tp() };
            for raw in [0, 415148, 0xFFFFF] {
                assert_eq!(compensate_pressure(raw, T_FINE, &tp).as_q24_8(), 0);
            }
            assert_eq!(
                compensate_pressure(415148, FineTemperature::new(i32::MIN), &tp).as_q24_8(),
                0
            );
        }

        #[test]
        fn extreme_inputs() {
            let cal = datasheet_calibration();
            for t_fine in [i32::MIN, -1, 0, i32::MAX] {
                for raw in [0, 0x80000, 0xFFFFF, u32::MAX] {
                    compensate_pressure(raw, FineTemperature::new(t_fine), cal.tp());
                }
            }
        }
    }

    mod humidity {
        use super::*;

        #[test]
        fn mid_scale() {
            let cal = datasheet_calibration();
            let humi = compensate_humidity(0x8000, T_FINE, cal.hum());
            assert_eq!(humi.as_q22_10(), 72045);
        }

        #[test]
        fn output_47445_is_46_333_percent() {
            let cal = datasheet_calibration();
            let humi = compensate_humidity(28443, T_FINE, cal.hum());
            assert_eq!(humi.as_q22_10(), 47445);
            assert_eq!(humi.as_millipercent(), 46333);
        }

        #[test]
        fn saturates_at_both_ends() {
            let cal = datasheet_calibration();
            assert_eq!(humidity_q22_22(0, T_FINE, cal.hum()), 0);
            assert_eq!(humidity_q22_22(u16::MAX, T_FINE, cal.hum()), HUMIDITY_LIMIT);
            assert_eq!(compensate_humidity(0, T_FINE, cal.hum()).as_q22_10(), 0);
            assert_eq!(
                compensate_humidity(u16::MAX, T_FINE, cal.hum()).as_q22_10(),
                102400
            );
        }

        /// The unscaled result stays within `0..=HUMIDITY_LIMIT` for every raw value.
        #[test]
        fn clamped_over_full_raw_range() {
            let cal = datasheet_calibration();
            let extreme = HumCalibration {
                h1: u8::MAX,
                h2: i16::MAX,
                h3: u8::MAX,
                h4: 0x0FFF,
                h5: 0x0FFF,
                h6: i8::MIN,
            };

            for hum in [cal.hum(), &extreme] {
                for t_fine in [i32::MIN, -100_000, 0, 128422, 262276, i32::MAX] {
                    let t_fine = FineTemperature::new(t_fine);
                    for raw in 0..=u16::MAX {
                        let v = humidity_q22_22(raw, t_fine, hum);
                        assert!((0..=HUMIDITY_LIMIT).contains(&v), "raw {raw}: {v}");
                    }
                }
            }
        }
    }

    /// All three values of a cycle share the fine temperature of its raw temperature.
    #[test]
    fn compensate_sample() {
        let cal = datasheet_calibration();
        let raw = RawSample {
            temperature: 519888,
            pressure: 415148,
            humidity: 0x8000,
        };

        let m = compensate(&raw, &cal);
        assert_eq!(m.temperature.as_centidegrees_celsius(), 2508);
        assert_eq!(m.pressure.as_q24_8(), 25767233);
        assert_eq!(m.humidity.as_q22_10(), 72045);
    }
}
