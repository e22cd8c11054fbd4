use crate::fnv::{FNV1A_OFFSET_BASIS, fnv1a};
use crate::registers::{CALIB_H_LEN, CALIB_TP_LEN};

/// Size of the byte image of [`TpCalibration`].
const TP_IMAGE_LEN: usize = CALIB_TP_LEN;
/// Size of the byte image of [`HumCalibration`].
const HUM_IMAGE_LEN: usize = 9;

/// Temperature and pressure trimming parameters, `dig_T1..dig_T3` and `dig_P1..dig_P9`.
///
/// Stored by the sensor as twelve little-endian 16-bit words at 0x88..=0x9F.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct TpCalibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
}

impl TpCalibration {
    /// Unpack the 24-byte block read from 0x88.
    pub const fn from_bytes(buf: &[u8; CALIB_TP_LEN]) -> Self {
        Self {
            t1: u16::from_le_bytes([buf[0], buf[1]]),
            t2: i16::from_le_bytes([buf[2], buf[3]]),
            t3: i16::from_le_bytes([buf[4], buf[5]]),
            p1: u16::from_le_bytes([buf[6], buf[7]]),
            p2: i16::from_le_bytes([buf[8], buf[9]]),
            p3: i16::from_le_bytes([buf[10], buf[11]]),
            p4: i16::from_le_bytes([buf[12], buf[13]]),
            p5: i16::from_le_bytes([buf[14], buf[15]]),
            p6: i16::from_le_bytes([buf[16], buf[17]]),
            p7: i16::from_le_bytes([buf[18], buf[19]]),
            p8: i16::from_le_bytes([buf[20], buf[21]]),
            p9: i16::from_le_bytes([buf[22], buf[23]]),
        }
    }

    /// Byte image of the parameters, in declaration order, each one little-endian.
    pub fn to_bytes(&self) -> [u8; TP_IMAGE_LEN] {
        let words = [
            self.t1.to_le_bytes(),
            self.t2.to_le_bytes(),
            self.t3.to_le_bytes(),
            self.p1.to_le_bytes(),
            self.p2.to_le_bytes(),
            self.p3.to_le_bytes(),
            self.p4.to_le_bytes(),
            self.p5.to_le_bytes(),
            self.p6.to_le_bytes(),
            self.p7.to_le_bytes(),
            self.p8.to_le_bytes(),
            self.p9.to_le_bytes(),
        ];

        let mut image = [0; TP_IMAGE_LEN];
        for (chunk, word) in image.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word);
        }
        image
    }
}

/// Humidity trimming parameters, `dig_H1..dig_H6`.
///
/// `H1` lives alone at 0xA1. The rest is packed into 0xE1..=0xE7, with `H4`
/// and `H5` being 12-bit values that share the nibbles of 0xE5:
///
/// ```text
/// 0xE1 0xE2 | 0xE3 | 0xE4        0xE5[3:0] | 0xE5[7:4]  0xE6        | 0xE7
/// H2 [7:0]  | H3   | H4 [11:4]   H4 [3:0]  | H5 [3:0]   H5 [11:4]   | H6
///   [15:8]  |      |                       |                        |
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct HumCalibration {
    pub h1: u8,
    pub h2: i16,
    pub h3: u8,
    pub h4: i16,
    pub h5: i16,
    pub h6: i8,
}

impl HumCalibration {
    /// Reassemble the parameters from the `H1` register and the 7-byte block read from 0xE1.
    ///
    /// The 12-bit `H4` / `H5` fields are zero-extended into their 16-bit storage.
    pub const fn from_registers(h1: u8, buf: &[u8; CALIB_H_LEN]) -> Self {
        Self {
            h1,
            h2: i16::from_le_bytes([buf[0], buf[1]]),
            h3: buf[2],
            h4: ((buf[3] as i16) << 4) | (buf[4] & 0x0F) as i16,
            h5: (buf[4] >> 4) as i16 | ((buf[5] as i16) << 4),
            h6: buf[6] as i8,
        }
    }

    /// Byte image of the parameters: `H1`, `H2` (LE), `H3`, `H4` (LE), `H5` (LE), `H6`.
    pub fn to_bytes(&self) -> [u8; HUM_IMAGE_LEN] {
        let [h2_lo, h2_hi] = self.h2.to_le_bytes();
        let [h4_lo, h4_hi] = self.h4.to_le_bytes();
        let [h5_lo, h5_hi] = self.h5.to_le_bytes();

        [
            self.h1,
            h2_lo,
            h2_hi,
            self.h3,
            h4_lo,
            h4_hi,
            h5_lo,
            h5_hi,
            self.h6 as u8,
        ]
    }
}

/// The complete set of factory calibration parameters of one sensor, together
/// with the identity derived from them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    tp: TpCalibration,
    hum: HumCalibration,
    identity: u32,
}

impl Calibration {
    /// Bundle both parameter groups and derive the sensor identity from them.
    pub fn new(tp: TpCalibration, hum: HumCalibration) -> Self {
        let identity = fnv1a(FNV1A_OFFSET_BASIS, &tp.to_bytes());
        let identity = fnv1a(identity, &hum.to_bytes());

        Self { tp, hum, identity }
    }

    /// Temperature and pressure parameters.
    #[inline]
    pub const fn tp(&self) -> &TpCalibration {
        &self.tp
    }

    /// Humidity parameters.
    #[inline]
    pub const fn hum(&self) -> &HumCalibration {
        &self.hum
    }

    /// FNV-1a hash over the byte images of [`TpCalibration`] then [`HumCalibration`].
    ///
    /// Stable for a given sensor, and different between sensors in practice, since
    /// every chip is trimmed individually.
    #[inline]
    pub const fn identity(&self) -> u32 {
        self.identity
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Calibration block using the trimming values of the Bosch datasheet
    /// compensation example.
    pub(crate) const TP_BLOCK: [u8; CALIB_TP_LEN] = [
        0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C,
        0x00, 0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17,
    ];
    /// H1 = 75
    pub(crate) const H1_REG: u8 = 0x4B;
    /// H2 = 362, H3 = 0, H4 = 313, H5 = 50, H6 = 30
    pub(crate) const H_BLOCK: [u8; CALIB_H_LEN] = [0x6A, 0x01, 0x00, 0x13, 0x29, 0x03, 0x1E];
    /// Identity of the calibration above.
    pub(crate) const IDENTITY: u32 = 0x427E_D1B2;

    pub(crate) fn datasheet_calibration() -> Calibration {
        Calibration::new(
            TpCalibration::from_bytes(&TP_BLOCK),
            HumCalibration::from_registers(H1_REG, &H_BLOCK),
        )
    }

    #[test]
    fn tp_from_bytes() {
        let tp = TpCalibration::from_bytes(&TP_BLOCK);
        assert_eq!(
            tp,
            TpCalibration {
                t1: 27504,
                t2: 26435,
                t3: -1000,
                p1: 36477,
                p2: -10685,
                p3: 3024,
                p4: 2855,
                p5: 140,
                p6: -7,
                p7: 15500,
                p8: -14600,
                p9: 6000,
            }
        );
        assert_eq!(tp.to_bytes(), TP_BLOCK);
    }

    #[test]
    fn hum_from_registers() {
        let hum = HumCalibration::from_registers(H1_REG, &H_BLOCK);
        assert_eq!(
            hum,
            HumCalibration {
                h1: 75,
                h2: 362,
                h3: 0,
                h4: 313,
                h5: 50,
                h6: 30,
            }
        );
        assert_eq!(
            hum.to_bytes(),
            [0x4B, 0x6A, 0x01, 0x00, 0x39, 0x01, 0x32, 0x00, 0x1E]
        );
    }

    /// H4 and H5 split the nibbles of their shared register.
    #[test]
    fn hum_nibble_split() {
        let hum = HumCalibration::from_registers(0, &[0x01, 0x02, 0x03, 0x04, 0xF5, 0x06, 0x07]);
        assert_eq!(hum.h2, 0x0201);
        assert_eq!(hum.h3, 0x03);
        assert_eq!(hum.h4, 0x45);
        assert_eq!(hum.h5, 0x6F);
        assert_eq!(hum.h6, 0x07);
    }

    #[test]
    fn hum_signed_fields() {
        let hum = HumCalibration::from_registers(0xFF, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(hum.h1, 0xFF);
        assert_eq!(hum.h2, -1);
        assert_eq!(hum.h3, 0xFF);
        assert_eq!(hum.h4, 0x0FFF);
        assert_eq!(hum.h5, 0x0FFF);
        assert_eq!(hum.h6, -1);
    }

    #[test]
    fn identity_of_known_calibration() {
        assert_eq!(datasheet_calibration().identity(), IDENTITY);
    }

    #[test]
    fn identity_is_deterministic() {
        assert_eq!(
            datasheet_calibration().identity(),
            datasheet_calibration().identity()
        );
    }

    /// Changing any single register byte of either block changes the identity.
    #[test]
    fn identity_tracks_every_register_byte() {
        for i in 0..CALIB_TP_LEN {
            let mut block = TP_BLOCK;
            block[i] ^= 0xFF;
            let cal = Calibration::new(
                TpCalibration::from_bytes(&block),
                HumCalibration::from_registers(H1_REG, &H_BLOCK),
            );
            assert_ne!(cal.identity(), IDENTITY, "TP byte {i}");
        }

        let cal = Calibration::new(
            TpCalibration::from_bytes(&TP_BLOCK),
            HumCalibration::from_registers(H1_REG ^ 0xFF, &H_BLOCK),
        );
        assert_ne!(cal.identity(), IDENTITY, "H1");

        for i in 0..CALIB_H_LEN {
            let mut block = H_BLOCK;
            block[i] ^= 0xFF;
            let cal = Calibration::new(
                TpCalibration::from_bytes(&TP_BLOCK),
                HumCalibration::from_registers(H1_REG, &block),
            );
            assert_ne!(cal.identity(), IDENTITY, "H byte {i}");
        }
    }
}
