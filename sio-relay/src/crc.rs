//! The staging-slot checksum.
//!
//! One round of a table-driven CRC-8 (polynomial `0x85`, zero init,
//! no reflection, no final xor) over a fixed 32 byte window.

/// Number of bytes covered by one checksum.
pub const WINDOW_LEN: usize = 32;

/// Describes types that can provide
/// a CRC computation.
pub trait CrcProvider {
    type Word;
    type Rep: Eq;

    fn update(&mut self, word: &Self::Word);
    fn finalize(&mut self) -> Self::Rep;
}

/// Running CRC-8 state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc8 {
    state: u8,
}

impl Crc8 {
    pub const fn new() -> Self {
        Self { state: 0 }
    }
}

impl CrcProvider for Crc8 {
    type Word = u8;
    type Rep = u8;

    #[inline]
    fn update(&mut self, word: &u8) {
        self.state = CRC8_TABLE[(self.state ^ word) as usize];
    }

    #[inline]
    fn finalize(&mut self) -> u8 {
        self.state
    }
}

/// Fold a 32 byte window into its checksum byte.
pub fn checksum(window: &[u8; WINDOW_LEN]) -> u8 {
    let mut crc = Crc8::new();

    window.iter().for_each(|byte| crc.update(byte));

    crc.finalize()
}

/// Next CRC state, indexed by `state ^ byte`.
pub static CRC8_TABLE: [u8; 256] = [
    0x00, 0x85, 0x8F, 0x0A, 0x9B, 0x1E, 0x14, 0x91, 0xB3, 0x36, 0x3C, 0xB9, 0x28, 0xAD, 0xA7, 0x22,
    0xE3, 0x66, 0x6C, 0xE9, 0x78, 0xFD, 0xF7, 0x72, 0x50, 0xD5, 0xDF, 0x5A, 0xCB, 0x4E, 0x44, 0xC1,
    0x43, 0xC6, 0xCC, 0x49, 0xD8, 0x5D, 0x57, 0xD2, 0xF0, 0x75, 0x7F, 0xFA, 0x6B, 0xEE, 0xE4, 0x61,
    0xA0, 0x25, 0x2F, 0xAA, 0x3B, 0xBE, 0xB4, 0x31, 0x13, 0x96, 0x9C, 0x19, 0x88, 0x0D, 0x07, 0x82,
    0x86, 0x03, 0x09, 0x8C, 0x1D, 0x98, 0x92, 0x17, 0x35, 0xB0, 0xBA, 0x3F, 0xAE, 0x2B, 0x21, 0xA4,
    0x65, 0xE0, 0xEA, 0x6F, 0xFE, 0x7B, 0x71, 0xF4, 0xD6, 0x53, 0x59, 0xDC, 0x4D, 0xC8, 0xC2, 0x47,
    0xC5, 0x40, 0x4A, 0xCF, 0x5E, 0xDB, 0xD1, 0x54, 0x76, 0xF3, 0xF9, 0x7C, 0xED, 0x68, 0x62, 0xE7,
    0x26, 0xA3, 0xA9, 0x2C, 0xBD, 0x38, 0x32, 0xB7, 0x95, 0x10, 0x1A, 0x9F, 0x0E, 0x8B, 0x81, 0x04,
    0x89, 0x0C, 0x06, 0x83, 0x12, 0x97, 0x9D, 0x18, 0x3A, 0xBF, 0xB5, 0x30, 0xA1, 0x24, 0x2E, 0xAB,
    0x6A, 0xEF, 0xE5, 0x60, 0xF1, 0x74, 0x7E, 0xFB, 0xD9, 0x5C, 0x56, 0xD3, 0x42, 0xC7, 0xCD, 0x48,
    0xCA, 0x4F, 0x45, 0xC0, 0x51, 0xD4, 0xDE, 0x5B, 0x79, 0xFC, 0xF6, 0x73, 0xE2, 0x67, 0x6D, 0xE8,
    0x29, 0xAC, 0xA6, 0x23, 0xB2, 0x37, 0x3D, 0xB8, 0x9A, 0x1F, 0x15, 0x90, 0x01, 0x84, 0x8E, 0x0B,
    0x0F, 0x8A, 0x80, 0x05, 0x94, 0x11, 0x1B, 0x9E, 0xBC, 0x39, 0x33, 0xB6, 0x27, 0xA2, 0xA8, 0x2D,
    0xEC, 0x69, 0x63, 0xE6, 0x77, 0xF2, 0xF8, 0x7D, 0x5F, 0xDA, 0xD0, 0x55, 0xC4, 0x41, 0x4B, 0xCE,
    0x4C, 0xC9, 0xC3, 0x46, 0xD7, 0x52, 0x58, 0xDD, 0xFF, 0x7A, 0x70, 0xF5, 0x64, 0xE1, 0xEB, 0x6E,
    0xAF, 0x2A, 0x20, 0xA5, 0x34, 0xB1, 0xBB, 0x3E, 0x1C, 0x99, 0x93, 0x16, 0x87, 0x02, 0x08, 0x8D,
];

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: ::crc::Crc<u8> = ::crc::Crc::<u8>::new(&::crc::Algorithm {
        width: 8,
        poly: 0x85,
        init: 0x00,
        refin: false,
        refout: false,
        xorout: 0x00,
        check: 0x00,
        residue: 0x00,
    });

    /// Deterministic filler so windows are not all trivially sparse.
    fn window(seed: u32) -> [u8; WINDOW_LEN] {
        let mut state = seed;
        let mut window = [0; WINDOW_LEN];

        window.iter_mut().for_each(|byte| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            *byte = (state >> 16) as u8;
        });

        window
    }

    mod table {
        use super::*;

        #[test]
        fn matches_polynomial() {
            for i in 0..=255u8 {
                assert_eq!(CRC8_TABLE[i as usize], REFERENCE.checksum(&[i]), "entry {i:#04x}");
            }
        }
    }

    mod checksum {
        use super::*;

        #[test]
        fn zeroes() {
            assert_eq!(0x00, checksum(&[0; WINDOW_LEN]));
        }

        #[test]
        fn single_trailing_byte() {
            let mut buf = [0; WINDOW_LEN];

            buf[WINDOW_LEN - 1] = 0x01;
            assert_eq!(0x85, checksum(&buf));

            buf[WINDOW_LEN - 1] = 0xff;
            assert_eq!(0x8d, checksum(&buf));
        }

        #[test]
        fn appended_checksum_leaves_no_residue() {
            let mut buf = [0; WINDOW_LEN];

            buf[WINDOW_LEN - 2] = 0x01;
            buf[WINDOW_LEN - 1] = 0x85;

            assert_eq!(0x00, checksum(&buf));
        }

        #[test]
        fn matches_reference() {
            for seed in 0..64 {
                let buf = window(seed);

                assert_eq!(REFERENCE.checksum(&buf), checksum(&buf));
            }
        }

        #[test]
        fn deterministic() {
            let buf = window(0xdead_beef);

            assert_eq!(checksum(&buf), checksum(&buf));
        }

        #[test]
        fn provider_matches_function() {
            let buf = window(7);
            let mut crc = Crc8::new();

            buf.iter().for_each(|byte| crc.update(byte));

            assert_eq!(checksum(&buf), crc.finalize());
        }
    }
}
