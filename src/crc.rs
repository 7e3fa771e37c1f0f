//! CRC-8 as used by Sensirion sensors: polynomial 0x31, initial value 0xFF, no reflection and no
//! final XOR. The catalogue calls this algorithm CRC-8/NRSC-5.

use crc::{Crc, CRC_8_NRSC_5};

const SENSIRION: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

pub fn compute(data: &[u8]) -> u8 {
    SENSIRION.checksum(data)
}

pub fn check(data: &[u8], expected: u8) -> bool {
    compute(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasheet_example() {
        assert_eq!(compute(&[0xBE, 0xEF]), 0x92);
    }

    #[test]
    fn test_check() {
        assert!(check(&[0xBE, 0xEF], 0x92));
        assert!(!check(&[0xBE, 0xEF], 0x93));
        assert!(!check(&[0xEF, 0xBE], 0x92));
    }

    #[test]
    fn test_zero_word() {
        assert_eq!(compute(&[0x00, 0x00]), 0x81);
    }
}
