//! Frame checksum: CRC-8/SMBUS over `kind | len | payload`.
//!
//! Sync and the checksum byte itself are not covered.

use crc::{Crc, CRC_8_SMBUS};

const FRAME_CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Checksum carried in the last byte of a frame of `kind` around `payload`.
///
/// The length byte is taken from `payload`, which must not exceed
/// [`MAX_PAYLOAD`](crate::MAX_PAYLOAD).
#[must_use]
pub fn frame_checksum(kind: u8, payload: &[u8]) -> u8 {
    debug_assert!(payload.len() <= crate::MAX_PAYLOAD);
    let mut digest = FRAME_CRC.digest();
    digest.update(&[kind, payload.len() as u8]);
    digest.update(payload);
    digest.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_frames() {
        assert_eq!(frame_checksum(0x01, &[0x01, 0x05, 0xFB, 0x00]), 0xF3);
        assert_eq!(frame_checksum(0x01, &[0x00; 4]), 0xA6);
        assert_eq!(frame_checksum(0x02, &[0x41, 0x01, 0x00, 0xFF, 0x80]), 0xD6);
        assert_eq!(frame_checksum(0x03, &[]), 0x3F);
    }

    #[test]
    fn test_header_is_covered() {
        let payload = [0x01, 0x05, 0xFB, 0x00];
        assert_ne!(frame_checksum(0x02, &payload), frame_checksum(0x01, &payload));
        assert_ne!(frame_checksum(0x01, &payload[..3]), frame_checksum(0x01, &payload));
    }
}
