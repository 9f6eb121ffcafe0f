// src/common/checksum.rs

use super::error::FrameError;
use super::frame::FRAME_LEN;

/// Constant added to the byte sum by the meter firmware.
pub const CHECKSUM_OFFSET: u8 = 57;

/// Calculates the checksum of a payload.
///
/// The meter sums the eight payload bytes, adds 57 and keeps the low
/// eight bits. Wrapping arithmetic gives exactly that.
///
/// # Arguments
///
/// * `payload`: Bytes 0..8 of a frame (any length is accepted).
///
/// # Returns
///
/// The expected value of the checksum byte.
#[inline]
pub fn calculate_checksum(payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(CHECKSUM_OFFSET, |acc, byte| acc.wrapping_add(*byte))
}

/// True when byte 8 matches the checksum of bytes 0..8.
pub fn is_valid(frame: &[u8; FRAME_LEN]) -> bool {
    calculate_checksum(&frame[..FRAME_LEN - 1]) == frame[FRAME_LEN - 1]
}

/// Verifies length and checksum of a received packet.
///
/// # Errors
///
/// * `FrameError::InvalidLength` if `frame` is not 9 bytes.
/// * `FrameError::ChecksumMismatch` if byte 8 does not match.
pub fn verify_frame(frame: &[u8]) -> Result<(), FrameError> {
    if frame.len() != FRAME_LEN {
        return Err(FrameError::InvalidLength { got: frame.len() });
    }
    let expected = frame[FRAME_LEN - 1];
    let calculated = calculate_checksum(&frame[..FRAME_LEN - 1]);
    if expected == calculated {
        Ok(())
    } else {
        Err(FrameError::ChecksumMismatch { expected, calculated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // DC mV autorange, "00.00" packet captured from a meter
    const SAMPLE: [u8; 9] = [0, 1, 0, 215, 223, 215, 215, 1, 0];

    fn with_checksum(mut frame: [u8; 9]) -> [u8; 9] {
        frame[8] = calculate_checksum(&frame[..8]);
        frame
    }

    #[test]
    fn test_checksum_includes_offset() {
        assert_eq!(calculate_checksum(&[]), 57);
        assert_eq!(calculate_checksum(&[0; 8]), 57);
        assert_eq!(calculate_checksum(&[1, 2, 3]), 63);
    }

    #[test]
    fn test_checksum_wraps() {
        // 3 * 215 + 223 + 1 + 1 + 57 = 927, low byte 159
        assert_eq!(calculate_checksum(&[0, 1, 0, 215, 223, 215, 215, 1]), 159);
        assert_eq!(calculate_checksum(&[0xFF; 8]), 49);
    }

    #[test]
    fn test_is_valid() {
        let frame = with_checksum(SAMPLE);
        assert_eq!(frame[8], 159);
        assert!(is_valid(&frame));

        let mut corrupt = frame;
        corrupt[8] = corrupt[8].wrapping_add(1);
        assert!(!is_valid(&corrupt));

        let mut corrupt_payload = frame;
        corrupt_payload[3] ^= 0x40;
        assert!(!is_valid(&corrupt_payload));
    }

    #[test]
    fn test_verify_frame_errors() {
        let frame = with_checksum(SAMPLE);
        assert_eq!(verify_frame(&frame), Ok(()));
        assert_eq!(
            verify_frame(&frame[..7]),
            Err(FrameError::InvalidLength { got: 7 })
        );

        let mut bad = frame;
        bad[8] = 0;
        assert_eq!(
            verify_frame(&bad),
            Err(FrameError::ChecksumMismatch { expected: 0, calculated: 159 })
        );
    }
}
