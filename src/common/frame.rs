// src/common/frame.rs

use super::checksum;
use super::error::FrameError;
use core::fmt;

/// Every packet from the meter is exactly nine bytes.
pub const FRAME_LEN: usize = 9;

/// Serial line parameters of the meter's optical RS-232 link.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl SerialSettings {
    /// 4800 baud, 8 data bits, no parity, 1 stop bit.
    pub const RS22812: SerialSettings = SerialSettings {
        baud_rate: 4800,
        data_bits: 8,
        parity: Parity::None,
        stop_bits: 1,
    };

    /// Bits on the wire per character, start bit included.
    pub const fn bits_per_char(&self) -> u32 {
        let parity = match self.parity {
            Parity::None => 0,
            _ => 1,
        };
        1 + self.data_bits as u32 + parity + self.stop_bits as u32
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self::RS22812
    }
}

/// A checksum-valid 9-byte packet.
///
/// The only way to get one is through [`RawFrame::new`] or `TryFrom<&[u8]>`,
/// both of which verify the checksum, so decoding never sees a corrupt packet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    pub fn new(bytes: [u8; FRAME_LEN]) -> Result<Self, FrameError> {
        checksum::verify_frame(&bytes)?;
        Ok(RawFrame(bytes))
    }

    /// Builds a frame from eight payload bytes, filling in the checksum.
    pub fn from_payload(payload: [u8; FRAME_LEN - 1]) -> Self {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[..FRAME_LEN - 1].copy_from_slice(&payload);
        bytes[FRAME_LEN - 1] = checksum::calculate_checksum(&payload);
        RawFrame(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        self.0[index]
    }
}

impl TryFrom<&[u8]> for RawFrame {
    type Error = FrameError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; FRAME_LEN] = value
            .try_into()
            .map_err(|_| FrameError::InvalidLength { got: value.len() })?;
        RawFrame::new(bytes)
    }
}

/// Fixed-width decimal dump, one right-aligned column per byte.
impl fmt::Display for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:3}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_serial_settings() {
        let s = SerialSettings::default();
        assert_eq!(s.baud_rate, 4800);
        assert_eq!(s.parity, Parity::None);
        assert_eq!(s.bits_per_char(), 10);
    }

    #[test]
    fn test_raw_frame_validates() {
        let frame = RawFrame::from_payload([0, 4, 0, 215, 223, 215, 215, 1]);
        assert!(RawFrame::new(*frame.as_bytes()).is_ok());

        let mut bad = *frame.as_bytes();
        bad[8] ^= 0x01;
        assert!(matches!(
            RawFrame::new(bad),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_try_from_slice() {
        let frame = RawFrame::from_payload([1, 2, 3, 4, 5, 6, 7, 8]);
        let bytes = frame.as_bytes();
        assert_eq!(RawFrame::try_from(&bytes[..]), Ok(frame));
        assert_eq!(
            RawFrame::try_from(&bytes[..8]),
            Err(FrameError::InvalidLength { got: 8 })
        );
    }

    #[test]
    fn test_display_dump() {
        let frame = RawFrame::from_payload([0, 2, 0, 215, 80, 181, 241, 1]);
        let mut buf = heapless::String::<64>::new();
        write!(buf, "{}", frame).unwrap();
        // 0+2+0+215+80+181+241+1+57 = 777 -> 9
        assert_eq!(buf.as_str(), "  0   2   0 215  80 181 241   1   9");
    }
}
