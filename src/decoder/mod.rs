// src/decoder/mod.rs

pub mod bits;
pub mod format;
pub mod interpret;

use crate::common::{DecodeError, Digits, Glyph, Mode, RawFrame, Scale, Sign, Units};

pub use format::{display_text, FormatOptions, FormatStyle};
pub use interpret::{interpret, Measurement, Reading};

#[cfg(feature = "alloc")]
pub use format::format;

/// Display symbols other than units and scale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Annunciators {
    pub min: bool,
    pub max: bool,
    pub relative: bool,
    pub hold: bool,
    pub battery_low: bool,
    pub diode: bool,
    pub continuity: bool,
    pub autorange: bool,
    pub rs232: bool,
    pub ac: bool,
}

impl Annunciators {
    /// Beeper symbol. The meter lights it with the same bit as continuity.
    pub fn beep(&self) -> bool {
        self.continuity
    }

    fn from_frame(frame: &RawFrame) -> Self {
        Annunciators {
            min: bits::MIN.is_set(frame),
            max: bits::MAX.is_set(frame),
            relative: bits::RELATIVE.is_set(frame),
            hold: bits::HOLD.is_set(frame),
            battery_low: bits::BATTERY_LOW.is_set(frame),
            diode: bits::DIODE.is_set(frame),
            continuity: bits::CONTINUITY.is_set(frame),
            autorange: bits::AUTORANGE.is_set(frame),
            rs232: bits::RS232.is_set(frame),
            ac: bits::AC.is_set(frame),
        }
    }
}

/// Everything the display shows, unpacked from one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecodedFields {
    pub mode: Mode,
    pub digits: Digits,
    /// Number of digits left of the decimal point, 0 when no point is lit.
    pub decimal_position: u8,
    pub sign: Sign,
    pub annunciators: Annunciators,
    pub units: Units,
    pub scale: Scale,
}

impl DecodedFields {
    /// Digits shown right of the decimal point.
    pub fn significant_decimals(&self) -> u8 {
        if self.decimal_position == 0 {
            0
        } else {
            4 - self.decimal_position
        }
    }

    /// True when the reading is an AC quantity (V, A or dBm with AC lit).
    pub fn is_ac_unit(&self) -> bool {
        self.annunciators.ac && self.units.has_ac_qualifier()
    }
}

/// Unpacks a validated frame into display fields.
///
/// Pure and infallible apart from the dial position: a mode byte outside
/// 0..=25 gives `DecodeError::UnknownMode`. Unrecognised segment patterns
/// are kept as `Glyph::Unknown` and only matter once the digits are read
/// as a number.
pub fn decode(frame: &RawFrame) -> Result<DecodedFields, DecodeError> {
    let raw_mode = frame.byte(bits::MODE_BYTE);
    let mode = Mode::from_u8(raw_mode).ok_or(DecodeError::UnknownMode(raw_mode))?;

    let glyphs = bits::DIGIT_BYTES.map(|index| Glyph::from_segments(frame.byte(index)));

    let decimal_position = bits::first_match(frame, &bits::DECIMAL_POINTS).unwrap_or(0);

    let sign = if bits::SIGN.is_set(frame) {
        Sign::Negative
    } else {
        Sign::Positive
    };

    Ok(DecodedFields {
        mode,
        digits: Digits::new(glyphs),
        decimal_position,
        sign,
        annunciators: Annunciators::from_frame(frame),
        units: bits::first_match(frame, &bits::UNITS_PRIORITY).unwrap_or_default(),
        scale: bits::first_match(frame, &bits::SCALE_PRIORITY).unwrap_or_default(),
    })
}

#[cfg(test)]
pub(crate) mod test_frames {
    //! Frame builders shared by the decoder tests.

    use crate::common::{Glyph, RawFrame};

    pub const DP: u8 = 0x08;

    pub fn seg(glyph: Glyph) -> u8 {
        glyph.segments().unwrap_or(0)
    }

    pub fn digit(d: u8) -> u8 {
        seg(Glyph::Digit(d))
    }

    /// Builds a frame from mode, unit bytes, the four glyph bytes (left to right) and byte 7.
    pub fn frame(mode: u8, b1: u8, b2: u8, left_to_right: [u8; 4], b7: u8) -> RawFrame {
        let [d6, d5, d4, d3] = left_to_right;
        RawFrame::from_payload([mode, b1, b2, d3, d4, d5, d6, b7])
    }
}
