// src/decoder/interpret.rs

use super::{Annunciators, DecodedFields};
use crate::common::{DecodeError, Digits, Glyph, Mode, Scale, Sign, TemperatureScale, Units};
use arrayvec::ArrayString;

/// What the display means, once mode-specific states are resolved.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Reading {
    Numeric { value: f64, significant_decimals: u8 },
    /// Input above the selected range (display " 0F ").
    Overrange,
    LogicHigh,
    LogicLow,
    /// Logic probe between the LOW and HIGH thresholds.
    LogicVoltage { value: f64, significant_decimals: u8 },
    ContinuityOpen,
    ContinuityShorted,
    /// Diode test with nothing across the leads (display " 0.0F").
    DiodeOpen,
    Temperature { value: f64, significant_decimals: u8, scale: TemperatureScale },
}

impl Reading {
    /// Numeric value, if the reading carries one.
    pub fn value(&self) -> Option<f64> {
        match *self {
            Reading::Numeric { value, .. }
            | Reading::LogicVoltage { value, .. }
            | Reading::Temperature { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// A reading together with the display fields it was derived from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurement {
    reading: Reading,
    fields: DecodedFields,
}

impl Measurement {
    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn fields(&self) -> &DecodedFields {
        &self.fields
    }

    pub fn mode(&self) -> Mode {
        self.fields.mode
    }

    pub fn units(&self) -> Units {
        self.fields.units
    }

    pub fn scale(&self) -> Scale {
        self.fields.scale
    }

    pub fn annunciators(&self) -> &Annunciators {
        &self.fields.annunciators
    }
}

const OPEN: [Glyph; 4] = [Glyph::Digit(0), Glyph::P, Glyph::E, Glyph::SmallN];
const SHORT: [Glyph; 4] = [Glyph::Digit(5), Glyph::SmallH, Glyph::SmallR, Glyph::SmallT];

fn is_diode_open(digits: &Digits) -> bool {
    matches!(
        digits.glyphs(),
        [Glyph::Blank | Glyph::Digit(0), Glyph::Digit(0), Glyph::Digit(0), Glyph::F]
    )
}

/// Resolves decoded display fields into a typed reading.
///
/// Checked in order: overrange, logic probe, continuity, diode open,
/// temperature, then the plain numeric case.
pub fn interpret(fields: &DecodedFields) -> Result<Measurement, DecodeError> {
    let digits = &fields.digits;

    let reading = if digits.trimmed_eq("0F") {
        Reading::Overrange
    } else {
        match fields.mode {
            Mode::Logic => {
                if digits.trimmed_eq("L0") {
                    Reading::LogicLow
                } else if digits.trimmed_eq("HI") {
                    Reading::LogicHigh
                } else {
                    Reading::LogicVoltage {
                        value: digits_to_number(digits, fields.decimal_position, fields.sign)?,
                        significant_decimals: fields.significant_decimals(),
                    }
                }
            }
            Mode::Continuity => {
                if digits.glyphs() == &OPEN {
                    Reading::ContinuityOpen
                } else if digits.glyphs() == &SHORT {
                    Reading::ContinuityShorted
                } else {
                    return Err(DecodeError::UnexpectedContinuity(*digits));
                }
            }
            Mode::Diode if is_diode_open(digits) => Reading::DiodeOpen,
            Mode::Temperature => {
                let [a, b, c, suffix] = *digits.glyphs();
                let scale = match suffix {
                    Glyph::C => TemperatureScale::Celsius,
                    Glyph::F => TemperatureScale::Fahrenheit,
                    _ => return Err(DecodeError::MissingTemperatureScale(*digits)),
                };
                // Suffix position stands in as a trailing zero
                let numeric = Digits::new([a, b, c, Glyph::Digit(0)]);
                Reading::Temperature {
                    value: digits_to_number(&numeric, fields.decimal_position, fields.sign)?,
                    significant_decimals: fields.significant_decimals(),
                    scale,
                }
            }
            _ => Reading::Numeric {
                value: digits_to_number(digits, fields.decimal_position, fields.sign)?,
                significant_decimals: fields.significant_decimals(),
            },
        }
    };

    Ok(Measurement {
        reading,
        fields: *fields,
    })
}

/// Reads four display glyphs as a number.
///
/// A decimal point is inserted after `decimal_position` glyphs (none when 0),
/// blanks at either end are ignored and the result is multiplied by the sign.
/// Only digits, blanks and a leading dash are accepted.
///
/// # Errors
///
/// * `DecodeError::UnknownGlyph` if any glyph has no known pattern.
/// * `DecodeError::NotNumeric` for letters, inner blanks or an inner dash.
pub fn digits_to_number(
    digits: &Digits,
    decimal_position: u8,
    sign: Sign,
) -> Result<f64, DecodeError> {
    if let Some(position) = digits.first_unknown() {
        return Err(DecodeError::UnknownGlyph { position });
    }

    let mut text = ArrayString::<8>::new();
    for (i, glyph) in digits.glyphs().iter().enumerate() {
        if decimal_position != 0 && i == decimal_position as usize {
            text.push('.');
        }
        text.push(glyph.as_char());
    }

    // f64 parsing would take "1E23" or "InF" as numbers
    let mut seen_digit = false;
    for glyph in digits.glyphs() {
        match glyph {
            Glyph::Digit(_) => seen_digit = true,
            Glyph::Blank => {}
            Glyph::Dash if !seen_digit => {}
            _ => return Err(DecodeError::NotNumeric { text }),
        }
    }

    text.trim()
        .parse::<f64>()
        .map(|value| value * sign.factor())
        .map_err(|_| DecodeError::NotNumeric { text })
}
