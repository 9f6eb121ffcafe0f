// src/decoder/format.rs

use super::interpret::{Measurement, Reading};
use crate::common::{Digits, Sign};
use arrayvec::ArrayString;
use core::fmt::{self, Write};

#[cfg(feature = "alloc")]
use alloc::string::String;

/// Capacity of the fixed buffer used by [`Measurement::format_into`].
pub const FORMAT_CAPACITY: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FormatStyle {
    /// `12.34 mV AC Relative, Hold`
    #[default]
    Standard,
    /// Terse display text: `-0.512 mV~ REL Hold Auto`
    Compact,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub style: FormatStyle,
    /// Compact style only: list the RS232 annunciator among the modifiers.
    /// It is lit whenever the link is active, so it is left out by default.
    pub include_rs232: bool,
}

impl FormatOptions {
    pub const STANDARD: FormatOptions = FormatOptions {
        style: FormatStyle::Standard,
        include_rs232: false,
    };

    pub const COMPACT: FormatOptions = FormatOptions {
        style: FormatStyle::Compact,
        include_rs232: false,
    };
}

impl Measurement {
    /// Writes the measurement in the requested style.
    pub fn write_to<W: Write>(&self, out: &mut W, options: &FormatOptions) -> fmt::Result {
        match options.style {
            FormatStyle::Standard => self.write_standard(out),
            FormatStyle::Compact => self.write_compact(out, options.include_rs232),
        }
    }

    /// Formats into a fixed-size buffer, no allocation needed.
    ///
    /// # Errors
    ///
    /// Returns `fmt::Error` only if the text exceeds [`FORMAT_CAPACITY`].
    pub fn format_into(
        &self,
        options: &FormatOptions,
    ) -> Result<ArrayString<FORMAT_CAPACITY>, fmt::Error> {
        let mut buf = ArrayString::new();
        self.write_to(&mut buf, options)?;
        Ok(buf)
    }

    fn write_standard<W: Write>(&self, out: &mut W) -> fmt::Result {
        match *self.reading() {
            Reading::Overrange => out.write_str("OverRange"),
            Reading::LogicHigh => out.write_str("HIGH"),
            Reading::LogicLow => out.write_str("LOW"),
            Reading::ContinuityOpen => out.write_str("Open"),
            Reading::ContinuityShorted => out.write_str("Short"),
            Reading::DiodeOpen => out.write_str("Diode Open"),
            Reading::Temperature { value, significant_decimals, scale } => {
                write!(out, "{:.*} {}", significant_decimals as usize, value, scale.symbol())
            }
            Reading::Numeric { value, significant_decimals }
            | Reading::LogicVoltage { value, significant_decimals } => {
                write!(out, "{:.*}", significant_decimals as usize, value)?;
                self.write_unit(out, false)?;

                let annunciators = self.annunciators();
                out.write_str(if annunciators.ac { " AC" } else { " DC" })?;
                if annunciators.relative {
                    out.write_str(" Relative")?;
                }
                if annunciators.hold {
                    out.write_str(", Hold")?;
                }
                Ok(())
            }
        }
    }

    fn write_compact<W: Write>(&self, out: &mut W, include_rs232: bool) -> fmt::Result {
        let fields = self.fields();
        if fields.sign == Sign::Negative {
            out.write_char('-')?;
        }
        out.write_str(&display_text(&fields.digits, fields.decimal_position))?;
        self.write_unit(out, fields.is_ac_unit())?;

        let a = self.annunciators();
        let modifiers = [
            (a.relative, "REL"),
            (a.min, "MIN"),
            (a.max, "MAX"),
            (a.beep(), "Beep"),
            (a.diode, "Diode"),
            (a.battery_low, "Bat"),
            (a.hold, "Hold"),
            (a.rs232 && include_rs232, "RS232"),
            (a.autorange, "Auto"),
        ];
        for (_, label) in modifiers.iter().filter(|(lit, _)| *lit) {
            write!(out, " {}", label)?;
        }
        Ok(())
    }

    /// Writes " <prefix><unit>[~]", or nothing when no unit is lit.
    fn write_unit<W: Write>(&self, out: &mut W, ac_tilde: bool) -> fmt::Result {
        let unit = self.units().symbol();
        if unit.is_empty() {
            return Ok(());
        }
        write!(out, " {}{}", self.scale().prefix(), unit)?;
        if ac_tilde {
            out.write_char('~')?;
        }
        Ok(())
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &FormatOptions::default())
    }
}

/// Formats a measurement in the standard style.
#[cfg(feature = "alloc")]
pub fn format(measurement: &Measurement) -> String {
    alloc::format!("{}", measurement)
}

/// Display digits as text, with leading zeros stripped the way the LCD reads.
///
/// * blanks at the ends are dropped, then leading zeros;
/// * nothing left becomes `"0"`;
/// * a leading `.`, `F` or `P` gets a `0` put back in front;
/// * the diode-open display `"0.0F"` reads `".0F"`.
pub fn display_text(digits: &Digits, decimal_position: u8) -> ArrayString<8> {
    let mut raw = ArrayString::<8>::new();
    for (i, glyph) in digits.glyphs().iter().enumerate() {
        if decimal_position != 0 && i == decimal_position as usize {
            raw.push('.');
        }
        raw.push(glyph.as_char());
    }

    let stripped = raw.trim().trim_start_matches('0');
    let mut text = ArrayString::<8>::new();
    match stripped.chars().next() {
        None => text.push('0'),
        Some('.') | Some('F') | Some('P') => {
            text.push('0');
            text.push_str(stripped);
        }
        Some(_) => text.push_str(stripped),
    }

    if text.as_str() == "0.0F" {
        text.clear();
        text.push_str(".0F");
    }
    text
}
