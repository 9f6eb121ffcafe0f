// src/common/segment.rs

use core::fmt;

/// Bit 3 of every digit byte is not a segment (decimal point or MAX flag).
pub const SEGMENT_MASK: u8 = !0x08;

/// A single character of the meter's 7-segment display.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Glyph {
    /// Numeric digit 0..=9.
    Digit(u8),
    F,
    P,
    E,
    C,
    L,
    H,
    I,
    /// Lower-case 'h'.
    SmallH,
    /// Lower-case 'r'.
    SmallR,
    /// Lower-case 't'.
    SmallT,
    /// Lower-case 'n'.
    SmallN,
    Dash,
    Blank,
    /// Segment pattern not in the table, keeps the masked code.
    Unknown(u8),
}

/// Segment pattern (bit 3 cleared) to glyph.
/// Segment bit order is D C G B (DP) E F A, from bit 7 down to bit 0.
const SEGMENT_TABLE: [(u8, Glyph); 23] = [
    (215, Glyph::Digit(0)),
    (80, Glyph::Digit(1)),
    (181, Glyph::Digit(2)),
    (241, Glyph::Digit(3)),
    (114, Glyph::Digit(4)),
    (227, Glyph::Digit(5)),
    (231, Glyph::Digit(6)),
    (81, Glyph::Digit(7)),
    (247, Glyph::Digit(8)),
    (243, Glyph::Digit(9)),
    (39, Glyph::F),
    (55, Glyph::P),
    (167, Glyph::E),
    (135, Glyph::C),
    (134, Glyph::L),
    (118, Glyph::H),
    (6, Glyph::I),
    (102, Glyph::SmallH),
    (36, Glyph::SmallR),
    (166, Glyph::SmallT),
    (100, Glyph::SmallN),
    (32, Glyph::Dash),
    (0, Glyph::Blank),
];

impl Glyph {
    /// Looks up a raw digit byte. Bit 3 is ignored.
    pub fn from_segments(byte: u8) -> Self {
        let code = byte & SEGMENT_MASK;
        SEGMENT_TABLE
            .iter()
            .find(|(pattern, _)| *pattern == code)
            .map(|(_, glyph)| *glyph)
            .unwrap_or(Glyph::Unknown(code))
    }

    /// Segment pattern for this glyph, `None` for unknown glyphs.
    pub fn segments(&self) -> Option<u8> {
        SEGMENT_TABLE
            .iter()
            .find(|(_, glyph)| glyph == self)
            .map(|(pattern, _)| *pattern)
    }

    /// Character shown for this glyph; unknown patterns render as '?'.
    pub fn as_char(&self) -> char {
        match *self {
            Glyph::Digit(d) => char::from_digit(d as u32, 10).unwrap_or('?'),
            Glyph::F => 'F',
            Glyph::P => 'P',
            Glyph::E => 'E',
            Glyph::C => 'C',
            Glyph::L => 'L',
            Glyph::H => 'H',
            Glyph::I => 'I',
            Glyph::SmallH => 'h',
            Glyph::SmallR => 'r',
            Glyph::SmallT => 't',
            Glyph::SmallN => 'n',
            Glyph::Dash => '-',
            Glyph::Blank => ' ',
            Glyph::Unknown(_) => '?',
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Glyph::Unknown(_))
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Write::write_char(f, self.as_char())
    }
}

/// The four display digits, leftmost first.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Digits([Glyph; 4]);

impl Digits {
    pub const fn new(glyphs: [Glyph; 4]) -> Self {
        Digits(glyphs)
    }

    pub fn glyphs(&self) -> &[Glyph; 4] {
        &self.0
    }

    pub fn get(&self, position: usize) -> Option<Glyph> {
        self.0.get(position).copied()
    }

    /// Position of the first unknown glyph, if any.
    pub fn first_unknown(&self) -> Option<usize> {
        self.0.iter().position(Glyph::is_unknown)
    }

    /// Compares the display text, ignoring leading and trailing blanks, to `text`.
    ///
    /// `"0F"` matches a display of `" 0F "`, `"0F  "` or `"  0F"`.
    pub fn trimmed_eq(&self, text: &str) -> bool {
        let start = self.0.iter().position(|g| *g != Glyph::Blank);
        let end = self.0.iter().rposition(|g| *g != Glyph::Blank);
        match (start, end) {
            (Some(start), Some(end)) => {
                let shown = &self.0[start..=end];
                shown.len() == text.chars().count()
                    && shown.iter().zip(text.chars()).all(|(g, c)| g.as_char() == c)
            }
            _ => text.is_empty(),
        }
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for glyph in &self.0 {
            write!(f, "{}", glyph)?;
        }
        Ok(())
    }
}
