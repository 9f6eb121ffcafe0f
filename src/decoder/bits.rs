// src/decoder/bits.rs

use crate::common::{RawFrame, Scale, Units};

/// Location of a single flag inside a frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BitCoord {
    pub byte: usize,
    pub bit: u8,
}

impl BitCoord {
    pub const fn new(byte: usize, bit: u8) -> Self {
        BitCoord { byte, bit }
    }

    #[inline]
    pub fn is_set(&self, frame: &RawFrame) -> bool {
        frame.byte(self.byte) & (1 << self.bit) != 0
    }
}

// --- Byte positions ---

pub const MODE_BYTE: usize = 0;
/// Digit bytes, leftmost display digit first.
pub const DIGIT_BYTES: [usize; 4] = [6, 5, 4, 3];

// --- Single flags ---

pub const SIGN: BitCoord = BitCoord::new(7, 3);

/// Decimal point flags, checked in this order: the first set wins.
/// Value is the number of digits left of the point.
pub const DECIMAL_POINTS: [(BitCoord, u8); 3] = [
    (BitCoord::new(3, 3), 3),
    (BitCoord::new(4, 3), 2),
    (BitCoord::new(5, 3), 1),
];

pub const MIN: BitCoord = BitCoord::new(2, 0);
pub const RELATIVE: BitCoord = BitCoord::new(2, 1);
pub const MAX: BitCoord = BitCoord::new(6, 3);
pub const AUTORANGE: BitCoord = BitCoord::new(7, 0);
pub const RS232: BitCoord = BitCoord::new(7, 1);
pub const AC: BitCoord = BitCoord::new(7, 2);
pub const HOLD: BitCoord = BitCoord::new(7, 4);
pub const BATTERY_LOW: BitCoord = BitCoord::new(7, 5);
pub const DIODE: BitCoord = BitCoord::new(7, 6);
/// Shared by the continuity and beep symbols.
pub const CONTINUITY: BitCoord = BitCoord::new(7, 7);

// --- Priority tables ---

/// Base unit flags; when several are lit the earliest entry wins.
pub const UNITS_PRIORITY: [(BitCoord, Units); 9] = [
    (BitCoord::new(1, 1), Units::Volt),
    (BitCoord::new(1, 2), Units::Amp),
    (BitCoord::new(1, 3), Units::Farad),
    (BitCoord::new(1, 6), Units::Ohm),
    (BitCoord::new(1, 7), Units::Hertz),
    (BitCoord::new(2, 2), Units::Gain),
    (BitCoord::new(2, 3), Units::Percent),
    (BitCoord::new(2, 4), Units::Second),
    (BitCoord::new(2, 5), Units::DecibelMilliwatt),
];

/// Metric prefix flags; when several are lit the earliest entry wins.
pub const SCALE_PRIORITY: [(BitCoord, Scale); 5] = [
    (BitCoord::new(1, 0), Scale::Milli),
    (BitCoord::new(1, 4), Scale::Mega),
    (BitCoord::new(1, 5), Scale::Kilo),
    (BitCoord::new(2, 6), Scale::Nano),
    (BitCoord::new(2, 7), Scale::Micro),
];

/// Returns the value of the first entry whose flag is set.
pub fn first_match<T: Copy>(frame: &RawFrame, table: &[(BitCoord, T)]) -> Option<T> {
    table
        .iter()
        .find(|(coord, _)| coord.is_set(frame))
        .map(|(_, value)| *value)
}
