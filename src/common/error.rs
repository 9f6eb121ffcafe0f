// src/common/error.rs

use super::segment::Digits;
use arrayvec::ArrayString;

/// Problems with a raw 9-byte packet.
///
/// These are transient: the acquisition loop absorbs them and retries, so
/// callers of [`crate::meter::SyncMeter`] only ever see them through the
/// diagnostics sink.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Packet was not exactly nine bytes long.
    #[error("Invalid frame length: expected 9 bytes, got {got}")]
    InvalidLength { got: usize },

    /// Received checksum byte does not match the calculated one.
    #[error("Checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { expected: u8, calculated: u8 },
}

/// A checksum-valid packet that still cannot be turned into a reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Byte 0 carries a dial position outside 0..=25.
    #[error("Unknown mode ordinal: {0}")]
    UnknownMode(u8),

    /// A digit position holds a segment pattern with no known glyph.
    #[error("Unknown segment pattern at digit position {position}")]
    UnknownGlyph { position: usize },

    /// The display text could not be parsed as a number.
    #[error("Display text is not numeric: '{text}'")]
    NotNumeric { text: ArrayString<8> },

    /// Continuity mode showed neither the open nor the short pattern.
    #[error("Unexpected continuity display: '{0}'")]
    UnexpectedContinuity(Digits),

    /// Temperature mode without a trailing C or F.
    #[error("Temperature display has no scale suffix: '{0}'")]
    MissingTemperatureScale(Digits),
}

#[derive(Debug, thiserror::Error)]
pub enum MeterError<E = ()>
where
    E: core::fmt::Debug, // Debug is enough for the Io message in no_std
{
    /// Underlying serial/line error from the interface implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Acquisition was aborted through the cancellation check.
    #[error("Acquisition cancelled")]
    Cancelled,

    /// A valid frame arrived but could not be interpreted.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

// No blanket `From<E>` here: it would collide with `From<DecodeError>`.
// Interface errors are mapped explicitly with `.map_err(MeterError::Io)`.
