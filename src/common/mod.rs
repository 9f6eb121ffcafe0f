// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod checksum;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod segment;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From checksum.rs
pub use checksum::{calculate_checksum, is_valid, verify_frame};

// From error.rs
pub use error::{DecodeError, FrameError, MeterError};

// From frame.rs
pub use frame::{RawFrame, SerialSettings, FRAME_LEN};

// From hal_traits.rs
pub use hal_traits::{MeterInstant, MeterSerial, MeterTimer};

// From segment.rs
pub use segment::{Digits, Glyph};

// From types.rs
pub use types::{Mode, Scale, Sign, TemperatureScale, Units};

// Timing constants stay under common::timing::*
