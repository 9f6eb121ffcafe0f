// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless std is requested

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod common;
pub mod decoder;
pub mod meter;

#[cfg(feature = "impl-serialport")]
pub mod native;

// Re-export key types for convenience
pub use common::{DecodeError, FrameError, MeterError, Mode, RawFrame};
pub use decoder::{decode, interpret, DecodedFields, FormatOptions, Measurement, Reading};
pub use meter::{AcquireConfig, SyncMeter};
