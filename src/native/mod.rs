// src/native/mod.rs

// Host-side pieces: serial port access, configuration and the sampling thread.
pub mod config;
pub mod sampler;
pub mod serial;

pub use config::{AcquisitionPeriod, ConfigError, MeterConfig, PeriodUnit};
pub use sampler::{Sample, Sampler};
pub use serial::SerialPortInterface;
