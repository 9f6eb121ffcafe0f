// src/native/config.rs

use super::serial::SerialPortInterface;
use crate::meter::{AcquireConfig, LogDiagnostics, SyncMeter};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Serial port path is empty")]
    EmptyPort,

    #[error("Invalid acquisition period: '{0}'")]
    InvalidPeriod(String),

    #[error("Acquisition period must be positive and finite, got {0}")]
    NonPositivePeriod(f64),

    #[error("Unknown period unit: '{0}'")]
    UnknownUnit(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PeriodUnit {
    Seconds,
    Minutes,
    Hours,
}

impl PeriodUnit {
    fn seconds(self) -> f64 {
        match self {
            PeriodUnit::Seconds => 1.0,
            PeriodUnit::Minutes => 60.0,
            PeriodUnit::Hours => 3600.0,
        }
    }
}

impl FromStr for PeriodUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(PeriodUnit::Seconds),
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(PeriodUnit::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(PeriodUnit::Hours),
            other => Err(ConfigError::UnknownUnit(other.to_string())),
        }
    }
}

/// Time between the start of two consecutive readings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AcquisitionPeriod(Duration);

impl AcquisitionPeriod {
    pub fn new(value: f64, unit: PeriodUnit) -> Result<Self, ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::NonPositivePeriod(value));
        }
        Duration::try_from_secs_f64(value * unit.seconds())
            .map(AcquisitionPeriod)
            .map_err(|_| ConfigError::InvalidPeriod(value.to_string()))
    }

    pub fn from_duration(duration: Duration) -> Result<Self, ConfigError> {
        if duration.is_zero() {
            return Err(ConfigError::NonPositivePeriod(0.0));
        }
        Ok(AcquisitionPeriod(duration))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for AcquisitionPeriod {
    fn default() -> Self {
        AcquisitionPeriod(Duration::from_secs(1))
    }
}

/// Accepts `"<number> <unit>"`, `"<number><unit>"` or a bare number of seconds.
impl FromStr for AcquisitionPeriod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Unit is the trailing run of letters, so "1e3 s" keeps its exponent
        let split = trimmed
            .trim_end_matches(|c: char| c.is_ascii_alphabetic())
            .len();
        let (number, unit) = trimmed.split_at(split);

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPeriod(s.to_string()))?;
        let unit = if unit.is_empty() {
            PeriodUnit::Seconds
        } else {
            unit.parse()?
        };
        AcquisitionPeriod::new(value, unit)
    }
}

impl fmt::Display for AcquisitionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.0.as_secs_f64())
    }
}

/// Everything needed to start logging from one meter.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterConfig {
    pub port: String,
    pub period: AcquisitionPeriod,
    pub acquire: AcquireConfig,
}

impl MeterConfig {
    pub fn new(port: impl Into<String>, period: AcquisitionPeriod) -> Result<Self, ConfigError> {
        let port = port.into();
        if port.trim().is_empty() {
            return Err(ConfigError::EmptyPort);
        }
        Ok(MeterConfig {
            port,
            period,
            acquire: AcquireConfig::default(),
        })
    }

    pub fn with_acquire(mut self, acquire: AcquireConfig) -> Self {
        self.acquire = acquire;
        self
    }

    /// Opens the port and wraps it in a logging meter driver.
    pub fn open(&self) -> Result<SyncMeter<SerialPortInterface>, serialport::Error> {
        let interface = SerialPortInterface::open(&self.port)?;
        Ok(SyncMeter::with_config(interface, self.acquire, LogDiagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_units() {
        let p: AcquisitionPeriod = "5 seconds".parse().unwrap();
        assert_eq!(p.as_duration(), Duration::from_secs(5));
        let p: AcquisitionPeriod = "2min".parse().unwrap();
        assert_eq!(p.as_duration(), Duration::from_secs(120));
        let p: AcquisitionPeriod = "0.5 h".parse().unwrap();
        assert_eq!(p.as_duration(), Duration::from_secs(1800));
        let p: AcquisitionPeriod = " 1.5 ".parse().unwrap();
        assert_eq!(p.as_duration(), Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_period_exponent() {
        let p: AcquisitionPeriod = "1e3 s".parse().unwrap();
        assert_eq!(p.as_duration(), Duration::from_secs(1000));
        let p: AcquisitionPeriod = "2.5e-1min".parse().unwrap();
        assert_eq!(p.as_duration(), Duration::from_secs(15));
        let p: AcquisitionPeriod = "1e1".parse().unwrap();
        assert_eq!(p.as_duration(), Duration::from_secs(10));
        assert!(matches!(
            "1e s".parse::<AcquisitionPeriod>(),
            Err(ConfigError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_reject_bad_periods() {
        assert_eq!(
            "0 s".parse::<AcquisitionPeriod>(),
            Err(ConfigError::NonPositivePeriod(0.0))
        );
        assert_eq!(
            "-3 minutes".parse::<AcquisitionPeriod>(),
            Err(ConfigError::NonPositivePeriod(-3.0))
        );
        assert!(matches!(
            "ten seconds".parse::<AcquisitionPeriod>(),
            Err(ConfigError::InvalidPeriod(_))
        ));
        assert_eq!(
            "3 fortnights".parse::<AcquisitionPeriod>(),
            Err(ConfigError::UnknownUnit("fortnights".to_string()))
        );
        assert!(AcquisitionPeriod::new(f64::INFINITY, PeriodUnit::Seconds).is_err());
        assert!(AcquisitionPeriod::from_duration(Duration::ZERO).is_err());
    }

    #[test]
    fn test_meter_config() {
        assert_eq!(
            MeterConfig::new("  ", AcquisitionPeriod::default()),
            Err(ConfigError::EmptyPort)
        );
        let cfg = MeterConfig::new("/dev/ttyUSB0", AcquisitionPeriod::default())
            .unwrap()
            .with_acquire(AcquireConfig::fast());
        assert_eq!(cfg.acquire, AcquireConfig::fast());
        assert_eq!(cfg.period.as_duration(), Duration::from_secs(1));
    }
}
