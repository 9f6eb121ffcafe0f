// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Point in time as seen by a [`MeterTimer`].
///
/// Only ordering and duration arithmetic are required, so a tick counter
/// on a microcontroller works as well as `std::time::Instant`.
pub trait MeterInstant:
    Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> MeterInstant for T where
    T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for the delays and clock used by the handshake.
pub trait MeterTimer {
    type Instant: MeterInstant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Current time.
    fn now(&self) -> Self::Instant;
}

/// Abstraction for the meter's half-duplex serial link.
///
/// The meter only talks while the ready-to-receive line (DTR on a PC port)
/// is asserted; nothing is ever written to it.
pub trait MeterSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Drops anything sitting in the receive buffer.
    fn discard_input(&mut self) -> Result<(), Self::Error>;

    /// Asserts (`true`) or releases (`false`) the ready-to-receive line.
    fn set_ready_to_receive(&mut self, ready: bool) -> Result<(), Self::Error>;
}
