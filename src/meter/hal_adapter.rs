// src/meter/hal_adapter.rs

//! Builds a meter interface from embedded-hal parts: a UART receive
//! function, a GPIO driving the ready (DTR) line and a delay provider.

use crate::common::hal_traits::{MeterSerial, MeterTimer};
use core::fmt::Debug;
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Upper bound on bytes drained by one `discard_input` call.
const DISCARD_LIMIT: usize = 64;

/// Electrical level that means "ready to receive".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ReadyPolarity {
    #[default]
    ActiveHigh,
    /// For level shifters that invert the DTR line.
    ActiveLow,
}

/// Microseconds elapsed according to the adapter's own delay accounting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TickInstant(u64);

impl TickInstant {
    pub fn as_micros(&self) -> u64 {
        self.0
    }
}

impl core::ops::Add<Duration> for TickInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        TickInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<TickInstant> for TickInstant {
    type Output = Duration;
    fn sub(self, rhs: TickInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HalInterfaceError<RxE, PinE> {
    Rx(RxE),
    Pin(PinE),
}

/// Meter interface over embedded-hal 1.0 pins and delays.
///
/// `rx` is any non-blocking byte source, typically a closure around the
/// HAL's UART read. The clock only advances through this adapter's delays,
/// which is all the acquisition loop needs for its timeouts.
pub struct HalInterface<RX, PIN, DELAY> {
    rx: RX,
    ready_pin: PIN,
    delay: DELAY,
    polarity: ReadyPolarity,
    elapsed_us: u64,
}

impl<RX, RxE, PIN, DELAY> HalInterface<RX, PIN, DELAY>
where
    RX: FnMut() -> nb::Result<u8, RxE>,
    RxE: Debug,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(rx: RX, ready_pin: PIN, delay: DELAY, polarity: ReadyPolarity) -> Self {
        HalInterface {
            rx,
            ready_pin,
            delay,
            polarity,
            elapsed_us: 0,
        }
    }

    /// Gives back the pin and delay provider.
    pub fn free(self) -> (RX, PIN, DELAY) {
        (self.rx, self.ready_pin, self.delay)
    }
}

impl<RX, RxE, PIN, DELAY> MeterTimer for HalInterface<RX, PIN, DELAY>
where
    RX: FnMut() -> nb::Result<u8, RxE>,
    RxE: Debug,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    type Instant = TickInstant;

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
        self.elapsed_us = self.elapsed_us.saturating_add(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
        self.elapsed_us = self.elapsed_us.saturating_add(ms as u64 * 1000);
    }

    fn now(&self) -> Self::Instant {
        TickInstant(self.elapsed_us)
    }
}

impl<RX, RxE, PIN, DELAY> MeterSerial for HalInterface<RX, PIN, DELAY>
where
    RX: FnMut() -> nb::Result<u8, RxE>,
    RxE: Debug,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    type Error = HalInterfaceError<RxE, PIN::Error>;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        (self.rx)().map_err(|e| e.map(HalInterfaceError::Rx))
    }

    fn discard_input(&mut self) -> Result<(), Self::Error> {
        for _ in 0..DISCARD_LIMIT {
            match (self.rx)() {
                Ok(_) => continue,
                Err(nb::Error::WouldBlock) => return Ok(()),
                Err(nb::Error::Other(e)) => return Err(HalInterfaceError::Rx(e)),
            }
        }
        Ok(())
    }

    fn set_ready_to_receive(&mut self, ready: bool) -> Result<(), Self::Error> {
        let high = match self.polarity {
            ReadyPolarity::ActiveHigh => ready,
            ReadyPolarity::ActiveLow => !ready,
        };
        let result = if high {
            self.ready_pin.set_high()
        } else {
            self.ready_pin.set_low()
        };
        result.map_err(HalInterfaceError::Pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RawFrame;
    use crate::meter::diagnostics::NoDiagnostics;
    use crate::meter::{AcquireConfig, SyncMeter};
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedLine {
        high: Rc<RefCell<bool>>,
        rx: Rc<RefCell<VecDeque<u8>>>,
        pending: Rc<RefCell<Option<[u8; 9]>>>,
    }

    struct MockPin(SharedLine);

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            *self.0.high.borrow_mut() = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            *self.0.high.borrow_mut() = true;
            // The meter starts sending once DTR goes up
            if let Some(packet) = self.0.pending.borrow_mut().take() {
                self.0.rx.borrow_mut().extend(packet);
            }
            Ok(())
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_acquire_through_hal_adapter() {
        let line = SharedLine::default();
        let packet = *RawFrame::from_payload([0, 2, 0, 114, 241, 189, 80, 0]).as_bytes();
        *line.pending.borrow_mut() = Some(packet);

        let rx_line = line.clone();
        let rx = move || -> nb::Result<u8, Infallible> {
            rx_line.rx.borrow_mut().pop_front().ok_or(nb::Error::WouldBlock)
        };
        let iface = HalInterface::new(rx, MockPin(line.clone()), NoopDelay, ReadyPolarity::ActiveHigh);
        let mut meter = SyncMeter::with_config(iface, AcquireConfig::fast(), NoDiagnostics);

        let frame = meter.acquire_frame().unwrap();
        assert_eq!(frame.as_bytes(), &packet);
        assert!(!*line.high.borrow());
        // two settle delays of 300 ms on the virtual clock
        assert!(meter.interface().now().as_micros() >= 600_000);
    }

    #[test]
    fn test_active_low_polarity() {
        let line = SharedLine::default();
        let rx = || -> nb::Result<u8, Infallible> { Err(nb::Error::WouldBlock) };
        let mut iface = HalInterface::new(rx, MockPin(line.clone()), NoopDelay, ReadyPolarity::ActiveLow);

        iface.set_ready_to_receive(true).unwrap();
        assert!(!*line.high.borrow());
        iface.set_ready_to_receive(false).unwrap();
        assert!(*line.high.borrow());
    }
}
