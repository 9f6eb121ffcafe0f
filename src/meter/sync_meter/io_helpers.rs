// src/meter/sync_meter/io_helpers.rs

use super::SyncMeter;
use crate::common::{
    error::MeterError,
    frame::FRAME_LEN,
    hal_traits::{MeterSerial, MeterTimer},
    timing,
};
use crate::meter::cancel::CancelCheck;
use crate::meter::diagnostics::Diagnostics;
use core::time::Duration;
use nb::Result as NbResult;

/// Result of polling a non-blocking operation against a deadline.
pub(super) enum Polled<T> {
    Ready(T),
    TimedOut,
    Cancelled,
}

/// Bytes collected while the ready line was asserted.
pub(super) enum PacketRead {
    Complete([u8; FRAME_LEN]),
    Short(usize),
    Cancelled,
}

impl<IF, D> SyncMeter<IF, D>
where
    IF: MeterSerial + MeterTimer,
    D: Diagnostics,
{
    /// Runs a non-blocking operation (`f`) until it stops returning
    /// `WouldBlock`, the deadline passes or `cancel` fires.
    pub(super) fn poll_until<FN, T, C>(
        &mut self,
        deadline: IF::Instant,
        cancel: &C,
        mut f: FN,
    ) -> Result<Polled<T>, MeterError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
        C: CancelCheck + ?Sized,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(Polled::Ready(result)),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Ok(Polled::TimedOut);
                    }
                    if cancel.is_cancelled() {
                        return Ok(Polled::Cancelled);
                    }
                    self.interface
                        .delay_us(timing::POLL_INTERVAL.as_micros() as u32);
                }
                Err(nb::Error::Other(e)) => return Err(MeterError::Io(e)),
            }
        }
    }

    /// Reads up to nine bytes within the configured read timeout.
    pub(super) fn read_packet<C>(&mut self, cancel: &C) -> Result<PacketRead, MeterError<IF::Error>>
    where
        C: CancelCheck + ?Sized,
    {
        let deadline = self.interface.now() + self.config.read_timeout;
        let mut packet = [0u8; FRAME_LEN];

        for (count, slot) in packet.iter_mut().enumerate() {
            match self.poll_until(deadline, cancel, |iface| iface.read_byte())? {
                Polled::Ready(byte) => *slot = byte,
                Polled::TimedOut => return Ok(PacketRead::Short(count)),
                Polled::Cancelled => return Ok(PacketRead::Cancelled),
            }
        }
        Ok(PacketRead::Complete(packet))
    }

    /// Blocks for `duration`, split into whole milliseconds and a microsecond remainder.
    pub(super) fn delay(&mut self, duration: Duration) {
        let ms = duration.as_millis() as u32;
        let us = duration.subsec_micros() % 1000;
        if ms > 0 {
            self.interface.delay_ms(ms);
        }
        if us > 0 {
            self.interface.delay_us(us);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::*;
    use super::super::{AcquireConfig, SyncMeter};
    use super::*;
    use crate::meter::cancel::NeverCancel;
    use crate::meter::diagnostics::NoDiagnostics;
    use core::cell::Cell;

    fn meter(mock: MockInterface) -> SyncMeter<MockInterface, NoDiagnostics> {
        let config = AcquireConfig {
            settle_delay: Duration::from_millis(1),
            read_timeout: Duration::from_millis(5),
        };
        SyncMeter::with_config(mock, config, NoDiagnostics)
    }

    #[test]
    fn test_poll_until_paths() {
        let mut meter = meter(MockInterface::new());

        // Ok after a few WouldBlocks
        let calls = Cell::new(0);
        let deadline = MockInstant(10_000);
        let result = meter.poll_until(deadline, &NeverCancel, |_| {
            calls.set(calls.get() + 1);
            if calls.get() < 4 { Err(nb::Error::WouldBlock) } else { Ok(123) }
        });
        assert!(matches!(result, Ok(Polled::Ready(123))));
        assert_eq!(meter.interface.current_time_us, 300);

        // Timeout
        meter.interface.current_time_us = 0;
        let result: Result<Polled<()>, _> =
            meter.poll_until(MockInstant(1_000), &NeverCancel, |_| Err(nb::Error::WouldBlock));
        assert!(matches!(result, Ok(Polled::TimedOut)));
        assert_eq!(meter.interface.current_time_us, 1_000);

        // I/O error
        let result: Result<Polled<()>, _> = meter.poll_until(MockInstant(u64::MAX), &NeverCancel, |_| {
            Err(nb::Error::Other(MockCommError))
        });
        assert!(matches!(result, Err(MeterError::Io(MockCommError))));
    }

    #[test]
    fn test_read_packet_short_and_complete() {
        let mut mock = MockInterface::new();
        mock.stage_burst(&[1, 2, 3]);
        mock.stage_burst(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let mut meter = meter(mock);

        meter.interface.set_ready_to_receive(true).unwrap();
        assert!(matches!(meter.read_packet(&NeverCancel), Ok(PacketRead::Short(3))));
        meter.interface.set_ready_to_receive(false).unwrap();

        meter.interface.set_ready_to_receive(true).unwrap();
        match meter.read_packet(&NeverCancel) {
            Ok(PacketRead::Complete(bytes)) => assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8, 9]),
            _ => panic!("expected a complete packet"),
        }
    }

    #[test]
    fn test_delay_split() {
        let mut meter = meter(MockInterface::new());
        meter.delay(Duration::from_micros(2_500));
        assert_eq!(meter.interface.current_time_us, 2_500);
    }
}
