// src/meter/sync_meter/mod.rs

mod acquire;
mod io_helpers;

use super::cancel::{CancelCheck, NeverCancel};
use super::diagnostics::{Diagnostics, LogDiagnostics};
use crate::common::{
    error::MeterError,
    frame::RawFrame,
    hal_traits::{MeterSerial, MeterTimer},
    timing,
};
use crate::decoder::{self, Measurement};
use core::time::Duration;

/// Tunable handshake timing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AcquireConfig {
    /// Wait after every ready-line toggle.
    pub settle_delay: Duration,
    /// Bound on receiving all nine bytes once the line is asserted.
    pub read_timeout: Duration,
}

impl AcquireConfig {
    /// Shorter settle delay for meters that answer promptly.
    pub const fn fast() -> Self {
        AcquireConfig {
            settle_delay: timing::FAST_SETTLE_DELAY,
            read_timeout: timing::DEFAULT_READ_TIMEOUT,
        }
    }
}

impl Default for AcquireConfig {
    fn default() -> Self {
        AcquireConfig {
            settle_delay: timing::DEFAULT_SETTLE_DELAY,
            read_timeout: timing::DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Blocking driver for one meter connection.
///
/// Owns the interface from construction until [`SyncMeter::release`], so
/// nothing else can toggle the ready line. Every method takes `&mut self`,
/// which keeps a single acquisition in flight.
#[derive(Debug)]
pub struct SyncMeter<IF, D = LogDiagnostics>
where
    IF: MeterSerial + MeterTimer,
    D: Diagnostics,
{
    interface: IF,
    config: AcquireConfig,
    diagnostics: D,
}

impl<IF> SyncMeter<IF, LogDiagnostics>
where
    IF: MeterSerial + MeterTimer,
{
    pub fn new(interface: IF) -> Self {
        SyncMeter::with_config(interface, AcquireConfig::default(), LogDiagnostics)
    }
}

impl<IF, D> SyncMeter<IF, D>
where
    IF: MeterSerial + MeterTimer,
    D: Diagnostics,
{
    pub fn with_config(interface: IF, config: AcquireConfig, diagnostics: D) -> Self {
        SyncMeter {
            interface,
            config,
            diagnostics,
        }
    }

    pub fn config(&self) -> &AcquireConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AcquireConfig) {
        self.config = config;
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    // --- Public Blocking Methods ---

    /// Blocks until a checksum-valid frame arrives.
    ///
    /// Short reads and corrupt frames are retried without limit; only an
    /// interface error ends the loop early.
    pub fn acquire_frame(&mut self) -> Result<RawFrame, MeterError<IF::Error>> {
        self.run_acquisition(&NeverCancel)
    }

    /// Like [`acquire_frame`](Self::acquire_frame), but gives up with
    /// `MeterError::Cancelled` once `cancel` reports true. The ready line is
    /// released before returning.
    pub fn acquire_frame_cancellable<C>(
        &mut self,
        cancel: &C,
    ) -> Result<RawFrame, MeterError<IF::Error>>
    where
        C: CancelCheck + ?Sized,
    {
        self.run_acquisition(cancel)
    }

    /// Acquires a frame and decodes it into a measurement.
    pub fn read_measurement(&mut self) -> Result<Measurement, MeterError<IF::Error>> {
        self.read_measurement_cancellable(&NeverCancel)
    }

    pub fn read_measurement_cancellable<C>(
        &mut self,
        cancel: &C,
    ) -> Result<Measurement, MeterError<IF::Error>>
    where
        C: CancelCheck + ?Sized,
    {
        let frame = self.run_acquisition(cancel)?;
        let fields = decoder::decode(&frame)?;
        Ok(decoder::interpret(&fields)?)
    }

    /// Releases the ready line and hands the interface back.
    pub fn release(mut self) -> IF {
        if let Err(e) = self.interface.set_ready_to_receive(false) {
            log::warn!("rs22812: failed to release ready line: {:?}", e);
        }
        self.interface
    }
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use crate::common::DecodeError;
    use crate::decoder::Reading;
    use crate::meter::diagnostics::{AcquireEvent, NoDiagnostics};
    use core::cell::Cell;
    use core::sync::atomic::AtomicBool;
    use std::vec::Vec;

    fn test_config() -> AcquireConfig {
        AcquireConfig {
            settle_delay: Duration::from_millis(10),
            read_timeout: Duration::from_millis(50),
        }
    }

    // DC V, "1.234" V
    fn good_packet() -> [u8; 9] {
        *RawFrame::from_payload([0, 0b0000_0010, 0, 114, 241, 181 | 0x08, 80, 0]).as_bytes()
    }

    struct CancelAfter {
        remaining: Cell<u32>,
    }

    impl CancelCheck for CancelAfter {
        fn is_cancelled(&self) -> bool {
            match self.remaining.get() {
                0 => true,
                n => {
                    self.remaining.set(n - 1);
                    false
                }
            }
        }
    }

    #[test]
    fn test_meter_construction() {
        let meter = SyncMeter::new(MockInterface::new());
        assert_eq!(*meter.config(), AcquireConfig::default());
        assert_eq!(AcquireConfig::fast().settle_delay, Duration::from_millis(300));
    }

    #[test]
    fn test_acquire_first_attempt() {
        let mut mock = MockInterface::new();
        mock.stage_burst(&good_packet());
        let mut meter = SyncMeter::with_config(mock, test_config(), NoDiagnostics);

        let frame = meter.acquire_frame().unwrap();
        assert_eq!(frame.as_bytes(), &good_packet());

        let mock = meter.release();
        assert_eq!(
            mock.ops,
            [
                LineOp::Discard,
                LineOp::Ready(true),
                LineOp::Ready(false),
                LineOp::Discard,
                LineOp::Ready(false), // release
            ]
        );
        // two settle delays
        assert!(mock.current_time_us >= 20_000);
    }

    #[test]
    fn test_checksum_failure_retries_full_handshake() {
        let mut corrupt = good_packet();
        corrupt[8] = corrupt[8].wrapping_add(1);

        let mut mock = MockInterface::new();
        mock.stage_burst(&corrupt);
        mock.stage_burst(&good_packet());

        let mut events: Vec<AcquireEvent> = Vec::new();
        let mut meter =
            SyncMeter::with_config(mock, test_config(), |e: &AcquireEvent| events.push(*e));
        let frame = meter.acquire_frame().unwrap();
        let mock = meter.release();

        assert_eq!(frame.as_bytes(), &good_packet());
        assert_eq!(mock.count(LineOp::Ready(true)), 2);
        assert_eq!(mock.count(LineOp::Discard), 4);
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], AcquireEvent::AttemptStarted { attempt: 1 });
        assert!(matches!(events[1], AcquireEvent::ChecksumMismatch { attempt: 1, .. }));
        assert_eq!(events[2], AcquireEvent::AttemptStarted { attempt: 2 });
        assert!(matches!(events[3], AcquireEvent::FrameAccepted { attempt: 2, .. }));
    }

    #[test]
    fn test_short_read_retries() {
        let mut mock = MockInterface::new();
        mock.stage_burst(&good_packet()[..5]);
        mock.stage_burst(&good_packet());

        let mut events: Vec<AcquireEvent> = Vec::new();
        let mut meter =
            SyncMeter::with_config(mock, test_config(), |e: &AcquireEvent| events.push(*e));
        assert!(meter.acquire_frame().is_ok());
        drop(meter);

        assert_eq!(events[1], AcquireEvent::ShortRead { attempt: 1, got: 5 });
    }

    #[test]
    fn test_cancel_before_assert() {
        let mut mock = MockInterface::new();
        mock.stage_burst(&good_packet());
        let mut meter = SyncMeter::with_config(mock, test_config(), NoDiagnostics);

        let flag = AtomicBool::new(true);
        let result = meter.acquire_frame_cancellable(&flag);
        assert!(matches!(result, Err(MeterError::Cancelled)));
        assert_eq!(meter.interface().count(LineOp::Ready(true)), 0);
        assert!(!meter.interface().ready);
    }

    #[test]
    fn test_cancel_while_waiting_deasserts_line() {
        // The meter never answers; cancellation arrives mid-read.
        let mock = MockInterface::new();
        let mut meter = SyncMeter::with_config(mock, test_config(), NoDiagnostics);

        let cancel = CancelAfter { remaining: Cell::new(3) };
        let result = meter.acquire_frame_cancellable(&cancel);
        assert!(matches!(result, Err(MeterError::Cancelled)));

        let mock = meter.interface();
        assert_eq!(mock.count(LineOp::Ready(true)), 1);
        assert_eq!(mock.ops.last(), Some(&LineOp::Ready(false)));
        assert!(!mock.ready);
    }

    #[test]
    fn test_io_error_deasserts_line() {
        let mut mock = MockInterface::new();
        mock.fail_reads = true;
        let mut meter = SyncMeter::with_config(mock, test_config(), NoDiagnostics);

        let result = meter.acquire_frame();
        assert!(matches!(result, Err(MeterError::Io(MockCommError))));
        assert_eq!(meter.interface().ops.last(), Some(&LineOp::Ready(false)));
    }

    #[test]
    fn test_read_measurement() {
        let mut mock = MockInterface::new();
        mock.stage_burst(&good_packet());
        let mut meter = SyncMeter::with_config(mock, test_config(), NoDiagnostics);

        let m = meter.read_measurement().unwrap();
        assert_eq!(*m.reading(), Reading::Numeric { value: 1.234, significant_decimals: 3 });
    }

    #[test]
    fn test_read_measurement_decode_error() {
        let mut mock = MockInterface::new();
        mock.stage_burst(RawFrame::from_payload([30, 0, 0, 0, 0, 0, 0, 0]).as_bytes());
        let mut meter = SyncMeter::with_config(mock, test_config(), NoDiagnostics);

        let result = meter.read_measurement();
        assert!(matches!(
            result,
            Err(MeterError::Decode(DecodeError::UnknownMode(30)))
        ));
    }
}
