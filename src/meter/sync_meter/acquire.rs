// src/meter/sync_meter/acquire.rs

use super::io_helpers::PacketRead;
use super::SyncMeter;
use crate::common::{
    error::MeterError,
    frame::RawFrame,
    hal_traits::{MeterSerial, MeterTimer},
};
use crate::meter::cancel::CancelCheck;
use crate::meter::diagnostics::{AcquireEvent, Diagnostics};

impl<IF, D> SyncMeter<IF, D>
where
    IF: MeterSerial + MeterTimer,
    D: Diagnostics,
{
    /// Repeats the ready-line handshake until a checksum-valid frame arrives.
    ///
    /// One attempt:
    /// 1. discard input, wait the settle delay;
    /// 2. assert ready-to-receive and read nine bytes;
    /// 3. release the line, wait the settle delay, discard input again.
    ///
    /// A short read or checksum failure starts over at step 1.
    pub(super) fn run_acquisition<C>(
        &mut self,
        cancel: &C,
    ) -> Result<RawFrame, MeterError<IF::Error>>
    where
        C: CancelCheck + ?Sized,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.wrapping_add(1);
            self.diagnostics.record(&AcquireEvent::AttemptStarted { attempt });

            // 1. Quiet the line
            self.interface.discard_input().map_err(MeterError::Io)?;
            let settle = self.config.settle_delay;
            self.delay(settle);
            if cancel.is_cancelled() {
                return Err(self.cancelled(attempt));
            }

            // 2. Let the meter talk
            self.interface
                .set_ready_to_receive(true)
                .map_err(MeterError::Io)?;
            let read = self.read_packet(cancel);
            // Release before looking at the outcome, whatever it was
            let released = self
                .interface
                .set_ready_to_receive(false)
                .map_err(MeterError::Io);
            let read = read?;
            released?;

            let bytes = match read {
                PacketRead::Complete(bytes) => bytes,
                PacketRead::Cancelled => return Err(self.cancelled(attempt)),
                PacketRead::Short(got) => {
                    self.diagnostics
                        .record(&AcquireEvent::ShortRead { attempt, got });
                    self.finish_attempt()?;
                    if cancel.is_cancelled() {
                        return Err(self.cancelled(attempt));
                    }
                    continue;
                }
            };

            // 3. Settle and flush whatever followed the packet
            self.finish_attempt()?;

            match RawFrame::new(bytes) {
                Ok(frame) => {
                    self.diagnostics
                        .record(&AcquireEvent::FrameAccepted { attempt, frame });
                    return Ok(frame);
                }
                Err(error) => {
                    self.diagnostics
                        .record(&AcquireEvent::ChecksumMismatch { attempt, error });
                    if cancel.is_cancelled() {
                        return Err(self.cancelled(attempt));
                    }
                }
            }
        }
    }

    fn finish_attempt(&mut self) -> Result<(), MeterError<IF::Error>> {
        let settle = self.config.settle_delay;
        self.delay(settle);
        self.interface.discard_input().map_err(MeterError::Io)
    }

    fn cancelled(&mut self, attempt: u32) -> MeterError<IF::Error> {
        self.diagnostics.record(&AcquireEvent::Cancelled { attempt });
        MeterError::Cancelled
    }
}
