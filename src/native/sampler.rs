// src/native/sampler.rs

use super::config::AcquisitionPeriod;
use crate::common::{DecodeError, MeterError, MeterSerial, MeterTimer};
use crate::decoder::Measurement;
use crate::meter::{CancelCheck, CancelToken, Diagnostics, SyncMeter};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// One result pushed by the sampler thread.
#[derive(Debug)]
pub enum Sample<E> {
    Measurement { index: u64, measurement: Measurement },
    /// A valid frame that could not be interpreted; sampling continues.
    DecodeFailed { index: u64, error: DecodeError },
    /// The interface failed; this is the last sample.
    Disconnected(E),
}

/// Reads a meter at a fixed period on a dedicated thread.
///
/// Samples arrive on the receiver returned by [`Sampler::spawn`]. Dropping
/// the sampler or calling [`Sampler::stop`] cancels any acquisition in
/// progress, which releases the ready line before the thread exits.
pub struct Sampler<IF, D>
where
    IF: MeterSerial + MeterTimer,
    D: Diagnostics,
{
    cancel: CancelToken,
    handle: Option<JoinHandle<SyncMeter<IF, D>>>,
}

impl<IF, D> Sampler<IF, D>
where
    IF: MeterSerial + MeterTimer + Send + 'static,
    IF::Error: Send + 'static,
    D: Diagnostics + Send + 'static,
{
    pub fn spawn(
        mut meter: SyncMeter<IF, D>,
        period: AcquisitionPeriod,
    ) -> std::io::Result<(Self, flume::Receiver<Sample<IF::Error>>)> {
        let (tx, rx) = flume::unbounded();
        let cancel = CancelToken::new();
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name("rs22812-sampler".into())
            .spawn(move || {
                log::info!("rs22812: sampling every {}", period);
                let mut index: u64 = 0;
                loop {
                    let started = Instant::now();
                    let sample = match meter.read_measurement_cancellable(&token) {
                        Ok(measurement) => Sample::Measurement { index, measurement },
                        Err(MeterError::Decode(error)) => {
                            log::warn!("rs22812: reading {} not decodable: {}", index, error);
                            Sample::DecodeFailed { index, error }
                        }
                        Err(MeterError::Cancelled) => break,
                        Err(MeterError::Io(e)) => {
                            log::error!("rs22812: connection lost: {:?}", e);
                            let _ = tx.send(Sample::Disconnected(e));
                            break;
                        }
                    };
                    if tx.send(sample).is_err() {
                        log::debug!("rs22812: sample receiver dropped");
                        break;
                    }
                    index += 1;

                    let deadline = started + period.as_duration();
                    loop {
                        let now = Instant::now();
                        if token.is_cancelled() || now >= deadline {
                            break;
                        }
                        thread::park_timeout(deadline - now);
                    }
                    if token.is_cancelled() {
                        break;
                    }
                }
                log::info!("rs22812: sampler stopped after {} readings", index);
                meter
            })?;

        Ok((
            Sampler {
                cancel,
                handle: Some(handle),
            },
            rx,
        ))
    }

    /// Stops the thread and returns the meter it was driving.
    ///
    /// `None` if the sampler thread panicked.
    pub fn stop(mut self) -> Option<SyncMeter<IF, D>> {
        self.shutdown()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<IF, D> Sampler<IF, D>
where
    IF: MeterSerial + MeterTimer,
    D: Diagnostics,
{
    fn shutdown(&mut self) -> Option<SyncMeter<IF, D>> {
        let handle = self.handle.take()?;
        self.cancel.cancel();
        handle.thread().unpark();
        handle.join().ok()
    }
}

impl<IF, D> Drop for Sampler<IF, D>
where
    IF: MeterSerial + MeterTimer,
    D: Diagnostics,
{
    fn drop(&mut self) {
        if let Some(meter) = self.shutdown() {
            drop(meter.release());
        }
    }
}
