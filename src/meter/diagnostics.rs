// src/meter/diagnostics.rs

use crate::common::{FrameError, RawFrame};

/// Outcome of one step of the acquisition loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AcquireEvent {
    AttemptStarted { attempt: u32 },
    /// Fewer than nine bytes arrived before the read timeout.
    ShortRead { attempt: u32, got: usize },
    ChecksumMismatch { attempt: u32, error: FrameError },
    FrameAccepted { attempt: u32, frame: RawFrame },
    Cancelled { attempt: u32 },
}

/// Sink for acquisition events.
pub trait Diagnostics {
    fn record(&mut self, event: &AcquireEvent);
}

/// Discards every event.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {
    fn record(&mut self, _event: &AcquireEvent) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Copy, Clone, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn record(&mut self, event: &AcquireEvent) {
        match event {
            AcquireEvent::AttemptStarted { attempt } => {
                log::debug!("rs22812: acquisition attempt {}", attempt)
            }
            AcquireEvent::ShortRead { attempt, got } => {
                log::debug!("rs22812: attempt {} short read, {} of 9 bytes", attempt, got)
            }
            AcquireEvent::ChecksumMismatch { attempt, error } => {
                log::warn!("rs22812: attempt {} rejected: {}", attempt, error)
            }
            AcquireEvent::FrameAccepted { attempt, frame } => {
                log::trace!("rs22812: attempt {} accepted [{}]", attempt, frame)
            }
            AcquireEvent::Cancelled { attempt } => {
                log::debug!("rs22812: cancelled during attempt {}", attempt)
            }
        }
    }
}

impl<F> Diagnostics for F
where
    F: FnMut(&AcquireEvent),
{
    fn record(&mut self, event: &AcquireEvent) {
        self(event)
    }
}
