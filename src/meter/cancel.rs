// src/meter/cancel.rs

use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "std")]
use std::sync::Arc;

/// Cooperative cancellation, polled between handshake phases and while
/// waiting for bytes.
pub trait CancelCheck {
    fn is_cancelled(&self) -> bool;
}

/// Never cancels. Used by the plain blocking calls.
#[derive(Debug, Copy, Clone, Default)]
pub struct NeverCancel;

impl CancelCheck for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A flag that another context (interrupt, thread) sets to abort.
impl CancelCheck for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<C: CancelCheck + ?Sized> CancelCheck for &C {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Shareable cancellation flag for threaded hosts.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

#[cfg(feature = "std")]
impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clears the flag so the token can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(feature = "std")]
impl CancelCheck for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}
