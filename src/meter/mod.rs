// src/meter/mod.rs

pub mod cancel;
pub mod diagnostics;
pub mod sync_meter;

#[cfg(feature = "impl-generic-hal")]
pub mod hal_adapter;

// Re-export the public driver and its collaborators
pub use cancel::{CancelCheck, NeverCancel};
pub use diagnostics::{AcquireEvent, Diagnostics, LogDiagnostics, NoDiagnostics};
pub use sync_meter::{AcquireConfig, SyncMeter};

#[cfg(feature = "std")]
pub use cancel::CancelToken;

#[cfg(feature = "impl-generic-hal")]
pub use hal_adapter::{HalInterface, HalInterfaceError, ReadyPolarity, TickInstant};
