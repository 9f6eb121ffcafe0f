// src/common/timing.rs

use core::time::Duration;

use super::frame::FRAME_LEN;

// === Line Timing (4800 baud, 8N1) ===

/// Nominal duration of one character: 10 bits at 4800 baud (~2.083 ms).
pub const BYTE_DURATION: Duration = Duration::from_micros(2084); // 10 / 4800 s, rounded up
/// Nominal time for a full 9-byte packet on the wire.
pub const FRAME_DURATION: Duration = Duration::from_micros(2084 * FRAME_LEN as u64);

// === Handshake Timing ===

/// Wait after each ready-line toggle and after discarding input.
/// The meter streams a packet about once per second, so one second after
/// the discard a fresh packet is already waiting in the receive buffer.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);
/// Shorter settle delay, usable with meters that respond promptly.
pub const FAST_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Extra allowance on top of the packet time when reading.
pub const READ_MARGIN: Duration = Duration::from_millis(100);
/// Bound on reading a packet once the line is asserted: the buffered
/// packet drains at once, the margin covers one still on the wire.
pub const DEFAULT_READ_TIMEOUT: Duration =
    Duration::from_micros(2084 * FRAME_LEN as u64 + 100_000); // FRAME_DURATION + READ_MARGIN

/// Poll interval while a non-blocking read reports `WouldBlock`.
pub const POLL_INTERVAL: Duration = Duration::from_micros(100);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_timeout_covers_frame() {
        assert_eq!(DEFAULT_READ_TIMEOUT, FRAME_DURATION + READ_MARGIN);
        assert!(BYTE_DURATION * 9 <= FRAME_DURATION);
        assert!(FAST_SETTLE_DELAY < DEFAULT_SETTLE_DELAY);
    }

    #[test]
    fn test_packet_buffered_before_read() {
        // a packet lands during the settle delay, the read only drains it
        assert!(DEFAULT_READ_TIMEOUT < FAST_SETTLE_DELAY);
        assert!(FRAME_DURATION < READ_MARGIN);
    }
}
