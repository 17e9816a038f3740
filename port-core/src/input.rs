//! Input-side traits: decoded events for Context A, hardware edges for Context B.

use core::future::Future;

use embassy_time::Instant;

/// Error type for input adapters.
///
/// The core loop never sees these; adapters log them and drop the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// UART/communication I/O error.
    Io,
    /// Report framing or checksum error.
    Frame,
    /// Queue between the input task and the poll loop is full.
    Overflow,
}

/// Non-blocking source of decoded input events.
///
/// Polled from the busy loop on Context A, so it must return immediately
/// when nothing is pending.
pub trait EventSource<E> {
    /// Take the next pending event, if any.
    fn poll_event(&mut self) -> Option<E>;
}

/// A latch/clock edge observed on the console bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edge {
    /// When the edge was observed.
    pub at: Instant,
}

/// Blocking source of console edges for Context B.
///
/// There is no timeout: a lost edge is recovered by the scan watchdog on the
/// other context, never by cancelling this wait.
pub trait EdgeSource {
    /// Wait for the next edge.
    fn wait_edge(&mut self) -> impl Future<Output = Edge>;
}
