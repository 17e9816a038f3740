//! Output-side trait: the hardware waveform engine.

use core::future::Future;

use crate::protocol::DirectLines;

/// Error type for non-blocking submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubmitError {
    /// Transmit queue is full; the word was dropped.
    Full,
}

/// Hardware engine that turns submitted words into timed signal transitions.
///
/// Both contexts push into the same engine, so implementations must be safe
/// to share between cores (the firmware guards the queue with a
/// critical-section mutex).
pub trait WaveformSink {
    /// Queue a word without waiting. Dropped with [`SubmitError::Full`] when
    /// the queue has no room.
    fn try_submit(&mut self, word: u32) -> Result<(), SubmitError>;

    /// Queue a word, waiting for room.
    fn submit(&mut self, word: u32) -> impl Future<Output = ()>;

    /// Discard every queued word that has not started shifting out.
    fn flush(&mut self);

    /// Drive lines that bypass the engine. Ignored by engines without any.
    fn drive_direct(&mut self, _lines: DirectLines) {}
}

impl<T: WaveformSink> WaveformSink for &mut T {
    fn try_submit(&mut self, word: u32) -> Result<(), SubmitError> {
        T::try_submit(self, word)
    }

    fn submit(&mut self, word: u32) -> impl Future<Output = ()> {
        T::submit(self, word)
    }

    fn flush(&mut self) {
        T::flush(self)
    }

    fn drive_direct(&mut self, lines: DirectLines) {
        T::drive_direct(self, lines)
    }
}
