//! PIO-backed waveform sink and edge source.
//!
//! Both cores push into the same output state machine. Its TX side lives
//! behind a critical-section mutex, which on the RP2040 is also a hardware
//! spinlock, so a push from one core never interleaves with a flush from the
//! other.

use core::cell::RefCell;

use embassy_futures::yield_now;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::pio::{Instance, StateMachine};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use port_core::{DirectLines, Edge, EdgeSource, SubmitError, WaveformSink};

/// Output state machine shared between the cores.
pub type OutputMachine<'d, PIO, const SM: usize> =
    Mutex<CriticalSectionRawMutex, RefCell<StateMachine<'d, PIO, SM>>>;

/// GPIO lines driven by the poll loop instead of PIO.
pub struct DirectPins<'d> {
    pub select: Output<'d>,
    pub run: Output<'d>,
}

/// One context's handle on the output state machine.
pub struct PioWaveform<'d, PIO: Instance, const SM: usize> {
    sm: &'d OutputMachine<'d, PIO, SM>,
    direct: Option<DirectPins<'d>>,
}

impl<'d, PIO: Instance, const SM: usize> PioWaveform<'d, PIO, SM> {
    #[must_use]
    pub fn new(sm: &'d OutputMachine<'d, PIO, SM>) -> Self {
        Self { sm, direct: None }
    }

    /// Attach the GPIO lines this handle drives every poll iteration.
    #[must_use]
    pub fn with_direct_lines(mut self, pins: DirectPins<'d>) -> Self {
        self.direct = Some(pins);
        self
    }
}

impl<PIO: Instance, const SM: usize> WaveformSink for PioWaveform<'_, PIO, SM> {
    fn try_submit(&mut self, word: u32) -> Result<(), SubmitError> {
        if self.sm.lock(|sm| sm.borrow_mut().tx().try_push(word)) {
            Ok(())
        } else {
            Err(SubmitError::Full)
        }
    }

    async fn submit(&mut self, word: u32) {
        // The lock cannot be held across an await, so retry between yields
        while self.try_submit(word).is_err() {
            yield_now().await;
        }
    }

    fn flush(&mut self) {
        self.sm.lock(|sm| sm.borrow_mut().clear_fifos());
    }

    fn drive_direct(&mut self, lines: DirectLines) {
        if let Some(pins) = self.direct.as_mut() {
            pins.select.set_level(Level::from(lines.select));
            pins.run.set_level(Level::from(lines.run));
        }
    }
}

/// Console edges reported by the clock program.
pub struct PioEdges<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
}

impl<'d, PIO: Instance, const SM: usize> PioEdges<'d, PIO, SM> {
    #[must_use]
    pub fn new(sm: StateMachine<'d, PIO, SM>) -> Self {
        Self { sm }
    }
}

impl<PIO: Instance, const SM: usize> EdgeSource for PioEdges<'_, PIO, SM> {
    async fn wait_edge(&mut self) -> Edge {
        let _ = self.sm.rx().wait_pull().await;
        Edge { at: Instant::now() }
    }
}
