//! OutputTrigger: the edge-driven half of the bridge (Context B).

use crate::input::{Edge, EdgeSource};
use crate::output::WaveformSink;
use crate::protocol::Protocol;
use crate::shared::EdgeHandle;

/// What an edge did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// First edge of a burst: snapshot read, encoded and submitted.
    Transaction,
    /// Later edge of a burst: state untouched, held frame pushed again.
    Continuation,
}

/// Reads the snapshot once per burst and feeds it to the waveform engine.
pub struct OutputTrigger<'a, P: Protocol> {
    shared: EdgeHandle<'a, P>,
    held: P::Frame,
}

impl<'a, P: Protocol> OutputTrigger<'a, P> {
    pub fn new(shared: EdgeHandle<'a, P>) -> Self {
        Self {
            shared,
            held: P::encode(&P::NEUTRAL),
        }
    }

    /// Frame most recently taken from the snapshot.
    #[must_use]
    pub fn held(&self) -> &P::Frame {
        &self.held
    }

    /// Handle one edge.
    ///
    /// Only the first edge of a burst re-arms the scan timer, so a burst is
    /// released a fixed time after it started however long the console keeps
    /// clocking. Submission waits on backpressure; there is no retry and no
    /// rollback.
    pub async fn on_edge<S: WaveformSink>(&mut self, edge: Edge, sink: &mut S) -> EdgeOutcome {
        if P::FLUSH_ON_EDGE {
            sink.flush();
        }

        let outcome = match self.shared.try_lock() {
            Some(state) => {
                // Re-armed while Locked, before the watchdog can see the burst
                self.shared.rearm(edge.at);
                self.held = P::encode(&state);
                EdgeOutcome::Transaction
            }
            None => EdgeOutcome::Continuation,
        };

        for &word in self.held.as_ref() {
            sink.submit(word).await;
        }

        if outcome == EdgeOutcome::Transaction {
            self.shared.complete();
        }
        outcome
    }

    /// Serve edges forever.
    pub async fn run<E: EdgeSource, S: WaveformSink>(&mut self, edges: &mut E, sink: &mut S) -> ! {
        loop {
            let edge = edges.wait_edge().await;
            let _outcome = self.on_edge(edge, sink).await;
            #[cfg(feature = "defmt")]
            defmt::trace!("edge at {}: {}", edge.at, _outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::output::SubmitError;
    use crate::protocol::joystick::NEUTRAL_WORDS;
    use crate::protocol::pointer::{encode_word, NEUTRAL_WORD};
    use crate::protocol::{JoystickProtocol, PointerProtocol};
    use crate::shared::{Phase, SharedState};
    use crate::types::{MouseButtons, PointerState};
    use embassy_futures::block_on;
    use embassy_time::Instant;
    use std::vec::Vec;

    #[derive(Debug, PartialEq)]
    enum Op {
        Word(u32),
        Flush,
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl WaveformSink for Recorder {
        fn try_submit(&mut self, word: u32) -> Result<(), SubmitError> {
            self.0.push(Op::Word(word));
            Ok(())
        }

        async fn submit(&mut self, word: u32) {
            self.0.push(Op::Word(word));
        }

        fn flush(&mut self) {
            self.0.push(Op::Flush);
        }
    }

    fn edge(us: u64) -> Edge {
        Edge {
            at: Instant::from_micros(us),
        }
    }

    #[test]
    fn test_first_edge_takes_snapshot() {
        let mut shared = SharedState::<PointerProtocol>::new(Instant::from_micros(0));
        let (poll, edge_handle) = shared.split();
        let state = PointerState {
            x: -7,
            y: 12,
            buttons: MouseButtons::LEFT,
        };
        poll.try_promote(&state);

        let mut trigger = OutputTrigger::new(edge_handle);
        let mut sink = Recorder::default();
        let outcome = block_on(trigger.on_edge(edge(100), &mut sink));

        assert_eq!(outcome, EdgeOutcome::Transaction);
        assert_eq!(sink.0, [Op::Word(encode_word(&state))]);
        assert_eq!(poll.phase(), Phase::AwaitingReconciliation);
        assert_eq!(poll.scan_elapsed(Instant::from_micros(100)).as_micros(), 0);
    }

    #[test]
    fn test_later_edges_repeat_held_word() {
        let mut shared = SharedState::<PointerProtocol>::new(Instant::from_micros(0));
        let (poll, edge_handle) = shared.split();
        let mut trigger = OutputTrigger::new(edge_handle);
        let mut sink = Recorder::default();

        block_on(trigger.on_edge(edge(10), &mut sink));
        let moved = PointerState {
            x: 40,
            y: 40,
            buttons: MouseButtons::NONE,
        };
        assert!(!poll.try_promote(&moved));

        assert_eq!(
            block_on(trigger.on_edge(edge(20), &mut sink)),
            EdgeOutcome::Continuation
        );
        assert_eq!(sink.0, [Op::Word(NEUTRAL_WORD), Op::Word(NEUTRAL_WORD)]);
        // The continuation did not move the deadline
        assert_eq!(poll.scan_elapsed(Instant::from_micros(25)).as_micros(), 15);
    }

    #[test]
    fn test_joystick_flushes_before_every_push() {
        let mut shared = SharedState::<JoystickProtocol>::new(Instant::from_micros(0));
        let (_poll, edge_handle) = shared.split();
        let mut trigger = OutputTrigger::new(edge_handle);
        let mut sink = Recorder::default();

        block_on(trigger.on_edge(edge(10), &mut sink));
        block_on(trigger.on_edge(edge(20), &mut sink));

        let mut expected = Vec::new();
        for _ in 0..2 {
            expected.push(Op::Flush);
            expected.extend(NEUTRAL_WORDS.iter().map(|&w| Op::Word(u32::from(w))));
        }
        assert_eq!(sink.0, expected);
    }
}
