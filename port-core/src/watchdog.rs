//! ScanWatchdog: detects the end of a console polling burst.
//!
//! The console reads the port several times per burst. Only the first read
//! takes a snapshot; the rest see exclusion already held. Once the burst
//! timeout has passed since that first read, the watchdog removes what was
//! transmitted from the accumulator and releases exclusion. It is the only
//! path back to [`Phase::Idle`], which also makes it the recovery for lost
//! edges.

use embassy_time::{Duration, Instant};

use crate::aggregator::InputAggregator;
use crate::output::WaveformSink;
use crate::protocol::Protocol;
use crate::shared::{Phase, PollHandle};

/// Result of one watchdog check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogOutcome {
    /// Burst deadline not reached yet.
    Pending,
    /// Deadline reached but a transaction is still being submitted.
    InFlight,
    /// Deadline reached; exclusion is released and the timer re-armed.
    Released {
        /// A transaction happened during the burst and was reconciled.
        reconciled: bool,
    },
}

/// Deadline check run on every poll iteration of Context A.
#[derive(Debug, Clone, Copy)]
pub struct ScanWatchdog {
    timeout: Duration,
}

impl ScanWatchdog {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run the burst-end check at `now`.
    ///
    /// The timeout is strict: elapsed time equal to the threshold is still
    /// part of the burst.
    pub fn check<P: Protocol, S: WaveformSink>(
        &self,
        now: Instant,
        shared: &PollHandle<'_, P>,
        aggregator: &mut InputAggregator<P>,
        sink: &mut S,
    ) -> WatchdogOutcome {
        if shared.scan_elapsed(now) <= self.timeout {
            return WatchdogOutcome::Pending;
        }

        let phase = shared.phase();
        if phase == Phase::Locked {
            return WatchdogOutcome::InFlight;
        }

        if P::IDLE_RESUBMIT {
            for &word in aggregator.frame().as_ref() {
                // Full queue already holds a word the engine will send
                let _ = sink.try_submit(word);
            }
        }

        let reconciled = phase.is_scanned();
        if reconciled {
            let next = aggregator.reconcile(shared.snapshot());
            shared.release(&next);
            #[cfg(feature = "defmt")]
            defmt::trace!("burst end, reconciled");
        }

        shared.rearm(now);
        WatchdogOutcome::Released { reconciled }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::output::SubmitError;
    use crate::protocol::pointer::{encode_word, NEUTRAL_WORD};
    use crate::protocol::PointerProtocol;
    use crate::shared::SharedState;
    use crate::types::{MouseButtons, PointerState};
    use std::vec::Vec;

    #[derive(Default)]
    struct Words(Vec<u32>);

    impl WaveformSink for Words {
        fn try_submit(&mut self, word: u32) -> Result<(), SubmitError> {
            self.0.push(word);
            Ok(())
        }

        async fn submit(&mut self, word: u32) {
            self.0.push(word);
        }

        fn flush(&mut self) {}
    }

    const TIMEOUT: Duration = Duration::from_millis(7);

    fn ms(v: u64) -> Instant {
        Instant::from_millis(v)
    }

    #[test]
    fn test_pending_until_strictly_past_timeout() {
        let mut shared = SharedState::<PointerProtocol>::new(ms(0));
        let (poll, _edge) = shared.split();
        let mut agg = InputAggregator::new();
        let mut sink = Words::default();
        let wd = ScanWatchdog::new(TIMEOUT);

        assert_eq!(wd.check(ms(7), &poll, &mut agg, &mut sink), WatchdogOutcome::Pending);
        assert!(sink.0.is_empty());
        assert_eq!(
            wd.check(ms(8), &poll, &mut agg, &mut sink),
            WatchdogOutcome::Released { reconciled: false }
        );
        assert_eq!(sink.0, [NEUTRAL_WORD]);
        // Re-armed from 8 ms
        assert_eq!(wd.check(ms(15), &poll, &mut agg, &mut sink), WatchdogOutcome::Pending);
    }

    #[test]
    fn test_never_releases_in_flight_transaction() {
        let mut shared = SharedState::<PointerProtocol>::new(ms(0));
        let (poll, edge) = shared.split();
        let mut agg = InputAggregator::new();
        let mut sink = Words::default();
        let wd = ScanWatchdog::new(TIMEOUT);

        edge.try_lock();
        for t in [10, 50, 500] {
            assert_eq!(wd.check(ms(t), &poll, &mut agg, &mut sink), WatchdogOutcome::InFlight);
            assert_eq!(poll.phase(), Phase::Locked);
        }
        assert!(sink.0.is_empty());

        edge.complete();
        assert_eq!(
            wd.check(ms(501), &poll, &mut agg, &mut sink),
            WatchdogOutcome::Released { reconciled: true }
        );
        assert_eq!(poll.phase(), Phase::Idle);
    }

    #[test]
    fn test_reconciles_transmitted_motion() {
        let mut shared = SharedState::<PointerProtocol>::new(ms(0));
        let (poll, edge) = shared.split();
        let mut agg = InputAggregator::<PointerProtocol>::new();
        let mut sink = Words::default();
        let wd = ScanWatchdog::new(TIMEOUT);

        let sent = PointerState {
            x: 10,
            y: -4,
            buttons: MouseButtons::LEFT,
        };
        assert!(poll.try_promote(&sent));
        *agg.accumulated_mut() = sent;
        edge.try_lock();
        edge.complete();

        // Motion that arrived while the burst was in progress
        agg.accumulated_mut().x += 3;
        agg.accumulated_mut().y -= 2;
        agg.accumulated_mut().buttons = MouseButtons::RIGHT;

        assert_eq!(
            wd.check(ms(20), &poll, &mut agg, &mut sink),
            WatchdogOutcome::Released { reconciled: true }
        );
        assert_eq!(
            *agg.accumulated(),
            PointerState {
                x: 3,
                y: -2,
                buttons: MouseButtons::RIGHT
            }
        );
        let next = PointerState {
            x: 0,
            y: 0,
            buttons: MouseButtons::RIGHT,
        };
        assert_eq!(poll.snapshot(), next);
        assert_eq!(agg.frame(), &[encode_word(&next)]);
    }
}
