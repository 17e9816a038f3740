//! PollLoop: the busy-polling half of the bridge (Context A).

use embassy_time::Instant;

use crate::aggregator::InputAggregator;
use crate::config::BridgeConfig;
use crate::indicator::{FeedbackIndicator, IndicatorSink};
use crate::input::EventSource;
use crate::output::WaveformSink;
use crate::protocol::Protocol;
use crate::shared::PollHandle;
use crate::watchdog::{ScanWatchdog, WatchdogOutcome};

/// Summary of one iteration, mostly for tests and tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Events folded this iteration.
    pub events: usize,
    /// Whether any of them reached the snapshot.
    pub promoted: bool,
    pub watchdog: WatchdogOutcome,
}

/// Owns everything Context A touches and runs one iteration per [`step`](Self::step).
pub struct PollLoop<'a, P: Protocol, S, I> {
    aggregator: InputAggregator<P>,
    watchdog: ScanWatchdog,
    shared: PollHandle<'a, P>,
    sink: S,
    indicator: FeedbackIndicator<I>,
    config: BridgeConfig,
}

impl<'a, P, S, I> PollLoop<'a, P, S, I>
where
    P: Protocol,
    S: WaveformSink,
    I: IndicatorSink,
{
    pub fn new(shared: PollHandle<'a, P>, sink: S, indicator: I, config: BridgeConfig, now: Instant) -> Self {
        Self {
            aggregator: InputAggregator::new(),
            watchdog: ScanWatchdog::new(config.burst_timeout),
            shared,
            sink,
            indicator: FeedbackIndicator::new(indicator, config.initial_level, now, config.indicator_interval),
            config,
        }
    }

    /// One iteration: drain events, check the burst deadline, resubmit.
    pub fn step<E: EventSource<P::Event>>(&mut self, now: Instant, source: &mut E) -> StepReport {
        let mut events = 0;
        let mut promoted = false;
        while events < self.config.max_events_per_tick {
            let Some(event) = source.poll_event() else {
                break;
            };
            promoted |= self
                .aggregator
                .fold(&event, now, &self.shared, &mut self.indicator);
            events += 1;
        }

        let watchdog = self
            .watchdog
            .check(now, &self.shared, &mut self.aggregator, &mut self.sink);
        self.tick();

        StepReport {
            events,
            promoted,
            watchdog,
        }
    }

    /// Keep the engine supplied with the current frame and drive direct lines.
    ///
    /// Resubmission only happens outside a burst: while exclusion is held the
    /// edge context owns what goes on the wire.
    pub fn tick(&mut self) {
        let frame = self.aggregator.frame();
        if P::IDLE_RESUBMIT && !self.shared.phase().is_excluded() {
            for &word in frame.as_ref() {
                // Dropped words are fine, the engine keeps the newest one
                let _ = self.sink.try_submit(word);
            }
        }
        if let Some(lines) = P::direct_lines(frame) {
            self.sink.drive_direct(lines);
        }
    }

    /// Loop forever, yielding to the other tasks on this core between iterations.
    pub async fn run<E: EventSource<P::Event>>(&mut self, source: &mut E) -> ! {
        loop {
            let _report = self.step(Instant::now(), source);
            #[cfg(feature = "defmt")]
            if _report.promoted {
                defmt::trace!("promoted after {} events", _report.events);
            }
            embassy_futures::yield_now().await;
        }
    }

    pub fn aggregator(&self) -> &InputAggregator<P> {
        &self.aggregator
    }

    pub fn indicator(&self) -> &FeedbackIndicator<I> {
        &self.indicator
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
