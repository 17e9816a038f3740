//! InputAggregator: folds decoded events into the accumulated state and
//! promotes it to the shared snapshot whenever exclusion allows.

use embassy_time::Instant;

use crate::indicator::{FeedbackIndicator, IndicatorSink};
use crate::protocol::Protocol;
use crate::shared::PollHandle;

/// Accumulated state and the wire frame of the last published snapshot.
///
/// Lives on the poll context only; the edge context never sees it.
pub struct InputAggregator<P: Protocol> {
    accumulated: P::State,
    frame: P::Frame,
}

impl<P: Protocol> InputAggregator<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            accumulated: P::NEUTRAL,
            frame: P::encode(&P::NEUTRAL),
        }
    }

    /// Fold one event, promote if allowed and forward the sensitivity level.
    ///
    /// Returns `true` if the snapshot was promoted.
    pub fn fold<I: IndicatorSink>(
        &mut self,
        event: &P::Event,
        now: Instant,
        shared: &PollHandle<'_, P>,
        indicator: &mut FeedbackIndicator<I>,
    ) -> bool {
        P::fold(&mut self.accumulated, event);
        let promoted = self.promote(shared);
        if let Some(level) = P::sensitivity(event) {
            indicator.request(level, now);
        }
        promoted
    }

    /// Copy the accumulated state into the snapshot if exclusion is not held.
    pub fn promote(&mut self, shared: &PollHandle<'_, P>) -> bool {
        if shared.try_promote(&self.accumulated) {
            self.frame = P::encode(&self.accumulated);
            true
        } else {
            false
        }
    }

    /// Everything known since the last transmitted snapshot.
    #[inline]
    #[must_use]
    pub fn accumulated(&self) -> &P::State {
        &self.accumulated
    }

    #[cfg(test)]
    pub(crate) fn accumulated_mut(&mut self) -> &mut P::State {
        &mut self.accumulated
    }

    /// Frame of the snapshot this context last published.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> &P::Frame {
        &self.frame
    }

    /// Apply burst-end reconciliation and record the resulting frame.
    ///
    /// Returns the snapshot to publish.
    pub(crate) fn reconcile(&mut self, sent: P::State) -> P::State {
        let next = P::reconcile(&mut self.accumulated, sent);
        self.frame = P::encode(&next);
        next
    }
}

impl<P: Protocol> Default for InputAggregator<P> {
    fn default() -> Self {
        Self::new()
    }
}
