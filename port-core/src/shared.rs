//! State shared between the poll context (core 0) and the edge context (core 1).
//!
//! The snapshot and the exclusion phase live together in one 64-bit atomic
//! cell, so a promotion can never interleave with a transaction read: both are
//! a single compare-exchange on the same word.
//!
//! ```text
//! bit 63..58   57..56   55..48   47..0
//!     unused   phase    unused   packed snapshot
//! ```
//!
//! Write rights are split by handle:
//!
//! | transition                        | handle         |
//! |-----------------------------------|----------------|
//! | snapshot := promoted state        | [`PollHandle`] |
//! | Idle -> Locked                    | [`EdgeHandle`] |
//! | Locked -> AwaitingReconciliation  | [`EdgeHandle`] |
//! | AwaitingReconciliation -> Idle    | [`PollHandle`] |
//! | scan timer re-arm                 | both           |

use core::marker::PhantomData;

use embassy_time::{Duration, Instant};
use portable_atomic::{AtomicU64, Ordering};

use crate::protocol::{Protocol, PACKED_STATE_BITS};

const STATE_MASK: u64 = (1 << PACKED_STATE_BITS) - 1;
const PHASE_SHIFT: u32 = 56;
const PHASE_MASK: u64 = 0b11 << PHASE_SHIFT;

/// Exclusion phase of the shared snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// No transaction since the last release; promotions are allowed.
    Idle = 0,
    /// The edge context is reading and submitting the snapshot.
    Locked = 1,
    /// A transaction finished; further edges in the burst are no-ops until
    /// the watchdog reconciles and releases.
    AwaitingReconciliation = 2,
}

impl Phase {
    #[inline]
    const fn from_bits(cell: u64) -> Self {
        match (cell & PHASE_MASK) >> PHASE_SHIFT {
            0 => Phase::Idle,
            1 => Phase::Locked,
            _ => Phase::AwaitingReconciliation,
        }
    }

    #[inline]
    const fn bits(self) -> u64 {
        (self as u64) << PHASE_SHIFT
    }

    /// Whether the exclusion flag is asserted.
    #[inline]
    #[must_use]
    pub const fn is_excluded(self) -> bool {
        !matches!(self, Phase::Idle)
    }

    /// Whether a transaction happened during the current burst.
    #[inline]
    #[must_use]
    pub const fn is_scanned(self) -> bool {
        matches!(self, Phase::AwaitingReconciliation)
    }
}

/// Shared snapshot, exclusion phase and scan timer.
///
/// Create once (typically in a `StaticCell`), then [`split`](Self::split) into
/// the two context handles.
pub struct SharedState<P: Protocol> {
    cell: AtomicU64,
    scan_timer_us: AtomicU64,
    _protocol: PhantomData<fn() -> P>,
}

impl<P: Protocol> SharedState<P> {
    /// Neutral snapshot, idle phase, scan timer started at `now`.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            cell: AtomicU64::new(Phase::Idle.bits() | (P::pack(&P::NEUTRAL) & STATE_MASK)),
            scan_timer_us: AtomicU64::new(now.as_micros()),
            _protocol: PhantomData,
        }
    }

    /// Split into the poll-side and edge-side handles.
    ///
    /// Taking `&mut self` guarantees each side is handed out only once.
    pub fn split(&mut self) -> (PollHandle<'_, P>, EdgeHandle<'_, P>) {
        let shared: &Self = self;
        (PollHandle { shared }, EdgeHandle { shared })
    }

    #[inline]
    fn load(&self) -> (Phase, P::State) {
        let cell = self.cell.load(Ordering::Acquire);
        (Phase::from_bits(cell), P::unpack(cell & STATE_MASK))
    }

    #[inline]
    fn rearm(&self, at: Instant) {
        self.scan_timer_us.store(at.as_micros(), Ordering::Release);
    }
}

#[inline]
fn compose<P: Protocol>(phase: Phase, state: &P::State) -> u64 {
    let packed = P::pack(state);
    debug_assert_eq!(packed & !STATE_MASK, 0, "packed state overflows the cell");
    phase.bits() | (packed & STATE_MASK)
}

/// Context A's view: promotes, reconciles and releases.
pub struct PollHandle<'a, P: Protocol> {
    shared: &'a SharedState<P>,
}

impl<P: Protocol> PollHandle<'_, P> {
    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.load().0
    }

    /// Current snapshot (the value on the wire).
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> P::State {
        self.shared.load().1
    }

    /// Publish `state` as the new snapshot if exclusion is not held.
    ///
    /// Returns `false`, leaving the snapshot untouched, when the edge context
    /// holds exclusion or takes it concurrently.
    pub fn try_promote(&self, state: &P::State) -> bool {
        let next = compose::<P>(Phase::Idle, state);
        let mut current = self.shared.cell.load(Ordering::Acquire);
        loop {
            if Phase::from_bits(current) != Phase::Idle {
                return false;
            }
            match self.shared.cell.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// End a scanned burst: publish `next` and return to [`Phase::Idle`].
    ///
    /// Only succeeds from [`Phase::AwaitingReconciliation`]; an in-flight
    /// transaction is never released.
    pub fn release(&self, next: &P::State) -> bool {
        let mut current = self.shared.cell.load(Ordering::Acquire);
        loop {
            if Phase::from_bits(current) != Phase::AwaitingReconciliation {
                return false;
            }
            match self.shared.cell.compare_exchange_weak(
                current,
                compose::<P>(Phase::Idle, next),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Time since the scan timer was last re-armed.
    ///
    /// A timestamp newer than `now` (written by the other core after `now` was
    /// sampled) counts as zero.
    #[must_use]
    pub fn scan_elapsed(&self, now: Instant) -> Duration {
        let last = Instant::from_micros(self.shared.scan_timer_us.load(Ordering::Acquire));
        now.checked_duration_since(last).unwrap_or(Duration::from_ticks(0))
    }

    /// Restart the burst deadline from `now`.
    #[inline]
    pub fn rearm(&self, now: Instant) {
        self.shared.rearm(now);
    }
}

/// Context B's view: takes exclusion and reads the snapshot.
pub struct EdgeHandle<'a, P: Protocol> {
    shared: &'a SharedState<P>,
}

impl<P: Protocol> EdgeHandle<'_, P> {
    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.load().0
    }

    /// Take exclusion and read the snapshot in one atomic step.
    ///
    /// Returns `None` if exclusion is already held (later edge of a burst).
    pub fn try_lock(&self) -> Option<P::State> {
        let mut current = self.shared.cell.load(Ordering::Acquire);
        loop {
            if Phase::from_bits(current) != Phase::Idle {
                return None;
            }
            let locked = (current & !PHASE_MASK) | Phase::Locked.bits();
            match self.shared.cell.compare_exchange_weak(
                current,
                locked,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(P::unpack(current & STATE_MASK)),
                Err(actual) => current = actual,
            }
        }
    }

    /// Mark the transaction taken by [`try_lock`](Self::try_lock) as submitted.
    pub fn complete(&self) {
        let locked = Phase::Locked.bits();
        // Only this handle moves out of Locked, so the update cannot be refused.
        let _ = self
            .shared
            .cell
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cell| {
                (cell & PHASE_MASK == locked)
                    .then_some((cell & !PHASE_MASK) | Phase::AwaitingReconciliation.bits())
            });
    }

    /// Restart the burst deadline from the edge time.
    #[inline]
    pub fn rearm(&self, at: Instant) {
        self.shared.rearm(at);
    }
}
