//! Protocol strategies: how each console variant accumulates input and encodes
//! the transmitted snapshot.
//!
//! The synchronization engine ([`crate::engine::PollLoop`],
//! [`crate::trigger::OutputTrigger`]) is generic over [`Protocol`]; the two
//! supported variants are [`PointerProtocol`] and [`JoystickProtocol`].

pub mod joystick;
pub mod pointer;

pub use joystick::JoystickProtocol;
pub use pointer::PointerProtocol;

use core::fmt::Debug;

/// Number of low bits of the shared cell available for a packed state.
pub const PACKED_STATE_BITS: u32 = 48;

/// Which console protocol a strategy speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolKind {
    /// PC-FX mouse: relative motion, one 32-bit word per read.
    Pointer,
    /// XE-1AP analog joystick: absolute axes, six byte-words per read.
    Joystick,
}

/// Lines driven directly from GPIO instead of through the waveform engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectLines {
    /// Wire level of the SELECT line (active-low).
    pub select: bool,
    /// Wire level of the RUN line (active-low).
    pub run: bool,
}

/// Accumulation and encoding strategy for one console protocol.
///
/// Every function is pure: encoding the same state twice yields the same frame.
pub trait Protocol {
    /// Decoded event consumed from the input stack.
    type Event: Copy;
    /// Accumulated / snapshot state.
    type State: Copy + PartialEq + Debug;
    /// Words submitted to the waveform engine for one transaction, in order.
    type Frame: Copy + AsRef<[u32]>;

    /// Variant tag, logged at start-up.
    const KIND: ProtocolKind;

    /// Power-up state for both the accumulator and the snapshot.
    const NEUTRAL: Self::State;

    /// Whether Context A re-pushes the current frame on every tick.
    ///
    /// Only valid for engines that keep the newest queued word; sequence-based
    /// engines would replay out of phase.
    const IDLE_RESUBMIT: bool;

    /// Whether an edge discards queued words before (re)submitting.
    const FLUSH_ON_EDGE: bool;

    /// Fold one event into the accumulated state.
    fn fold(accumulated: &mut Self::State, event: &Self::Event);

    /// Remove what was transmitted from the accumulator after a burst and
    /// return the snapshot to publish next.
    fn reconcile(accumulated: &mut Self::State, sent: Self::State) -> Self::State;

    /// Encode a snapshot into its wire frame.
    fn encode(state: &Self::State) -> Self::Frame;

    /// Pack a state into the low [`PACKED_STATE_BITS`] bits.
    fn pack(state: &Self::State) -> u64;

    /// Inverse of [`Protocol::pack`].
    fn unpack(bits: u64) -> Self::State;

    /// Sensitivity level carried by the event, if the variant has one.
    fn sensitivity(_event: &Self::Event) -> Option<u8> {
        None
    }

    /// Levels for lines the firmware drives itself, derived from the frame.
    fn direct_lines(_frame: &Self::Frame) -> Option<DirectLines> {
        None
    }
}
