//! Cross-core synchronization, input accumulation and wire encoding for a
//! console controller-port bridge.
//!
//! The bridge runs on two execution contexts:
//!
//! - **Context A** ([`PollLoop`]) busy-polls decoded input events, folds
//!   them into an accumulated state, promotes that state into the shared
//!   snapshot when allowed, runs the [`ScanWatchdog`] and keeps the waveform
//!   engine supplied with the current frame.
//! - **Context B** ([`OutputTrigger`]) blocks on console latch/clock edges and,
//!   once per polling burst, reads the snapshot and submits its frame.
//!
//! The two only meet in [`SharedState`], a single atomic cell holding the
//! snapshot together with the exclusion phase:
//!
//! ```text
//!            promote                 try_lock                complete
//!  Context A ------> [Idle] <--------------+---------> [Locked] -------> [AwaitingReconciliation]
//!                      ^                                                          |
//!                      +--------------------- release (watchdog) ----------------+
//! ```
//!
//! Only the watchdog returns the cell to `Idle`, once the burst timeout has
//! passed since the edge that took the transaction.
//!
//! # Protocols
//!
//! - [`PointerProtocol`]: PC-FX mouse, relative motion, one 32-bit word.
//! - [`JoystickProtocol`]: XE-1AP analog joystick, six byte-words.
//!
//! # Example
//!
//! ```rust
//! use embassy_time::Instant;
//! use port_core::{Phase, PointerProtocol, PointerState, SharedState};
//!
//! let mut shared = SharedState::<PointerProtocol>::new(Instant::from_millis(0));
//! let (poll, edge) = shared.split();
//!
//! let state = PointerState { x: 3, ..PointerState::NEUTRAL };
//! assert!(poll.try_promote(&state));
//! assert_eq!(edge.try_lock(), Some(state));
//! assert!(!poll.try_promote(&PointerState::NEUTRAL));
//! assert_eq!(poll.phase(), Phase::Locked);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and trace logging

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod indicator;
pub mod input;
pub mod output;
pub mod protocol;
pub mod shared;
pub mod trigger;
pub mod types;
pub mod watchdog;

pub use aggregator::InputAggregator;
pub use config::BridgeConfig;
pub use engine::{PollLoop, StepReport};
pub use indicator::{startup_flourish, FeedbackIndicator, FlourishStep, IndicatorColor, IndicatorSink};
pub use input::{Edge, EdgeSource, EventSource, InputError};
pub use output::{SubmitError, WaveformSink};
pub use protocol::{DirectLines, JoystickProtocol, PointerProtocol, Protocol, ProtocolKind};
pub use shared::{EdgeHandle, Phase, PollHandle, SharedState};
pub use trigger::{EdgeOutcome, OutputTrigger};
pub use types::{JoystickButtons, JoystickState, MouseButtons, PointerEvent, PointerState};
pub use watchdog::{ScanWatchdog, WatchdogOutcome};
