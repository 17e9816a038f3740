//! USB input to legacy console controller-port bridge for RP2040.
//!
//! A USB-host co-processor forwards decoded mouse or joystick reports over
//! UART. This firmware re-expresses them as the PC-FX mouse or the XE-1AP
//! analog joystick protocol, bit-exact and tear-free.
//!
//! # Architecture
//!
//! - **Core 0** runs the poll loop ([`port_core::PollLoop`]) next to the UART
//!   input task and the status LED task.
//! - **Core 1** runs only the edge task ([`port_core::OutputTrigger`]),
//!   blocked on the console's latch/clock edges.
//!
//! Both cores share one [`port_core::SharedState`] and one PIO output state
//! machine ([`waveform::OutputMachine`]).
//!
//! # Modules
//!
//! - [`config`]: pins, baud rate, timing constants
//! - [`programs`]: PIO programs (edge detector, mouse plex, XE-1AP protocol)
//! - [`waveform`]: [`port_core::WaveformSink`] and [`port_core::EdgeSource`] over PIO
//! - [`input`]: UART report input and the event queue
//! - [`indicator`]: WS2812 sensitivity indicator
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`proto-mouse`** (default): PC-FX mouse
//! - **`proto-xe1ap`**: XE-1AP analog joystick

#![no_std]

// Ensure exactly one console protocol is selected
#[cfg(all(feature = "proto-mouse", feature = "proto-xe1ap"))]
compile_error!("Cannot enable both `proto-mouse` and `proto-xe1ap` features - they drive the same port");

#[cfg(not(any(feature = "proto-mouse", feature = "proto-xe1ap")))]
compile_error!("Enable one of the `proto-mouse` or `proto-xe1ap` features");

pub mod config;
pub mod indicator;
pub mod input;
pub mod programs;
pub mod waveform;

pub use indicator::{ColorSignal, SignalIndicator, StatusLed};
pub use input::{forward_reports, ChannelEvents, EventChannel, JoystickMapper, ReportMapper, UartReports};
pub use waveform::{DirectPins, OutputMachine, PioEdges, PioWaveform};
