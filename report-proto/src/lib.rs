//! Framed input reports from the USB-host co-processor.
//!
//! The co-processor owns the USB host stack and forwards already-decoded
//! mouse or joystick reports over UART:
//!
//! ```text
//! 0xA5 | kind | len | payload[len] | crc8
//! ```
//!
//! | kind | payload                                     |
//! |------|---------------------------------------------|
//! | 0x01 | buttons, dx (i8), dy (i8), wheel (i8)        |
//! | 0x02 | buttons (u16 LE), x, y, throttle            |
//!
//! The checksum is CRC-8/SMBUS over kind, length and payload.
//!
//! - [`FrameParser`] decodes the byte stream into [`Report`]s.
//! - [`Serialize`] builds frames (co-processor side, tests).
//! - [`mapping`] turns reports into `port-core` events.
//!
//! # Example
//!
//! ```
//! use report_proto::{FrameParser, Report, Sensitivity};
//!
//! let mut parser = FrameParser::new();
//! let mut sensitivity = Sensitivity::default();
//!
//! for &byte in &[0xA5, 0x01, 0x04, 0x01, 0x05, 0xFB, 0x00, 0xF3] {
//!     if let Ok(Some(Report::Mouse(report))) = parser.push_byte(byte) {
//!         let event = sensitivity.mouse_to_event(&report);
//!         assert_eq!(event.dx, 5);
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod crc;
pub mod mapping;
pub mod parser;
pub mod serialize;
pub mod types;

pub use crc::frame_checksum;
pub use mapping::{joystick_report_to_state, Sensitivity};
pub use parser::{FrameError, FrameParser};
pub use serialize::{Serialize, SerializeError};
pub use types::{JoystickReport, MouseReport, Report, ReportKind, MAX_FRAME, MAX_PAYLOAD, SYNC};
