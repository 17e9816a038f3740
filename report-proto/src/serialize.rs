//! Report serialization, the co-processor side of the link.
//!
//! # Example
//!
//! ```
//! use report_proto::{FrameParser, MouseReport, Report, Serialize};
//!
//! let report = Report::Mouse(MouseReport { buttons: 1, dx: 3, dy: -2, wheel: 0 });
//! let mut buf = [0u8; 16];
//! let len = report.serialize(&mut buf).unwrap();
//!
//! let mut parser = FrameParser::new();
//! assert_eq!(parser.push_slice(&buf[..len]), Some(report));
//! ```

use crate::crc::frame_checksum;
use crate::types::{Report, FRAME_OVERHEAD, MAX_FRAME, MAX_PAYLOAD, SYNC};

/// Error type for serialization operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the frame.
    BufferTooSmall,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
        }
    }
}

/// Serialize a report into a complete frame.
pub trait Serialize {
    /// Serialize to the provided buffer, returning the frame length.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the buffer is not large enough.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError>;

    /// Serialize to a `heapless::Vec` sized for the largest frame.
    fn serialize_to_vec(&self) -> Result<heapless::Vec<u8, MAX_FRAME>, SerializeError> {
        let mut vec = heapless::Vec::new();
        vec.resize(MAX_FRAME, 0)
            .map_err(|_| SerializeError::BufferTooSmall)?;
        let len = self.serialize(&mut vec)?;
        vec.truncate(len);
        Ok(vec)
    }
}

impl Serialize for Report {
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut payload = [0u8; MAX_PAYLOAD];
        let len = match self {
            Report::Mouse(m) => {
                payload[..4].copy_from_slice(&[m.buttons, m.dx as u8, m.dy as u8, m.wheel as u8]);
                4
            }
            Report::Joystick(j) => {
                let [lo, hi] = j.buttons.to_le_bytes();
                payload[..5].copy_from_slice(&[lo, hi, j.x, j.y, j.throttle]);
                5
            }
        };
        if buf.len() < len + FRAME_OVERHEAD {
            return Err(SerializeError::BufferTooSmall);
        }

        let kind = self.kind() as u8;
        let payload = &payload[..len];
        buf[..3].copy_from_slice(&[SYNC, kind, len as u8]);
        buf[3..3 + len].copy_from_slice(payload);
        buf[3 + len] = frame_checksum(kind, payload);
        Ok(len + FRAME_OVERHEAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JoystickReport, MouseReport};

    #[test]
    fn test_mouse_frame_bytes() {
        let report = Report::Mouse(MouseReport {
            buttons: 0x01,
            dx: 5,
            dy: -5,
            wheel: 0,
        });
        let mut buf = [0u8; 16];
        let len = report.serialize(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[0xA5, 0x01, 0x04, 0x01, 0x05, 0xFB, 0x00, 0xF3]);
    }

    #[test]
    fn test_joystick_frame_bytes() {
        let report = Report::Joystick(JoystickReport {
            buttons: 0x0141,
            x: 0x00,
            y: 0xFF,
            throttle: 0x80,
        });
        let vec = report.serialize_to_vec().unwrap();
        assert_eq!(&vec[..], &[0xA5, 0x02, 0x05, 0x41, 0x01, 0x00, 0xFF, 0x80, 0xD6]);
    }

    #[test]
    fn test_buffer_too_small() {
        let report = Report::Mouse(MouseReport::default());
        let mut buf = [0u8; 7];
        assert_eq!(report.serialize(&mut buf), Err(SerializeError::BufferTooSmall));
    }
}
