//! Byte-wise report frame parser.
//!
//! ```text
//! 0xA5 | kind | len | payload[len] | crc8
//! ```
//!
//! The checksum is CRC-8/SMBUS over `kind`, `len` and the payload. Bytes
//! before a sync byte are skipped, so the parser locks on mid-stream.

use heapless::Vec;

use crate::crc::frame_checksum;
use crate::types::{JoystickReport, MouseReport, Report, ReportKind, MAX_PAYLOAD, SYNC};

/// Frame-level error. The parser has already resynchronised when one is
/// returned; the caller only decides whether to log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Declared payload length exceeds [`MAX_PAYLOAD`].
    Oversize(u8),
    /// Checksum mismatch.
    Checksum,
    /// Valid frame of a kind this firmware does not handle.
    UnknownKind(u8),
    /// Known kind with the wrong payload length.
    Length { kind: u8, len: u8 },
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Oversize(len) => write!(f, "payload length {len} too large"),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::UnknownKind(kind) => write!(f, "unknown report kind {kind:#04x}"),
            Self::Length { kind, len } => write!(f, "kind {kind:#04x} with length {len}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParserState {
    WaitingForSync,
    ReadingKind,
    ReadingLength { kind: u8 },
    ReadingPayload { kind: u8, len: u8 },
    ReadingChecksum { kind: u8, len: u8 },
}

/// Incremental frame parser.
pub struct FrameParser {
    payload: Vec<u8, MAX_PAYLOAD>,
    state: ParserState,
}

impl FrameParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            payload: Vec::new(),
            state: ParserState::WaitingForSync,
        }
    }

    /// Drop any partial frame and wait for the next sync byte.
    pub fn reset(&mut self) {
        self.payload.clear();
        self.state = ParserState::WaitingForSync;
    }

    /// Feed a byte to the parser.
    ///
    /// Returns `Ok(Some(report))` when the byte completes a valid frame.
    pub fn push_byte(&mut self, byte: u8) -> Result<Option<Report>, FrameError> {
        match self.state {
            ParserState::WaitingForSync => {
                if byte == SYNC {
                    self.state = ParserState::ReadingKind;
                }
                Ok(None)
            }
            ParserState::ReadingKind => {
                self.state = ParserState::ReadingLength { kind: byte };
                Ok(None)
            }
            ParserState::ReadingLength { kind } => {
                if byte as usize > MAX_PAYLOAD {
                    self.reset();
                    return Err(FrameError::Oversize(byte));
                }
                self.state = if byte == 0 {
                    ParserState::ReadingChecksum { kind, len: 0 }
                } else {
                    ParserState::ReadingPayload { kind, len: byte }
                };
                Ok(None)
            }
            ParserState::ReadingPayload { kind, len } => {
                // Length was checked against the capacity above
                let _ = self.payload.push(byte);
                if self.payload.len() == len as usize {
                    self.state = ParserState::ReadingChecksum { kind, len };
                }
                Ok(None)
            }
            ParserState::ReadingChecksum { kind, len } => {
                let result = if frame_checksum(kind, &self.payload) == byte {
                    decode(kind, len, &self.payload).map(Some)
                } else {
                    Err(FrameError::Checksum)
                };
                self.reset();
                result
            }
        }
    }

    /// Feed a slice, returning the last complete report in it.
    ///
    /// Errors inside the slice are skipped.
    pub fn push_slice(&mut self, bytes: &[u8]) -> Option<Report> {
        bytes
            .iter()
            .filter_map(|&b| self.push_byte(b).ok().flatten())
            .last()
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(kind: u8, len: u8, payload: &[u8]) -> Result<Report, FrameError> {
    let kind = ReportKind::try_from(kind).map_err(FrameError::UnknownKind)?;
    if payload.len() != kind.payload_len() {
        return Err(FrameError::Length {
            kind: kind as u8,
            len,
        });
    }
    Ok(match kind {
        ReportKind::Mouse => Report::Mouse(MouseReport {
            buttons: payload[0],
            dx: payload[1] as i8,
            dy: payload[2] as i8,
            wheel: payload[3] as i8,
        }),
        ReportKind::Joystick => Report::Joystick(JoystickReport {
            buttons: u16::from_le_bytes([payload[0], payload[1]]),
            x: payload[2],
            y: payload[3],
            throttle: payload[4],
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut FrameParser, bytes: &[u8]) -> Result<Option<Report>, FrameError> {
        let mut last = Ok(None);
        for &b in bytes {
            last = parser.push_byte(b);
            if !matches!(last, Ok(None)) {
                break;
            }
        }
        last
    }

    #[test]
    fn test_parse_mouse_frame() {
        let mut parser = FrameParser::new();
        let frame = [0xA5, 0x01, 0x04, 0x01, 0x05, 0xFB, 0x00, 0xF3];
        assert_eq!(
            feed(&mut parser, &frame),
            Ok(Some(Report::Mouse(MouseReport {
                buttons: 0x01,
                dx: 5,
                dy: -5,
                wheel: 0,
            })))
        );
    }

    #[test]
    fn test_parse_joystick_frame() {
        let mut parser = FrameParser::new();
        let frame = [0xA5, 0x02, 0x05, 0x41, 0x01, 0x00, 0xFF, 0x80, 0xD6];
        assert_eq!(
            feed(&mut parser, &frame),
            Ok(Some(Report::Joystick(JoystickReport {
                buttons: 0x0141,
                x: 0x00,
                y: 0xFF,
                throttle: 0x80,
            })))
        );
    }

    #[test]
    fn test_skips_garbage_before_sync() {
        let mut parser = FrameParser::new();
        let stream = [0x00, 0x13, 0xFF, 0xA5, 0x01, 0x04, 0x00, 0x00, 0x00, 0x00, 0xA6];
        assert_eq!(
            parser.push_slice(&stream),
            Some(Report::Mouse(MouseReport::default()))
        );
    }

    #[test]
    fn test_checksum_mismatch_resyncs() {
        let mut parser = FrameParser::new();
        let bad = [0xA5, 0x01, 0x04, 0x01, 0x05, 0xFB, 0x00, 0xF2];
        assert_eq!(feed(&mut parser, &bad), Err(FrameError::Checksum));

        let good = [0xA5, 0x01, 0x04, 0x01, 0x05, 0xFB, 0x00, 0xF3];
        assert!(matches!(feed(&mut parser, &good), Ok(Some(Report::Mouse(_)))));
    }

    #[test]
    fn test_oversize_length_rejected_early() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.push_byte(0xA5), Ok(None));
        assert_eq!(parser.push_byte(0x01), Ok(None));
        assert_eq!(parser.push_byte(0x40), Err(FrameError::Oversize(0x40)));
        assert_eq!(parser.state, ParserState::WaitingForSync);
    }

    #[test]
    fn test_unknown_kind_reported() {
        let mut parser = FrameParser::new();
        assert_eq!(
            feed(&mut parser, &[0xA5, 0x03, 0x00, 0x3F]),
            Err(FrameError::UnknownKind(0x03))
        );
    }

    #[test]
    fn test_wrong_length_for_kind() {
        let mut parser = FrameParser::new();
        // Mouse kind with a joystick-sized payload
        let payload = [0x41, 0x01, 0x00, 0xFF, 0x80];
        let mut frame = [0u8; 9];
        frame[..3].copy_from_slice(&[0xA5, 0x01, 0x05]);
        frame[3..8].copy_from_slice(&payload);
        frame[8] = frame_checksum(0x01, &payload);
        assert_eq!(
            feed(&mut parser, &frame),
            Err(FrameError::Length { kind: 0x01, len: 5 })
        );
    }
}
