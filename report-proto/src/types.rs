//! Report payloads as they arrive from the USB-host co-processor.

/// Frame sync byte.
pub const SYNC: u8 = 0xA5;

/// Largest payload any report kind uses.
pub const MAX_PAYLOAD: usize = 8;

/// Sync, kind, length and checksum around the payload.
pub const FRAME_OVERHEAD: usize = 4;

/// Largest frame on the wire.
pub const MAX_FRAME: usize = MAX_PAYLOAD + FRAME_OVERHEAD;

/// Report discriminator, second byte of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReportKind {
    Mouse = 0x01,
    Joystick = 0x02,
}

impl ReportKind {
    /// Payload length this kind must carry.
    #[must_use]
    pub const fn payload_len(self) -> usize {
        match self {
            ReportKind::Mouse => 4,
            ReportKind::Joystick => 5,
        }
    }
}

impl TryFrom<u8> for ReportKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(ReportKind::Mouse),
            0x02 => Ok(ReportKind::Joystick),
            other => Err(other),
        }
    }
}

/// HID boot-protocol mouse report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// bit0 left, bit1 right, bit2 middle.
    pub buttons: u8,
    pub dx: i8,
    pub dy: i8,
    /// Positive is wheel up.
    pub wheel: i8,
}

/// Analog joystick report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    /// Pressed-set, same bit order as [`port_core::JoystickButtons`].
    pub buttons: u16,
    pub x: u8,
    pub y: u8,
    pub throttle: u8,
}

/// A decoded report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    Mouse(MouseReport),
    Joystick(JoystickReport),
}

impl Report {
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Report::Mouse(_) => ReportKind::Mouse,
            Report::Joystick(_) => ReportKind::Joystick,
        }
    }
}
