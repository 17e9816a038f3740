//! Core state types: button sets, decoded input events and the per-variant state.

use core::ops::{BitOr, BitOrAssign};

/// Mouse buttons as a pressed-set, in USB HID boot-protocol bit order.
///
/// # Example
///
/// ```
/// use port_core::MouseButtons;
///
/// let buttons = MouseButtons::LEFT | MouseButtons::RIGHT;
/// assert!(buttons.contains(MouseButtons::LEFT));
/// assert!(!buttons.contains(MouseButtons::MIDDLE));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseButtons(pub u8);

impl MouseButtons {
    pub const LEFT: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const MIDDLE: Self = Self(1 << 2);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: MouseButtons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Active-low wire byte `|111111rl|` (0 = pressed).
    ///
    /// Only left and right exist on the console side; other bits read as released.
    #[inline]
    #[must_use]
    pub const fn wire_byte(self) -> u8 {
        !(self.0 & (Self::LEFT.0 | Self::RIGHT.0))
    }
}

impl BitOr for MouseButtons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MouseButtons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Joystick buttons as a pressed-set.
///
/// `A_ALT`/`B_ALT` are the second trigger pair (A', B'). The wire protocol
/// reports them merged with A/B in the first nibble and distinguishes them
/// only in the last one.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickButtons(pub u16);

impl JoystickButtons {
    pub const A: Self = Self(1 << 0);
    pub const B: Self = Self(1 << 1);
    pub const C: Self = Self(1 << 2);
    pub const D: Self = Self(1 << 3);
    pub const E1: Self = Self(1 << 4);
    pub const E2: Self = Self(1 << 5);
    pub const START: Self = Self(1 << 6); // RUN on the console
    pub const SELECT: Self = Self(1 << 7);
    pub const A_ALT: Self = Self(1 << 8);
    pub const B_ALT: Self = Self(1 << 9);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: JoystickButtons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Check if any of the given buttons is pressed.
    #[inline]
    #[must_use]
    pub const fn any(self, buttons: JoystickButtons) -> bool {
        (self.0 & buttons.0) != 0
    }

}

impl BitOr for JoystickButtons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for JoystickButtons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Decoded relative-pointer event from the input stack.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerEvent {
    /// Absolute button state.
    pub buttons: MouseButtons,
    /// Signed 8-bit-wrapped X delta (0..=127 right, 128..=255 left).
    pub dx: u8,
    /// Signed 8-bit-wrapped Y delta (0..=127 down, 128..=255 up).
    pub dy: u8,
    /// Scroll-wheel delta (already consumed upstream for sensitivity).
    pub wheel: i8,
    /// Sensitivity level the deltas were scaled with.
    pub sensitivity: u8,
}

/// Accumulated or transmitted pointer state.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerState {
    pub x: i16,
    pub y: i16,
    pub buttons: MouseButtons,
}

impl PointerState {
    /// No motion, no buttons pressed.
    pub const NEUTRAL: Self = Self {
        x: 0,
        y: 0,
        buttons: MouseButtons::NONE,
    };
}

/// Joystick axes and buttons. Used both as the decoded event and the state,
/// since the joystick variant overwrites instead of accumulating.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickState {
    pub buttons: JoystickButtons,
    pub x: u8,
    pub y: u8,
    pub throttle: u8,
}

impl JoystickState {
    /// Axis value reported at rest.
    pub const AXIS_CENTER: u8 = 0x7F;

    /// All buttons released, axes centred.
    pub const NEUTRAL: Self = Self {
        buttons: JoystickButtons::NONE,
        x: Self::AXIS_CENTER,
        y: Self::AXIS_CENTER,
        throttle: Self::AXIS_CENTER,
    };
}

/// Interpret a signed 8-bit-wrapped delta: 0..=127 forward, 128..=255 backward.
#[inline]
#[must_use]
pub const fn wrap_delta(raw: u8) -> i16 {
    raw as i8 as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_delta_boundary() {
        assert_eq!(wrap_delta(0), 0);
        assert_eq!(wrap_delta(127), 127);
        assert_eq!(wrap_delta(128), -128);
        assert_eq!(wrap_delta(255), -1);
    }

    #[test]
    fn test_mouse_wire_byte_active_low() {
        assert_eq!(MouseButtons::NONE.wire_byte(), 0xFF);
        assert_eq!(MouseButtons::LEFT.wire_byte(), 0xFE);
        assert_eq!(MouseButtons::RIGHT.wire_byte(), 0xFD);
        assert_eq!((MouseButtons::LEFT | MouseButtons::RIGHT).wire_byte(), 0xFC);
        // Middle has no console counterpart
        assert_eq!(MouseButtons::MIDDLE.wire_byte(), 0xFF);
    }

    #[test]
    fn test_joystick_buttons_any_and_contains() {
        let mut buttons = JoystickButtons::NONE;
        buttons |= JoystickButtons::A_ALT;
        assert!(buttons.contains(JoystickButtons::A_ALT));
        assert!(!buttons.contains(JoystickButtons::A | JoystickButtons::A_ALT));
        assert!(buttons.any(JoystickButtons::A | JoystickButtons::A_ALT));
        assert!(!buttons.any(JoystickButtons::B | JoystickButtons::B_ALT));
    }
}
