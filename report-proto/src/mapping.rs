//! Report to bridge-event mapping.
//!
//! Mouse reports go through [`Sensitivity`], which turns the scroll wheel
//! into a three-step speed control and scales the motion deltas.

use port_core::{JoystickButtons, JoystickState, MouseButtons, PointerEvent};

use crate::types::{JoystickReport, MouseReport};

/// Lowest sensitivity level (half speed).
pub const LEVEL_LOW: u8 = 0;
/// Standard sensitivity, deltas passed through.
pub const LEVEL_STANDARD: u8 = 1;
/// Highest sensitivity level (double speed).
pub const LEVEL_HIGH: u8 = 2;

/// Buttons the joystick report can carry.
const JOYSTICK_BUTTON_MASK: u16 = 0x03FF;

/// Scroll-wheel sensitivity with sub-count carry for the half-speed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sensitivity {
    level: u8,
    carry_x: i16,
    carry_y: i16,
}

impl Sensitivity {
    #[must_use]
    pub const fn new(level: u8) -> Self {
        Self {
            level: if level > LEVEL_HIGH { LEVEL_HIGH } else { level },
            carry_x: 0,
            carry_y: 0,
        }
    }

    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Wheel up raises the level, wheel down lowers it, one step per report.
    pub fn apply_wheel(&mut self, wheel: i8) {
        let next = match wheel {
            w if w > 0 => self.level.saturating_add(1).min(LEVEL_HIGH),
            w if w < 0 => self.level.saturating_sub(1),
            _ => self.level,
        };
        if next != self.level {
            self.level = next;
            self.carry_x = 0;
            self.carry_y = 0;
        }
    }

    /// Scale one axis delta at the current level.
    fn scale(level: u8, delta: i8, carry: &mut i16) -> i8 {
        let scaled = match level {
            LEVEL_LOW => {
                let total = delta as i16 + *carry;
                let half = total / 2;
                *carry = total - half * 2;
                half
            }
            LEVEL_STANDARD => delta as i16,
            _ => delta as i16 * 2,
        };
        scaled.clamp(i8::MIN as i16, i8::MAX as i16) as i8
    }

    /// Convert a mouse report into a pointer event.
    pub fn mouse_to_event(&mut self, report: &MouseReport) -> PointerEvent {
        self.apply_wheel(report.wheel);
        let dx = Self::scale(self.level, report.dx, &mut self.carry_x);
        let dy = Self::scale(self.level, report.dy, &mut self.carry_y);
        PointerEvent {
            buttons: MouseButtons(report.buttons & 0x07),
            dx: dx as u8,
            dy: dy as u8,
            wheel: report.wheel,
            sensitivity: self.level,
        }
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::new(LEVEL_STANDARD)
    }
}

/// Convert a joystick report into the absolute joystick state.
#[inline]
#[must_use]
pub fn joystick_report_to_state(report: &JoystickReport) -> JoystickState {
    JoystickState {
        buttons: JoystickButtons(report.buttons & JOYSTICK_BUTTON_MASK),
        x: report.x,
        y: report.y,
        throttle: report.throttle,
    }
}
