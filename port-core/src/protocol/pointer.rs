//! PC-FX mouse protocol.
//!
//! One 32-bit word per console read:
//!
//! ```text
//! |00101111|111111rl|xxxxxxxx|yyyyyyyy|
//! ```
//!
//! - `r`, `l` - right/left button, active-low
//! - `x`, `y` - axis bytes, `(!delta >> 1) & 0xFF`
//!
//! The axis transform complements the signed delta and halves it with an
//! arithmetic shift, so larger negative motion drives the byte towards zero.

use super::{Protocol, ProtocolKind};
use crate::types::{wrap_delta, MouseButtons, PointerEvent, PointerState};

/// Fixed tag bits of every word.
pub const WORD_TAG: u32 = 0x2F00_0000;

/// Word transmitted at power-up: no buttons, no motion.
pub const NEUTRAL_WORD: u32 = 0x2FFF_FFFF;

/// Encode one axis delta into its wire byte.
///
/// `i16` shifts are arithmetic, which keeps the sign of the complement.
#[inline]
#[must_use]
pub const fn encode_axis(delta: i16) -> u8 {
    ((!delta) >> 1) as u8
}

/// Encode a pointer snapshot into its wire word.
#[inline]
#[must_use]
pub const fn encode_word(state: &PointerState) -> u32 {
    WORD_TAG
        | ((state.buttons.wire_byte() as u32) << 16)
        | ((encode_axis(state.x) as u32) << 8)
        | encode_axis(state.y) as u32
}

/// Relative-pointer strategy: deltas accumulate until transmitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerProtocol;

impl Protocol for PointerProtocol {
    type Event = PointerEvent;
    type State = PointerState;
    type Frame = [u32; 1];

    const KIND: ProtocolKind = ProtocolKind::Pointer;
    const NEUTRAL: PointerState = PointerState::NEUTRAL;
    const IDLE_RESUBMIT: bool = true;
    const FLUSH_ON_EDGE: bool = false;

    fn fold(accumulated: &mut PointerState, event: &PointerEvent) {
        // int16 wrap-around matches the console side's own arithmetic
        accumulated.x = accumulated.x.wrapping_add(wrap_delta(event.dx));
        accumulated.y = accumulated.y.wrapping_add(wrap_delta(event.dy));
        accumulated.buttons = event.buttons;
    }

    fn reconcile(accumulated: &mut PointerState, sent: PointerState) -> PointerState {
        accumulated.x = accumulated.x.wrapping_sub(sent.x);
        accumulated.y = accumulated.y.wrapping_sub(sent.y);
        PointerState {
            x: 0,
            y: 0,
            buttons: accumulated.buttons,
        }
    }

    fn encode(state: &PointerState) -> [u32; 1] {
        [encode_word(state)]
    }

    fn pack(state: &PointerState) -> u64 {
        (state.x as u16 as u64) | ((state.y as u16 as u64) << 16) | ((state.buttons.0 as u64) << 32)
    }

    fn unpack(bits: u64) -> PointerState {
        PointerState {
            x: bits as u16 as i16,
            y: (bits >> 16) as u16 as i16,
            buttons: MouseButtons((bits >> 32) as u8),
        }
    }

    fn sensitivity(event: &PointerEvent) -> Option<u8> {
        Some(event.sensitivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_encode(raw: u8) -> u8 {
        let signed: i32 = if raw >= 128 { raw as i32 - 256 } else { raw as i32 };
        ((!signed) >> 1) as u8
    }

    #[test]
    fn test_encode_axis_matches_reference_for_every_delta() {
        for raw in 0..=255u8 {
            assert_eq!(
                encode_axis(wrap_delta(raw)),
                reference_encode(raw),
                "delta {raw}"
            );
        }
    }

    #[test]
    fn test_encode_axis_wrap_boundary() {
        // 127 is the largest positive delta, 128 the largest negative
        assert_eq!(encode_axis(wrap_delta(127)), 0xC0);
        assert_eq!(encode_axis(wrap_delta(128)), 0x3F);
        assert_eq!(encode_axis(0), 0xFF);
        assert_eq!(encode_axis(1), 0xFF);
        assert_eq!(encode_axis(-1), 0x00);
    }

    #[test]
    fn test_neutral_word() {
        assert_eq!(encode_word(&PointerState::NEUTRAL), NEUTRAL_WORD);
        assert_eq!(PointerProtocol::encode(&PointerProtocol::NEUTRAL), [NEUTRAL_WORD]);
    }

    #[test]
    fn test_word_layout() {
        let state = PointerState {
            x: 4,
            y: -6,
            buttons: MouseButtons::LEFT,
        };
        // !4 = -5 >> 1 = -3 -> 0xFD ; !-6 = 5 >> 1 = 2 -> 0x02
        assert_eq!(encode_word(&state), 0x2FFE_FD02);
    }

    #[test]
    fn test_encode_is_idempotent() {
        let state = PointerState {
            x: -100,
            y: 37,
            buttons: MouseButtons::RIGHT,
        };
        assert_eq!(PointerProtocol::encode(&state), PointerProtocol::encode(&state));
    }

    #[test]
    fn test_fold_accumulates_deltas_and_overwrites_buttons() {
        let mut acc = PointerState::NEUTRAL;
        PointerProtocol::fold(
            &mut acc,
            &PointerEvent {
                buttons: MouseButtons::LEFT,
                dx: 10,
                dy: 250, // -6
                ..PointerEvent::default()
            },
        );
        PointerProtocol::fold(
            &mut acc,
            &PointerEvent {
                buttons: MouseButtons::RIGHT,
                dx: 128, // -128
                dy: 3,
                ..PointerEvent::default()
            },
        );
        assert_eq!(acc.x, -118);
        assert_eq!(acc.y, -3);
        assert_eq!(acc.buttons, MouseButtons::RIGHT);
    }

    #[test]
    fn test_reconcile_subtracts_sent_and_keeps_buttons() {
        let mut acc = PointerState {
            x: 25,
            y: -40,
            buttons: MouseButtons::LEFT,
        };
        let sent = PointerState {
            x: 20,
            y: -45,
            buttons: MouseButtons::NONE,
        };
        let next = PointerProtocol::reconcile(&mut acc, sent);
        assert_eq!((acc.x, acc.y), (5, 5));
        assert_eq!(
            next,
            PointerState {
                x: 0,
                y: 0,
                buttons: MouseButtons::LEFT,
            }
        );
    }

    #[test]
    fn test_pack_preserves_negative_axes() {
        let state = PointerState {
            x: -32768,
            y: 32767,
            buttons: MouseButtons(0x07),
        };
        assert_eq!(PointerProtocol::unpack(PointerProtocol::pack(&state)), state);
        assert!(PointerProtocol::pack(&state) < (1 << crate::protocol::PACKED_STATE_BITS));
    }
}
