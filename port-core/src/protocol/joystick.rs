//! XE-1AP analog joystick protocol (PC Engine).
//!
//! Twelve nibbles are sent per read, two per byte-word. Within each word the
//! first nibble on the wire sits in the low half:
//!
//! | word | low nibble (first)       | high nibble (second)       |
//! |------|--------------------------|----------------------------|
//! | 0    | A, B, C, D               | E1, E2, Start, Select      |
//! | 1    | Y bits 7..4              | X bits 7..4                |
//! | 2    | throttle bits 7..4       | `0000`                     |
//! | 3    | Y bits 3..0              | X bits 3..0                |
//! | 4    | throttle bits 3..0       | `0000`                     |
//! | 5    | A, B, A', B'             | `1111`                     |
//!
//! Button nibbles are active-low and list their bits from most to least
//! significant. The first nibble cannot tell A from A' (or B from B'), so
//! either one clears the shared bit; the last nibble carries them apart.

use super::{DirectLines, Protocol, ProtocolKind};
use crate::types::{JoystickButtons, JoystickState};

/// Number of byte-words per transaction.
pub const WORDS_PER_FRAME: usize = 6;

/// Words transmitted at power-up: everything released, axes centred.
pub const NEUTRAL_WORDS: [u8; WORDS_PER_FRAME] = [0xFF, 0x77, 0x07, 0xFF, 0x0F, 0xFF];

/// Build an active-low nibble from four pressed flags, most significant first.
#[inline]
const fn active_low_nibble(b3: bool, b2: bool, b1: bool, b0: bool) -> u8 {
    let pressed = ((b3 as u8) << 3) | ((b2 as u8) << 2) | ((b1 as u8) << 1) | (b0 as u8);
    !pressed & 0x0F
}

#[inline]
const fn pair(first: u8, second: u8) -> u8 {
    (second << 4) | (first & 0x0F)
}

/// Encode a joystick snapshot into its six wire words.
#[must_use]
pub const fn encode_words(state: &JoystickState) -> [u8; WORDS_PER_FRAME] {
    let b = state.buttons;
    let a = b.any(JoystickButtons(JoystickButtons::A.0 | JoystickButtons::A_ALT.0));
    let bb = b.any(JoystickButtons(JoystickButtons::B.0 | JoystickButtons::B_ALT.0));

    let set1_first = active_low_nibble(a, bb, b.contains(JoystickButtons::C), b.contains(JoystickButtons::D));
    let set1_second = active_low_nibble(
        b.contains(JoystickButtons::E1),
        b.contains(JoystickButtons::E2),
        b.contains(JoystickButtons::START),
        b.contains(JoystickButtons::SELECT),
    );
    let set2 = active_low_nibble(
        b.contains(JoystickButtons::A),
        b.contains(JoystickButtons::B),
        b.contains(JoystickButtons::A_ALT),
        b.contains(JoystickButtons::B_ALT),
    );

    [
        pair(set1_first, set1_second),
        pair(state.y >> 4, state.x >> 4),
        pair(state.throttle >> 4, 0x0),
        pair(state.y, state.x & 0x0F),
        pair(state.throttle, 0x0),
        pair(set2, 0xF),
    ]
}

/// Absolute joystick strategy: the latest report simply replaces the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoystickProtocol;

impl Protocol for JoystickProtocol {
    type Event = JoystickState;
    type State = JoystickState;
    type Frame = [u32; WORDS_PER_FRAME];

    const KIND: ProtocolKind = ProtocolKind::Joystick;
    const NEUTRAL: JoystickState = JoystickState::NEUTRAL;
    const IDLE_RESUBMIT: bool = false;
    const FLUSH_ON_EDGE: bool = true;

    fn fold(accumulated: &mut JoystickState, event: &JoystickState) {
        *accumulated = *event;
    }

    fn reconcile(accumulated: &mut JoystickState, _sent: JoystickState) -> JoystickState {
        *accumulated
    }

    fn encode(state: &JoystickState) -> [u32; WORDS_PER_FRAME] {
        encode_words(state).map(u32::from)
    }

    fn pack(state: &JoystickState) -> u64 {
        (state.buttons.0 as u64)
            | ((state.x as u64) << 16)
            | ((state.y as u64) << 24)
            | ((state.throttle as u64) << 32)
    }

    fn unpack(bits: u64) -> JoystickState {
        JoystickState {
            buttons: JoystickButtons(bits as u16),
            x: (bits >> 16) as u8,
            y: (bits >> 24) as u8,
            throttle: (bits >> 32) as u8,
        }
    }

    fn direct_lines(frame: &[u32; WORDS_PER_FRAME]) -> Option<DirectLines> {
        Some(DirectLines {
            select: frame[0] & 0x10 != 0,
            run: frame[0] & 0x20 != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(buttons: JoystickButtons) -> JoystickState {
        JoystickState {
            buttons,
            ..JoystickState::NEUTRAL
        }
    }

    #[test]
    fn test_neutral_words() {
        assert_eq!(encode_words(&JoystickState::NEUTRAL), NEUTRAL_WORDS);
    }

    #[test]
    fn test_single_button_clears_only_its_bit() {
        // (button, word 0, word 5)
        let table = [
            (JoystickButtons::D, 0xFE, 0xFF),
            (JoystickButtons::C, 0xFD, 0xFF),
            (JoystickButtons::B, 0xFB, 0xFB),
            (JoystickButtons::A, 0xF7, 0xF7),
            (JoystickButtons::SELECT, 0xEF, 0xFF),
            (JoystickButtons::START, 0xDF, 0xFF),
            (JoystickButtons::E2, 0xBF, 0xFF),
            (JoystickButtons::E1, 0x7F, 0xFF),
            (JoystickButtons::A_ALT, 0xF7, 0xFD),
            (JoystickButtons::B_ALT, 0xFB, 0xFE),
        ];
        for (button, word0, word5) in table {
            let words = encode_words(&pressed(button));
            assert_eq!(words[0], word0, "{button:?}");
            assert_eq!(words[5], word5, "{button:?}");
            assert_eq!(words[1..5], NEUTRAL_WORDS[1..5], "{button:?}");
        }
    }

    #[test]
    fn test_axis_nibble_order() {
        let state = JoystickState {
            buttons: JoystickButtons::NONE,
            x: 0xAB,
            y: 0xCD,
            throttle: 0x12,
        };
        assert_eq!(encode_words(&state), [0xFF, 0xAC, 0x01, 0xBD, 0x02, 0xFF]);
    }

    #[test]
    fn test_frame_widens_words() {
        let frame = JoystickProtocol::encode(&JoystickState::NEUTRAL);
        assert_eq!(frame, [0xFF, 0x77, 0x07, 0xFF, 0x0F, 0xFF]);
    }

    #[test]
    fn test_fold_overwrites_and_reconcile_keeps_state() {
        let mut acc = JoystickState::NEUTRAL;
        let event = JoystickState {
            buttons: JoystickButtons::C,
            x: 0x10,
            y: 0xF0,
            throttle: 0x80,
        };
        JoystickProtocol::fold(&mut acc, &event);
        assert_eq!(acc, event);
        let next = JoystickProtocol::reconcile(&mut acc, JoystickState::NEUTRAL);
        assert_eq!(next, event);
        assert_eq!(acc, event);
    }

    #[test]
    fn test_direct_lines_follow_select_and_run() {
        let idle = JoystickProtocol::direct_lines(&JoystickProtocol::encode(&JoystickState::NEUTRAL));
        assert_eq!(
            idle,
            Some(DirectLines {
                select: true,
                run: true
            })
        );
        let run = JoystickProtocol::direct_lines(&JoystickProtocol::encode(&pressed(JoystickButtons::START)));
        assert_eq!(
            run,
            Some(DirectLines {
                select: true,
                run: false
            })
        );
    }

    #[test]
    fn test_pack_round_trip() {
        let state = JoystickState {
            buttons: JoystickButtons::A_ALT | JoystickButtons::E1,
            x: 1,
            y: 254,
            throttle: 128,
        };
        assert_eq!(JoystickProtocol::unpack(JoystickProtocol::pack(&state)), state);
    }
}
