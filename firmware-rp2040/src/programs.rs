//! PIO programs and their state-machine setup.

use embassy_rp::pio::{Common, Config, Direction, FifoJoin, Instance, Pin, ShiftDirection, StateMachine};
use fixed::types::U24F8;
use fixed::traits::ToFixed;
use fixed_macro::fixed;

/// Edge detector: pushes one word into the RX FIFO per rising edge of `pin`.
///
/// The word itself is meaningless; only its arrival matters. A full FIFO
/// drops the push instead of stalling the program.
pub fn clock<'d, PIO: Instance, const SM: usize>(
    common: &mut Common<'d, PIO>,
    sm: &mut StateMachine<'d, PIO, SM>,
    pin: &Pin<'d, PIO>,
) {
    let prg = pio::pio_asm!(
        ".wrap_target",
        "    wait 0 pin 0",
        "    wait 1 pin 0",
        "    in pins, 1",
        "    push noblock",
        ".wrap",
    );
    let loaded = common.load_program(&prg.program);

    let mut cfg = Config::default();
    cfg.use_program(&loaded, &[]);
    cfg.set_in_pins(&[pin]);
    cfg.clock_divider = fixed!(1.0: U24F8);
    cfg.shift_in.direction = ShiftDirection::Left;
    cfg.shift_in.auto_fill = false;
    cfg.fifo_join = FifoJoin::RxOnly;

    sm.set_config(&cfg);
    sm.set_pin_dirs(Direction::In, &[pin]);
    sm.set_enable(true);
}

/// PC-FX mouse output.
///
/// While LATCH is low the program keeps pulling, so the word it holds is
/// always the newest one queued (or the previous one when the FIFO is empty).
/// When LATCH rises it shifts that word out MSB first, one bit per CLK.
pub fn plex<'d, PIO: Instance, const SM: usize>(
    common: &mut Common<'d, PIO>,
    sm: &mut StateMachine<'d, PIO, SM>,
    clk: &Pin<'d, PIO>,
    latch: &Pin<'d, PIO>,
    data: &Pin<'d, PIO>,
) {
    let prg = pio::pio_asm!(
        ".wrap_target",
        "idle:",
        "    pull noblock",
        "    mov x, osr",
        "    jmp pin shift",
        "    jmp idle",
        "shift:",
        "    set y, 31",
        "bit:",
        "    out pins, 1",
        "    wait 1 pin 0",
        "    wait 0 pin 0",
        "    jmp y-- bit",
        "    wait 0 pin 1",
        ".wrap",
    );
    let loaded = common.load_program(&prg.program);

    let mut cfg = Config::default();
    cfg.use_program(&loaded, &[]);
    cfg.set_in_pins(&[clk, latch]);
    cfg.set_out_pins(&[data]);
    cfg.set_jmp_pin(latch);
    cfg.clock_divider = fixed!(1.0: U24F8);
    cfg.shift_out.direction = ShiftDirection::Left;
    cfg.shift_out.auto_fill = false;
    cfg.shift_out.threshold = 32;
    cfg.fifo_join = FifoJoin::TxOnly;

    sm.set_config(&cfg);
    sm.set_pin_dirs(Direction::In, &[clk, latch]);
    sm.set_pin_dirs(Direction::Out, &[data]);
    sm.set_enable(true);
}

/// XE-1AP output: each queued word is sent as two nibbles, low nibble
/// first, with ACK strobed low while a nibble is valid.
///
/// Blocks on an empty FIFO, so a transaction starts as soon as the edge
/// context pushes the first word.
pub fn xe1ap_protocol<'d, PIO: Instance, const SM: usize>(
    common: &mut Common<'d, PIO>,
    sm: &mut StateMachine<'d, PIO, SM>,
    data: [&Pin<'d, PIO>; 4],
    ack: &Pin<'d, PIO>,
    divider: u16,
) {
    let prg = pio::pio_asm!(
        ".side_set 1 opt",
        ".wrap_target",
        "    pull block",
        "    out pins, 4    side 0 [7]",
        "    nop            side 1 [7]",
        "    out pins, 4    side 0 [7]",
        "    nop            side 1 [7]",
        ".wrap",
    );
    let loaded = common.load_program(&prg.program);

    let mut cfg = Config::default();
    cfg.use_program(&loaded, &[ack]);
    cfg.set_out_pins(&data);
    cfg.clock_divider = divider.to_fixed();
    cfg.shift_out.direction = ShiftDirection::Right;
    cfg.shift_out.auto_fill = false;
    cfg.shift_out.threshold = 8;
    cfg.fifo_join = FifoJoin::TxOnly;

    sm.set_config(&cfg);
    sm.set_pin_dirs(Direction::Out, &data);
    sm.set_pin_dirs(Direction::Out, &[ack]);
    sm.set_enable(true);
}
