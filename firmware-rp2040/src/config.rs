//! Board wiring and timing constants.
//!
//! # Pins (Raspberry Pi Pico)
//!
//! | Function            | GPIO  | Variant     |
//! |---------------------|-------|-------------|
//! | UART1 TX            | 8     | both        |
//! | UART1 RX (reports)  | 9     | both        |
//! | WS2812 status pixel | 12    | both        |
//! | CLK in              | 16    | mouse       |
//! | LATCH in            | 17    | mouse       |
//! | DATA out            | 18    | mouse       |
//! | D0..D3 out          | 2..5  | XE-1AP      |
//! | ACK out             | 6     | XE-1AP      |
//! | REQ/CLR in          | 19    | XE-1AP      |
//! | SELECT out          | 10    | XE-1AP      |
//! | RUN out             | 11    | XE-1AP      |
//!
//! CLK and LATCH must stay consecutive: the plex program reads them as one
//! input group.

use embassy_time::Duration;
use port_core::BridgeConfig;

/// Baud rate of the link from the USB-host co-processor.
pub const UART_BAUD: u32 = 115_200;

/// Decoded events buffered between the UART task and the poll loop.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Stack for the edge executor on core 1.
pub const CORE1_STACK_SIZE: usize = 4096;

/// Settling time before the start-up flourish.
pub const BOOT_DELAY: Duration = Duration::from_millis(1000);

/// PIO clock divider of the XE-1AP protocol program: 1 MHz at 125 MHz sysclk.
pub const XE1AP_CLOCK_DIVIDER: u16 = 125;

/// Engine parameters shared by both variants.
#[must_use]
pub const fn bridge_config() -> BridgeConfig {
    BridgeConfig::DEFAULT
}
