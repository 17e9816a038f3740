//! WS2812 status pixel.
//!
//! The poll loop must never wait on the LED, so colours go through a
//! [`Signal`] (latest value wins) to a task that owns the pixel.

use embassy_rp::pio::Instance;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use port_core::{startup_flourish, IndicatorColor, IndicatorSink};
use smart_leds::RGB8;

use crate::config::BOOT_DELAY;

/// Latest colour requested by the poll loop.
pub type ColorSignal = Signal<CriticalSectionRawMutex, IndicatorColor>;

/// Poll-loop side: never blocks.
pub struct SignalIndicator {
    signal: &'static ColorSignal,
}

impl SignalIndicator {
    #[must_use]
    pub const fn new(signal: &'static ColorSignal) -> Self {
        Self { signal }
    }
}

impl IndicatorSink for SignalIndicator {
    fn show(&mut self, color: IndicatorColor) {
        self.signal.signal(color);
    }
}

/// Task side: owns the pixel.
pub struct StatusLed<'d, PIO: Instance, const SM: usize> {
    ws: PioWs2812<'d, PIO, SM, 1>,
}

impl<'d, PIO: Instance, const SM: usize> StatusLed<'d, PIO, SM> {
    #[must_use]
    pub fn new(ws: PioWs2812<'d, PIO, SM, 1>) -> Self {
        Self { ws }
    }

    pub async fn show(&mut self, color: IndicatorColor) {
        self.ws.write(&[RGB8::new(color.r, color.g, color.b)]).await;
    }

    /// Play the start-up flourish, then follow the signal forever.
    ///
    /// A colour requested during the flourish replaces the initial level.
    pub async fn run(&mut self, signal: &ColorSignal, initial_level: u8) -> ! {
        Timer::after(BOOT_DELAY).await;
        for step in startup_flourish() {
            self.show(step.color).await;
            Timer::after(step.hold).await;
        }
        let first = signal
            .try_take()
            .unwrap_or(IndicatorColor::for_level(initial_level));
        self.show(first).await;

        loop {
            let color = signal.wait().await;
            self.show(color).await;
        }
    }
}
