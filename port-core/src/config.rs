//! Runtime tuning of the bridge engine.

use embassy_time::Duration;

/// Timing and throughput parameters for [`crate::engine::PollLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// Time after a burst's first edge that marks the end of the burst.
    pub burst_timeout: Duration,
    /// Minimum time between two indicator updates.
    pub indicator_interval: Duration,
    /// Sensitivity level shown at start-up.
    pub initial_level: u8,
    /// Upper bound on events folded per poll iteration, so a flood of input
    /// cannot starve the watchdog.
    pub max_events_per_tick: usize,
}

impl BridgeConfig {
    pub const DEFAULT: Self = Self {
        burst_timeout: Duration::from_millis(7),
        indicator_interval: Duration::from_millis(10),
        initial_level: 1,
        max_events_per_tick: 8,
    };
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
