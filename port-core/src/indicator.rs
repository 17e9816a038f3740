//! Sensitivity indicator: level-to-colour mapping with a minimum update interval.

use embassy_time::{Duration, Instant};

/// RGB colour for a single status pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl IndicatorColor {
    pub const OFF: Self = Self::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Colour for a sensitivity level: green, yellow, red, white otherwise.
    #[must_use]
    pub const fn for_level(level: u8) -> Self {
        match level {
            0 => Self::rgb(0, 7, 0),
            1 => Self::rgb(12, 12, 0),
            2 => Self::rgb(28, 2, 0),
            _ => Self::rgb(10, 10, 10),
        }
    }
}

/// Destination for indicator colours. Must not block the poll loop.
pub trait IndicatorSink {
    fn show(&mut self, color: IndicatorColor);
}

/// Shows the sensitivity level, at most once per `min_interval`.
///
/// A change requested inside the interval is not queued; it is shown by the
/// first request after the interval that still carries a different level.
pub struct FeedbackIndicator<I> {
    sink: I,
    shown: u8,
    last_update: Instant,
    min_interval: Duration,
}

impl<I: IndicatorSink> FeedbackIndicator<I> {
    /// Create an indicator that considers `initial_level` shown at `now`.
    pub fn new(sink: I, initial_level: u8, now: Instant, min_interval: Duration) -> Self {
        Self {
            sink,
            shown: initial_level,
            last_update: now,
            min_interval,
        }
    }

    /// Request `level`; returns `true` if the sink was updated.
    pub fn request(&mut self, level: u8, now: Instant) -> bool {
        if level == self.shown {
            return false;
        }
        let due = now
            .checked_duration_since(self.last_update)
            .is_some_and(|elapsed| elapsed > self.min_interval);
        if !due {
            return false;
        }
        self.sink.show(IndicatorColor::for_level(level));
        self.shown = level;
        self.last_update = now;
        #[cfg(feature = "defmt")]
        defmt::debug!("sensitivity level {}", level);
        true
    }

    /// Level currently displayed.
    #[must_use]
    pub fn shown(&self) -> u8 {
        self.shown
    }

    /// Get a reference to the sink.
    pub fn sink(&self) -> &I {
        &self.sink
    }
}

/// One step of the start-up flourish: show `color`, then hold for `hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlourishStep {
    pub color: IndicatorColor,
    pub hold: Duration,
}

const FLOURISH_START: u8 = 20;
const FLOURISH_STEP: Duration = Duration::from_millis(10);
const FLOURISH_PAUSE: Duration = Duration::from_millis(100);
const FLOURISH_DARK: Duration = Duration::from_secs(1);

/// Start-up sequence: red, green and blue each fade from 20 to 0, then dark.
pub fn startup_flourish() -> impl Iterator<Item = FlourishStep> {
    let fade = |channel: usize| {
        (0..=FLOURISH_START).rev().map(move |level| {
            let mut rgb = [0u8; 3];
            rgb[channel] = level;
            FlourishStep {
                color: IndicatorColor::rgb(rgb[0], rgb[1], rgb[2]),
                hold: if level == 0 {
                    FLOURISH_STEP + FLOURISH_PAUSE
                } else {
                    FLOURISH_STEP
                },
            }
        })
    };
    fade(0)
        .chain(fade(1))
        .chain(fade(2))
        .chain(core::iter::once(FlourishStep {
            color: IndicatorColor::OFF,
            hold: FLOURISH_DARK,
        }))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder(Vec<IndicatorColor>);

    impl IndicatorSink for Recorder {
        fn show(&mut self, color: IndicatorColor) {
            self.0.push(color);
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_level_colors() {
        assert_eq!(IndicatorColor::for_level(0), IndicatorColor::rgb(0, 7, 0));
        assert_eq!(IndicatorColor::for_level(1), IndicatorColor::rgb(12, 12, 0));
        assert_eq!(IndicatorColor::for_level(2), IndicatorColor::rgb(28, 2, 0));
        assert_eq!(IndicatorColor::for_level(9), IndicatorColor::rgb(10, 10, 10));
    }

    #[test]
    fn test_unchanged_level_is_not_resent() {
        let mut ind = FeedbackIndicator::new(Recorder::default(), 1, at(0), Duration::from_millis(10));
        assert!(!ind.request(1, at(100)));
        assert!(ind.sink().0.is_empty());
    }

    #[test]
    fn test_rate_limited_to_interval() {
        let mut ind = FeedbackIndicator::new(Recorder::default(), 1, at(0), Duration::from_millis(10));
        // Exactly at the interval is still too soon
        assert!(!ind.request(2, at(10)));
        assert!(ind.request(2, at(11)));
        assert!(!ind.request(0, at(15)));
        assert_eq!(ind.shown(), 2);
        assert!(ind.request(0, at(22)));
        assert_eq!(
            ind.sink().0,
            [IndicatorColor::for_level(2), IndicatorColor::for_level(0)]
        );
    }

    #[test]
    fn test_flourish_shape() {
        let steps: Vec<_> = startup_flourish().collect();
        assert_eq!(steps.len(), 3 * 21 + 1);
        assert_eq!(steps[0].color, IndicatorColor::rgb(20, 0, 0));
        assert_eq!(steps[20].color, IndicatorColor::OFF);
        assert_eq!(steps[20].hold, Duration::from_millis(110));
        assert_eq!(steps[21].color, IndicatorColor::rgb(0, 20, 0));
        assert_eq!(steps[42].color, IndicatorColor::rgb(0, 0, 20));
        assert_eq!(steps[63].hold, Duration::from_secs(1));
    }
}
