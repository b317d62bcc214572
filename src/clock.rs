use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Millisecond timestamp from a free-running 32-bit counter.
///
/// The counter wraps after ~49.7 days. Every comparison goes through
/// [`Millis::since`], which subtracts with wrapping semantics, so elapsed
/// durations stay correct across the wrap as long as they are shorter than
/// the counter period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millis(pub u32);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Milliseconds elapsed from `earlier` to `self`.
    pub fn since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub fn has_elapsed(self, earlier: Millis, duration_ms: u32) -> bool {
        self.since(earlier) >= duration_ms
    }

    pub fn plus(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }
}

/// Fraction of `duration_ms` elapsed since `start`, clamped to `[0, 1]`.
pub fn progress(now: Millis, start: Millis, duration_ms: u32) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (now.since(start) as f32 / duration_ms as f32).clamp(0.0, 1.0)
}

/// Monotonic tick source for the binary: milliseconds since it was created,
/// truncated into the wrapping [`Millis`] counter.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now(&self) -> Millis {
        Millis(self.origin.elapsed().as_millis() as u32)
    }
}

/// Where the sleep schedule gets its hour of day from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HourSource {
    /// Local wall-clock hour.
    WallClock,
    /// Pretend the session started at noon and advance one hour per real hour.
    Synthetic,
}

const SYNTHETIC_START_HOUR: u32 = 12;
const MS_PER_HOUR: u32 = 60 * 60 * 1000;

impl HourSource {
    pub fn hour(self, uptime: Millis) -> u8 {
        match self {
            HourSource::WallClock => {
                use chrono::Timelike;
                chrono::Local::now().hour() as u8
            }
            HourSource::Synthetic => synthetic_hour(uptime),
        }
    }
}

pub fn synthetic_hour(uptime: Millis) -> u8 {
    ((SYNTHETIC_START_HOUR + uptime.0 / MS_PER_HOUR) % 24) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_survives_counter_wrap() {
        let before = Millis(u32::MAX - 499);
        let after = before.plus(1_000);
        assert_eq!(after, Millis(500));
        assert_eq!(after.since(before), 1_000);
        assert!(after.has_elapsed(before, 1_000));
        assert!(!after.has_elapsed(before, 1_001));
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(Millis(0), Millis(0), 3_000), 0.0);
        assert_eq!(progress(Millis(1_500), Millis(0), 3_000), 0.5);
        assert_eq!(progress(Millis(9_000), Millis(0), 3_000), 1.0);
        assert_eq!(progress(Millis(5), Millis(0), 0), 1.0);
    }

    #[test]
    fn synthetic_hour_starts_at_noon_and_wraps() {
        assert_eq!(synthetic_hour(Millis(0)), 12);
        assert_eq!(synthetic_hour(Millis(MS_PER_HOUR * 3)), 15);
        assert_eq!(synthetic_hour(Millis(MS_PER_HOUR * 13)), 1);
    }
}
