//! Tick based time arithmetic.
//!
//! Jellyfin servers express every position and runtime as a count of
//! 100-nanosecond ticks. Everything inside the player keeps that
//! representation and only converts to seconds at the media element
//! boundary.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// Ticks in one second.
pub const TICKS_PER_SECOND: u64 = 10_000_000;
/// Ticks in one millisecond.
pub const TICKS_PER_MILLISECOND: u64 = 10_000;

/// A non-negative position or duration measured in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ticks(u64);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);

    pub const fn new(ticks: u64) -> Self {
        Ticks(ticks)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Ticks(secs.saturating_mul(TICKS_PER_SECOND))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Ticks(millis.saturating_mul(TICKS_PER_MILLISECOND))
    }

    /// Convert a media element position in seconds. Negative and non-finite
    /// inputs collapse to zero.
    pub fn from_seconds_f64(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Ticks::ZERO;
        }
        Ticks((secs * TICKS_PER_SECOND as f64).round() as u64)
    }

    pub fn from_duration(duration: Duration) -> Self {
        let ticks = duration.as_nanos() / 100;
        Ticks(u64::try_from(ticks).unwrap_or(u64::MAX))
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn as_seconds_f64(&self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    /// Milliseconds, rounded to the nearest whole millisecond.
    pub const fn to_millis(&self) -> u64 {
        self.0.saturating_add(TICKS_PER_MILLISECOND / 2) / TICKS_PER_MILLISECOND
    }

    /// Whole seconds, rounded from the rounded millisecond value.
    pub const fn to_secs(&self) -> u64 {
        self.to_millis().saturating_add(500) / 1000
    }

    pub const fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.0.saturating_mul(100))
    }

    /// Apply a signed offset, saturating at zero.
    pub const fn offset(&self, delta: TickDelta) -> Self {
        Ticks(self.0.saturating_add_signed(delta.0))
    }

    pub fn clamp_to(&self, max: Ticks) -> Self {
        Ticks(self.0.min(max.0))
    }

    pub const fn saturating_sub(&self, other: Ticks) -> Self {
        Ticks(self.0.saturating_sub(other.0))
    }
}

impl From<u64> for Ticks {
    fn from(ticks: u64) -> Self {
        Ticks(ticks)
    }
}

impl From<Duration> for Ticks {
    fn from(duration: Duration) -> Self {
        Ticks::from_duration(duration)
    }
}

impl Add for Ticks {
    type Output = Ticks;

    fn add(self, rhs: Ticks) -> Ticks {
        Ticks(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Ticks {
    type Output = Ticks;

    fn sub(self, rhs: Ticks) -> Ticks {
        self.saturating_sub(rhs)
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::clock_display(*self))
    }
}

/// A signed tick offset used for relative seeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TickDelta(i64);

impl TickDelta {
    pub const fn new(ticks: i64) -> Self {
        TickDelta(ticks)
    }

    pub const fn from_secs(secs: i64) -> Self {
        TickDelta(secs.saturating_mul(TICKS_PER_SECOND as i64))
    }

    pub fn from_seconds_f64(secs: f64) -> Self {
        if !secs.is_finite() {
            return TickDelta(0);
        }
        TickDelta((secs * TICKS_PER_SECOND as f64).round() as i64)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub const fn reversed(self) -> Self {
        TickDelta(self.0.saturating_neg())
    }
}
