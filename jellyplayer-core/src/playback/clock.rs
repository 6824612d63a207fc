//! The authoritative media clock.
//!
//! The native element reports its position asynchronously and sometimes
//! late. While the user is scrubbing, those reports must not drag the
//! playhead back, so the clock keeps a pending target that the UI shows
//! instead of the reported position until the seek is committed.

use jellyplayer_model::{TickDelta, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackClock {
    current: Ticks,
    duration: Ticks,
    seeking: bool,
    pending: Ticks,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last position reported by the element or set by a committed seek.
    pub fn current(&self) -> Ticks {
        self.current
    }

    /// Zero until the element or server has reported a length.
    pub fn duration(&self) -> Ticks {
        self.duration
    }

    pub fn has_duration(&self) -> bool {
        !self.duration.is_zero()
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn pending_seek(&self) -> Option<Ticks> {
        self.seeking.then_some(self.pending)
    }

    /// The position the UI should show.
    pub fn displayed(&self) -> Ticks {
        if self.seeking {
            self.pending
        } else {
            self.current
        }
    }

    pub fn clamp(&self, target: Ticks) -> Ticks {
        if self.has_duration() {
            target.clamp_to(self.duration)
        } else {
            target
        }
    }

    pub fn set_duration(&mut self, duration: Ticks) -> bool {
        if self.duration == duration {
            return false;
        }
        self.duration = duration;
        self.current = self.clamp(self.current);
        self.pending = self.clamp(self.pending);
        true
    }

    /// Apply an element time report. Ignored while a seek is pending.
    pub fn on_time_update(&mut self, seconds: f64) -> bool {
        if self.seeking {
            return false;
        }
        let next = self.clamp(Ticks::from_seconds_f64(seconds));
        if next == self.current {
            return false;
        }
        self.current = next;
        true
    }

    /// Start or move a scrub. `current` stays untouched.
    pub fn begin_seek(&mut self, target: Ticks) -> Ticks {
        let target = self.clamp(target);
        self.seeking = true;
        self.pending = target;
        target
    }

    /// Finish a seek at `target` and return the clamped position.
    pub fn commit_seek(&mut self, target: Ticks) -> Ticks {
        let target = self.clamp(target);
        self.seeking = false;
        self.pending = Ticks::ZERO;
        self.current = target;
        target
    }

    /// Abandon a scrub without moving.
    pub fn cancel_seek(&mut self) -> bool {
        let was_seeking = self.seeking;
        self.seeking = false;
        self.pending = Ticks::ZERO;
        was_seeking
    }

    /// Target of a relative jump from the current position.
    pub fn relative_target(&self, delta: TickDelta) -> Ticks {
        self.clamp(self.current.offset(delta))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
