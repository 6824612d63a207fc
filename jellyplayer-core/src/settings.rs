use std::time::Duration;

use jellyplayer_model::{TickDelta, Ticks};

use crate::constants::{controls, reporting, seeking, trickplay, volume};
use crate::queue::RepeatMode;

/// Tunables a [`PlaybackSession`](crate::PlaybackSession) is built with.
///
/// Hosts normally derive this from the `jellyplayer-config` crate; the
/// defaults match the stock player.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub manual_seek_step: TickDelta,
    pub media_key_seek_step: TickDelta,
    pub chapter_restart_threshold: Ticks,
    pub trickplay_screen_fraction: f64,
    pub progress_interval: Duration,
    pub controls_auto_hide: Duration,
    pub repeat: RepeatMode,
    pub initial_volume: f64,
    pub initial_muted: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            manual_seek_step: TickDelta::from_secs(seeking::MANUAL_STEP_SECS),
            media_key_seek_step: TickDelta::from_secs(
                seeking::MEDIA_KEY_DEFAULT_SECS,
            ),
            chapter_restart_threshold: Ticks::from_secs(
                seeking::CHAPTER_RESTART_THRESHOLD_SECS,
            ),
            trickplay_screen_fraction: trickplay::SCREEN_FRACTION,
            progress_interval: Duration::from_millis(
                reporting::PROGRESS_INTERVAL_MS,
            ),
            controls_auto_hide: Duration::from_millis(controls::AUTO_HIDE_MS),
            repeat: RepeatMode::Off,
            initial_volume: volume::DEFAULT,
            initial_muted: false,
        }
    }
}
