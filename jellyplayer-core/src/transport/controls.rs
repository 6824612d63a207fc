//! Button state and auto-hide for the transport bar.

use std::time::{Duration, Instant};

use jellyplayer_model::{Ticks, format};
use serde::Serialize;

use crate::playback::navigation;
use crate::playback::{PlaybackStore, TransportCommand};
use crate::settings::SessionSettings;

/// Buttons and keys the control surface offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportAction {
    PlayPause,
    Rewind,
    FastForward,
    PreviousChapter,
    NextChapter,
    SkipSegment,
    PreviousItem,
    NextItem,
    ToggleFullscreen,
    TogglePictureInPicture,
    ToggleMute,
    Stop,
}

impl TransportAction {
    /// Rewind and fast-forward use the manual step, not the media-key one.
    pub fn command(self, settings: &SessionSettings) -> TransportCommand {
        match self {
            TransportAction::PlayPause => TransportCommand::TogglePlay,
            TransportAction::Rewind => {
                let step = settings.manual_seek_step.reversed();
                TransportCommand::SeekRelative(step)
            }
            TransportAction::FastForward => {
                TransportCommand::SeekRelative(settings.manual_seek_step)
            }
            TransportAction::PreviousChapter => {
                TransportCommand::PreviousChapter
            }
            TransportAction::NextChapter => TransportCommand::NextChapter,
            TransportAction::SkipSegment => TransportCommand::SkipSegment,
            TransportAction::PreviousItem => TransportCommand::PreviousItem,
            TransportAction::NextItem => TransportCommand::NextItem,
            TransportAction::ToggleFullscreen => {
                TransportCommand::ToggleFullscreen
            }
            TransportAction::TogglePictureInPicture => {
                TransportCommand::TogglePictureInPicture
            }
            TransportAction::ToggleMute => TransportCommand::ToggleMute,
            TransportAction::Stop => TransportCommand::Stop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipSegmentButton {
    pub label: &'static str,
    pub target: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlsView {
    pub title: Option<String>,
    pub episode_title: Option<String>,
    pub position: String,
    pub duration: String,
    pub playing: bool,
    pub has_chapters: bool,
    pub can_previous_chapter: bool,
    pub can_next_chapter: bool,
    /// Present only while a skippable segment is active.
    pub skip_segment: Option<SkipSegmentButton>,
    pub can_previous_item: bool,
    pub can_next_item: bool,
    pub fullscreen: bool,
    /// Hidden entirely on platforms without picture-in-picture.
    pub show_picture_in_picture: bool,
    pub picture_in_picture: bool,
    pub subtitles_available: bool,
    pub subtitles_enabled: bool,
    pub volume: f64,
    pub muted: bool,
}

pub fn controls_view(
    store: &PlaybackStore,
    settings: &SessionSettings,
) -> ControlsView {
    let clock = store.clock();
    let transport = store.transport();
    let media = store.media();
    let segment = store.segment();
    let tracks = store.tracks();
    let queue = store.queue();

    let duration = if clock.duration.is_zero() {
        "--:--:--".to_string()
    } else {
        format::clock_display(clock.duration)
    };

    let item = media.item.as_ref();
    let skip_segment = segment
        .segment
        .filter(|segment| segment.kind.offers_skip_button())
        .map(|segment| SkipSegmentButton {
            label: segment.kind.skip_label(),
            target: segment.end,
        });

    ControlsView {
        title: item.map(|item| item.title().to_string()),
        episode_title: item.and_then(|item| item.episode_title()),
        position: format::clock_display(clock.displayed),
        duration,
        playing: transport.playing,
        has_chapters: !media.chapters.is_empty(),
        can_previous_chapter: navigation::previous_chapter(
            &media.chapters,
            clock.current,
            settings.chapter_restart_threshold,
        )
        .is_some(),
        can_next_chapter: navigation::next_chapter(
            &media.chapters,
            clock.current,
        )
        .is_some(),
        skip_segment,
        can_previous_item: queue.has_previous,
        can_next_item: queue.has_next,
        fullscreen: transport.fullscreen,
        show_picture_in_picture: transport.picture_in_picture_supported,
        picture_in_picture: transport.picture_in_picture,
        subtitles_available: !tracks.subtitles.available.is_empty(),
        subtitles_enabled: tracks.subtitles.enabled,
        volume: transport.volume,
        muted: transport.muted,
    }
}

/// Shows the controls on activity and hides them after a quiet period
/// while playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsVisibility {
    visible: bool,
    last_activity: Instant,
    hide_after: Duration,
}

impl ControlsVisibility {
    pub fn new(hide_after: Duration, now: Instant) -> Self {
        Self {
            visible: true,
            last_activity: now,
            hide_after,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Pointer movement, key press or button use.
    pub fn touch(&mut self, now: Instant) -> bool {
        self.last_activity = now;
        let changed = !self.visible;
        self.visible = true;
        changed
    }

    /// Re-evaluate; paused playback keeps the controls up. Returns whether
    /// visibility changed.
    pub fn tick(&mut self, now: Instant, playing: bool) -> bool {
        if !playing {
            return self.touch(now);
        }
        let idle = now.saturating_duration_since(self.last_activity);
        if self.visible && idle > self.hide_after {
            self.visible = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyplayer_model::TickDelta;

    #[test]
    fn seek_buttons_use_the_manual_step() {
        let settings = SessionSettings::default();
        assert_eq!(
            TransportAction::Rewind.command(&settings),
            TransportCommand::SeekRelative(TickDelta::from_secs(-15))
        );
        assert_eq!(
            TransportAction::FastForward.command(&settings),
            TransportCommand::SeekRelative(TickDelta::from_secs(15))
        );
    }

    #[test]
    fn empty_store_renders_placeholders() {
        let settings = SessionSettings::default();
        let view = controls_view(&PlaybackStore::new(), &settings);
        assert_eq!(view.position, "00:00:00");
        assert_eq!(view.duration, "--:--:--");
        assert!(view.skip_segment.is_none());
        assert!(!view.show_picture_in_picture);
        assert!(view.title.is_none());
    }

    #[test]
    fn controls_hide_after_quiet_period_only_while_playing() {
        let start = Instant::now();
        let mut visibility =
            ControlsVisibility::new(Duration::from_secs(3), start);

        assert!(!visibility.tick(start + Duration::from_secs(2), true));
        assert!(visibility.is_visible());
        assert!(visibility.tick(start + Duration::from_secs(4), true));
        assert!(!visibility.is_visible());

        assert!(visibility.tick(start + Duration::from_secs(5), false));
        assert!(visibility.is_visible());
        assert!(!visibility.tick(start + Duration::from_secs(7), true));

        assert!(visibility.tick(start + Duration::from_secs(9), true));
        assert!(visibility.touch(start + Duration::from_secs(10)));
    }
}
