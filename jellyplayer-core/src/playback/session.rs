//! The playback transport coordinator.
//!
//! A [`PlaybackSession`] owns one media element and is the single writer of
//! everything the player UI shows about it. Three sources feed it: element
//! events (time updates several times a second), scrubber gestures, and
//! discrete commands. The clock's seeking flag is what keeps them from
//! trampling each other; see [`PlaybackClock`].

use std::sync::Arc;

use jellyplayer_model::{
    ItemId, MediaTrack, PlaySessionId, PlayableItem, TickDelta, Ticks, TrackKind,
    TrackSelection,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::clock::PlaybackClock;
use super::commands::{TransportCommand, TransportHandle};
use super::element::{ElementError, ElementEvent, ElementEvents, MediaElement};
use super::navigation::{self, SegmentTracker};
use super::reporting::{
    NoopReporter, PlayMethod, PlaybackProgressInfo, PlaybackReport,
    PlaybackReporter, PlaybackStopInfo, ProgressTicker,
};
use super::resolver::{MediaLoad, MediaResolver, StaticResolver};
use super::store::{
    ClockSnapshot, MediaSnapshot, PlaybackStore, QueueSnapshot,
    SegmentSnapshot, TrackSnapshot, TransportSnapshot,
};
use crate::error::{PlayerError, Result};
use crate::media_session::MediaSessionBinding;
use crate::queue::{PlaybackQueue, RemoveOutcome, RepeatMode};
use crate::settings::SessionSettings;
use crate::trickplay::{self, PreviewBubble, TrickplayPreview};

const MIN_PLAYBACK_RATE: f64 = 0.25;
const MAX_PLAYBACK_RATE: f64 = 4.0;

#[derive(Debug)]
struct ActiveMedia {
    load: MediaLoad,
    play_session_id: PlaySessionId,
    start: Ticks,
    trickplay: Option<TrickplayPreview>,
}

enum Incoming {
    Element(ElementEvent),
    Command(TransportCommand),
}

async fn next_element_event(
    events: &mut Option<ElementEvents>,
) -> Option<ElementEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

pub struct PlaybackSession<E: MediaElement> {
    element: E,
    events: Option<ElementEvents>,
    handle: TransportHandle,
    commands: mpsc::UnboundedReceiver<TransportCommand>,
    settings: SessionSettings,
    store: PlaybackStore,
    clock: PlaybackClock,
    segments: SegmentTracker,
    queue: PlaybackQueue,
    transport: TransportSnapshot,
    tracks: TrackSnapshot,
    media: Option<ActiveMedia>,
    resolver: Arc<dyn MediaResolver>,
    reporter: Arc<dyn PlaybackReporter>,
    media_session: Option<MediaSessionBinding>,
    ticker: Option<ProgressTicker>,
    closed: bool,
}

impl<E: MediaElement> std::fmt::Debug for PlaybackSession<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("handle", &self.handle.id())
            .field("clock", &self.clock)
            .field("queue", &self.queue.current_index())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<E: MediaElement> PlaybackSession<E> {
    pub fn new(mut element: E, settings: SessionSettings) -> Self {
        let events = element.subscribe();
        let (handle, commands) = TransportHandle::channel();

        let transport = TransportSnapshot {
            volume: settings.initial_volume.clamp(0.0, 1.0),
            muted: settings.initial_muted,
            picture_in_picture_supported: element
                .supports_picture_in_picture(),
            ..TransportSnapshot::default()
        };
        element.set_volume(transport.volume);
        element.set_muted(transport.muted);

        let store = PlaybackStore::new();
        store.publish_transport(transport.clone());
        let queue = PlaybackQueue::new(settings.repeat);
        store.publish_queue(QueueSnapshot::from(&queue));

        debug!(session = handle.id(), "playback session created");

        Self {
            element,
            events: Some(events),
            handle,
            commands,
            settings,
            store,
            clock: PlaybackClock::new(),
            segments: SegmentTracker::default(),
            queue,
            transport,
            tracks: TrackSnapshot::default(),
            media: None,
            resolver: Arc::new(StaticResolver::default()),
            reporter: Arc::new(NoopReporter),
            media_session: None,
            ticker: None,
            closed: false,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn MediaResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn PlaybackReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn handle(&self) -> TransportHandle {
        self.handle.clone()
    }

    pub fn store(&self) -> &PlaybackStore {
        &self.store
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn current_load(&self) -> Option<&MediaLoad> {
        self.media.as_ref().map(|media| &media.load)
    }

    pub fn play_session_id(&self) -> Option<PlaySessionId> {
        self.media.as_ref().map(|media| media.play_session_id)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(PlayerError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn ensure_loaded(&self) -> Result<&ActiveMedia> {
        self.ensure_open()?;
        self.media.as_ref().ok_or(PlayerError::NoMediaLoaded)
    }

    // Publishing

    fn publish_clock(&mut self) {
        self.store.publish_clock(ClockSnapshot::from(&self.clock));
        if self.segments.update(self.clock.current()) {
            self.store.publish_segment(SegmentSnapshot {
                index: self.segments.current_index(),
                segment: self.segments.current().copied(),
            });
        }
    }

    fn publish_transport(&mut self) {
        self.store.publish_transport(self.transport.clone());
        self.publish_position();
    }

    fn publish_position(&mut self) {
        if let Some(binding) = self.media_session.as_mut() {
            binding.publish_position(
                self.clock.current(),
                self.clock.duration(),
                if self.transport.playing {
                    self.transport.playback_rate
                } else {
                    0.0
                },
            );
        }
    }

    fn publish_media(&mut self) {
        let snapshot = match &self.media {
            Some(media) => MediaSnapshot {
                item: Some(media.load.item.clone()),
                media_source_id: media.load.media_source_id.clone(),
                play_session_id: Some(media.play_session_id),
                chapters: media.load.chapters.clone(),
                segments: media.load.segments.clone(),
                trickplay: media.trickplay.as_ref().map(|p| *p.info()),
            },
            None => MediaSnapshot::default(),
        };
        self.store.publish_media(snapshot);
        self.store.publish_tracks(self.tracks.clone());
        self.store.publish_segment(SegmentSnapshot {
            index: self.segments.current_index(),
            segment: self.segments.current().copied(),
        });
        if let Some(binding) = self.media_session.as_mut() {
            let item = self.media.as_ref().map(|media| &media.load.item);
            binding.publish_metadata(item);
        }
    }

    fn publish_queue(&mut self) {
        self.store.publish_queue(QueueSnapshot::from(&self.queue));
    }

    // Reporting

    fn progress_info(&self) -> Option<PlaybackProgressInfo> {
        let media = self.media.as_ref()?;
        Some(PlaybackProgressInfo {
            item_id: media.load.item.id.clone(),
            media_source_id: media.load.media_source_id.clone(),
            play_session_id: media.play_session_id,
            play_method: PlayMethod::DirectPlay,
            position_ticks: self.clock.current(),
            playback_start_time_ticks: media.start,
            is_paused: !self.transport.playing,
            is_muted: self.transport.muted,
            volume_level: PlaybackProgressInfo::volume_level(
                self.transport.volume,
            ),
            playback_rate: self.transport.playback_rate,
            audio_stream_index: self.tracks.audio.active_index(),
            subtitle_stream_index: self.tracks.subtitles.active_index(),
            can_seek: self.transport.can_seek,
            repeat_mode: self.queue.repeat().report_name(),
        })
    }

    /// Send a progress report for the loaded item, if any.
    pub fn report_progress(&self) {
        if let Some(info) = self.progress_info() {
            self.reporter.report(PlaybackReport::Progress(info));
        }
    }

    fn report_stopped(&self, failed: bool) {
        if let Some(info) = self.progress_info() {
            self.reporter
                .report(PlaybackReport::Stopped(PlaybackStopInfo {
                    info,
                    failed,
                }));
        }
    }

    /// Ask the session to report progress every
    /// [`progress_interval`](SessionSettings::progress_interval). Needs a
    /// Tokio runtime; without one this only logs.
    pub fn start_progress_reporting(&mut self) {
        if self.closed || self.ticker.is_some() {
            return;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("no async runtime, periodic progress reports disabled");
            return;
        }
        self.ticker = Some(ProgressTicker::spawn(
            self.settings.progress_interval,
            self.handle.clone(),
        ));
    }

    pub fn stop_progress_reporting(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    // Loading

    /// Open `load` in the element and start playing it. Any previous item
    /// is reported as stopped first.
    pub fn load(&mut self, load: MediaLoad) -> Result<()> {
        self.ensure_open()?;
        self.report_stopped(false);

        let start = load.start();
        info!(
            item = %load.item.id,
            start = %start,
            "loading {}",
            load.item.episode_title().unwrap_or_else(|| load.item.name.clone())
        );

        self.clock.reset();
        if let Some(duration) = load.duration {
            self.clock.set_duration(duration);
        }

        if let Err(err) = self
            .element
            .open(&load.stream_url, start.as_seconds_f64())
        {
            warn!(item = %load.item.id, "element failed to open stream: {err}");
            self.unload();
            return Err(err.into());
        }

        self.clock.commit_seek(start);
        self.segments = SegmentTracker::new(load.segments.clone());

        let audio = TrackSelection::new(
            load.tracks_of(TrackKind::Audio),
            load.initial_audio(),
        );
        let subtitles = TrackSelection::new(
            load.tracks_of(TrackKind::Subtitle),
            load.initial_subtitle(),
        );
        if let Some(index) = audio.index
            && let Err(err) = self.element.select_audio_stream(index)
        {
            warn!(index, "could not select default audio stream: {err}");
        }
        if let Err(err) = self.element.select_subtitle_stream(subtitles.index) {
            warn!("could not apply default subtitle stream: {err}");
        }
        self.tracks = TrackSnapshot { audio, subtitles };

        self.transport.can_seek = load.can_seek;
        self.transport.playing = false;
        self.media = Some(ActiveMedia {
            load,
            play_session_id: PlaySessionId::new(),
            start,
            trickplay: None,
        });

        self.publish_clock();
        self.publish_media();

        match self.element.play() {
            Ok(()) => self.transport.playing = true,
            Err(err) => warn!("autoplay failed: {err}"),
        }
        self.publish_transport();

        if let Some(info) = self.progress_info() {
            self.reporter.report(PlaybackReport::Started(info));
        }
        Ok(())
    }

    fn unload(&mut self) {
        self.media = None;
        self.clock.reset();
        self.segments = SegmentTracker::default();
        self.tracks = TrackSnapshot::default();
        self.transport.playing = false;
        self.publish_clock();
        self.publish_media();
        self.publish_transport();
    }

    /// Stop playback of the current item without touching the queue.
    fn stop_media(&mut self) {
        self.report_stopped(false);
        self.element.stop();
        self.unload();
    }

    /// Stop playback and clear the queue.
    pub fn stop(&mut self) {
        if self.closed {
            return;
        }
        info!(session = self.handle.id(), "playback stopped");
        self.stop_media();
        self.queue.clear();
        self.publish_queue();
    }

    /// Run `change` against a copy of the queue and resolve the item it
    /// lands on. The queue and the playing media are only replaced once
    /// resolution succeeded.
    fn switch_queue<T>(
        &mut self,
        change: impl FnOnce(&mut PlaybackQueue) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        self.ensure_open()?;
        let mut queue = self.queue.clone();
        let Some(value) = change(&mut queue)? else {
            return Ok(None);
        };
        let item = queue.current_item().ok_or(PlayerError::NoMediaLoaded)?;
        let load = self.resolver.resolve(item)?;

        self.queue = queue;
        self.publish_queue();
        self.load(load)?;
        Ok(Some(value))
    }

    // Element events

    /// Apply a native time report.
    pub fn on_time_update(&mut self, seconds: f64) {
        if self.clock.on_time_update(seconds) {
            self.publish_clock();
        }
    }

    pub fn handle_element_event(&mut self, event: ElementEvent) {
        match event {
            ElementEvent::TimeUpdate(seconds) => self.on_time_update(seconds),
            ElementEvent::DurationChange(seconds) => {
                let duration = Ticks::from_seconds_f64(seconds);
                if !duration.is_zero() && self.clock.set_duration(duration) {
                    self.publish_clock();
                }
            }
            ElementEvent::Playing => {
                self.transport.playing = true;
                self.publish_transport();
            }
            ElementEvent::Paused => {
                self.transport.playing = false;
                self.publish_transport();
            }
            ElementEvent::Seeked(seconds) => {
                debug!(seconds, "element finished seeking");
            }
            ElementEvent::Ended => self.on_ended(),
            ElementEvent::Error(message) => {
                warn!("media element error: {message}");
                self.report_stopped(true);
                self.element.stop();
                self.unload();
            }
        }
    }

    fn on_ended(&mut self) {
        if self.media.is_none() {
            return;
        }
        debug!(repeat = ?self.queue.repeat(), "end of stream");
        match self.switch_queue(|queue| Ok(queue.advance_on_end())) {
            Ok(Some(_)) => {}
            Ok(None) => self.stop_media(),
            Err(err) => {
                warn!("could not continue with the next item: {err}");
                self.stop_media();
            }
        }
    }

    // Seeking

    /// Start or move a scrub. Element time reports are ignored until the
    /// seek is committed or cancelled.
    pub fn begin_seek(&mut self, target: Ticks) -> Ticks {
        let target = self.clock.begin_seek(target);
        self.publish_clock();
        target
    }

    /// Seek the element to `target` and make it the current position.
    ///
    /// Never fails: if the element rejects the seek the clock still shows
    /// the requested position until the element's next time report
    /// corrects it.
    pub fn commit_seek(&mut self, target: Ticks) -> Ticks {
        let target = self.clock.commit_seek(target);
        if let Err(err) = self.element.set_current_time(target.as_seconds_f64())
        {
            warn!(target = %target, "element rejected seek: {err}");
        }
        self.publish_clock();
        self.publish_position();
        target
    }

    pub fn cancel_seek(&mut self) {
        if self.clock.cancel_seek() {
            self.publish_clock();
        }
    }

    pub fn seek_relative(&mut self, delta: TickDelta) -> Ticks {
        let target = self.clock.relative_target(delta);
        self.commit_seek(target)
    }

    pub fn seek_to_chapter(&mut self, index: usize) -> Option<Ticks> {
        let start = self.media.as_ref()?.load.chapters.get(index)?.start;
        Some(self.commit_seek(start))
    }

    pub fn seek_to_next_chapter(&mut self) -> Option<Ticks> {
        let chapters = &self.media.as_ref()?.load.chapters;
        let index = navigation::next_chapter(chapters, self.clock.current())?;
        self.seek_to_chapter(index)
    }

    pub fn seek_to_previous_chapter(&mut self) -> Option<Ticks> {
        let chapters = &self.media.as_ref()?.load.chapters;
        let index = navigation::previous_chapter(
            chapters,
            self.clock.current(),
            self.settings.chapter_restart_threshold,
        )?;
        self.seek_to_chapter(index)
    }

    /// Jump to the end of the active media segment.
    pub fn skip_segment(&mut self) -> Option<Ticks> {
        let target = self.segments.skip_target()?;
        let kind = self.segments.current().map(|segment| segment.kind);
        debug!(kind = ?kind, "skipping segment");
        Some(self.commit_seek(target))
    }

    // Transport

    pub fn play(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        self.element.play()?;
        self.transport.playing = true;
        self.publish_transport();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        self.element.pause();
        self.transport.playing = false;
        self.publish_transport();
        self.report_progress();
        Ok(())
    }

    pub fn toggle_play(&mut self) -> Result<()> {
        if self.transport.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    pub fn toggle_fullscreen(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let next = !self.transport.fullscreen;
        self.element.set_fullscreen(next)?;
        self.transport.fullscreen = next;
        self.publish_transport();
        Ok(next)
    }

    pub fn toggle_picture_in_picture(&mut self) -> Result<bool> {
        self.ensure_loaded()?;
        if !self.transport.picture_in_picture_supported {
            return Err(ElementError::Unsupported("picture-in-picture").into());
        }
        let next = !self.transport.picture_in_picture;
        self.element.set_picture_in_picture(next)?;
        self.transport.picture_in_picture = next;
        self.publish_transport();
        Ok(next)
    }

    /// Clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.element.set_volume(volume);
        self.transport.volume = volume;
        self.publish_transport();
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.transport.muted;
        self.element.set_muted(muted);
        self.transport.muted = muted;
        self.publish_transport();
        muted
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> f64 {
        if !rate.is_finite() {
            return self.transport.playback_rate;
        }
        let rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        self.element.set_playback_rate(rate);
        self.transport.playback_rate = rate;
        self.publish_transport();
        rate
    }

    // Tracks

    pub fn select_audio_track(&mut self, index: i32) -> Result<()> {
        self.ensure_loaded()?;
        if self.tracks.audio.find(index).is_none() {
            return Err(PlayerError::TrackNotFound {
                kind: TrackKind::Audio,
                index,
            });
        }
        self.element.select_audio_stream(index)?;
        self.tracks.audio.index = Some(index);
        self.tracks.audio.enabled = true;
        self.store.publish_tracks(self.tracks.clone());
        self.report_progress();
        Ok(())
    }

    /// `None` turns subtitles off.
    pub fn select_subtitle_track(&mut self, index: Option<i32>) -> Result<()> {
        self.ensure_loaded()?;
        if let Some(index) = index
            && self.tracks.subtitles.find(index).is_none()
        {
            return Err(PlayerError::TrackNotFound {
                kind: TrackKind::Subtitle,
                index,
            });
        }
        self.element.select_subtitle_stream(index)?;
        self.tracks.subtitles.index = index;
        self.tracks.subtitles.enabled = index.is_some();
        self.store.publish_tracks(self.tracks.clone());
        self.report_progress();
        Ok(())
    }

    /// Turn subtitles off, or back on with the first available track.
    /// Returns whether subtitles are now enabled.
    pub fn toggle_subtitles(&mut self) -> Result<bool> {
        self.ensure_loaded()?;
        if self.tracks.subtitles.enabled {
            self.select_subtitle_track(None)?;
            return Ok(false);
        }
        let first = self
            .tracks
            .subtitles
            .available
            .first()
            .map(|track: &MediaTrack| track.index);
        match first {
            Some(index) => {
                self.select_subtitle_track(Some(index))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // Queue

    /// Replace the queue and start playing at `start`. An invalid `start`
    /// or an item that cannot be resolved leaves both the queue and
    /// playback untouched.
    pub fn set_queue(
        &mut self,
        items: Vec<PlayableItem>,
        start: usize,
    ) -> Result<()> {
        self.switch_queue(|queue| queue.set_queue(items, start).map(Some))?;
        Ok(())
    }

    /// Returns `false` at the end of the queue.
    pub fn next_item(&mut self) -> Result<bool> {
        let moved = self.switch_queue(|queue| Ok(queue.next()))?;
        Ok(moved.is_some())
    }

    pub fn previous_item(&mut self) -> Result<bool> {
        let moved = self.switch_queue(|queue| Ok(queue.previous()))?;
        Ok(moved.is_some())
    }

    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        self.switch_queue(|queue| queue.jump_to(index).map(Some))?;
        Ok(())
    }

    /// Removing the playing item loads whatever takes its place. When that
    /// item cannot be resolved nothing is removed.
    pub fn remove_from_queue(
        &mut self,
        id: &ItemId,
    ) -> Result<RemoveOutcome> {
        self.ensure_open()?;
        let mut queue = self.queue.clone();
        let outcome = queue.remove(id);
        match outcome {
            RemoveOutcome::CurrentReplaced(_) => {
                self.switch_queue(move |candidate| {
                    *candidate = queue;
                    Ok(Some(()))
                })?;
            }
            RemoveOutcome::Stopped => {
                self.queue = queue;
                self.publish_queue();
                self.stop_media();
            }
            RemoveOutcome::Removed => {
                self.queue = queue;
                self.publish_queue();
            }
            RemoveOutcome::NotFound => {}
        }
        Ok(outcome)
    }

    pub fn reorder_queue(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_open()?;
        self.queue.reorder(from, to)?;
        self.publish_queue();
        Ok(())
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.queue.set_repeat(repeat);
        self.publish_queue();
    }

    // Trickplay

    /// Pick the preview resolution for this item. Only the first call per
    /// item chooses; later calls return the same choice.
    pub fn select_trickplay(
        &mut self,
        display_width_px: f64,
        device_pixel_ratio: f64,
    ) -> Option<&TrickplayPreview> {
        let fraction = self.settings.trickplay_screen_fraction;
        let media = self.media.as_mut()?;
        if media.trickplay.is_none() {
            let info = trickplay::select_resolution(
                &media.load.trickplay,
                display_width_px,
                device_pixel_ratio,
                fraction,
            )?;
            debug!(width = info.width, "selected trickplay resolution");
            media.trickplay = Some(TrickplayPreview::new(
                *info,
                media.load.trickplay_endpoint.clone(),
            ));
            self.publish_media();
        }
        self.media.as_ref()?.trickplay.as_ref()
    }

    pub fn trickplay(&self) -> Option<&TrickplayPreview> {
        self.media.as_ref()?.trickplay.as_ref()
    }

    /// The scrubber bubble for `position`. Falls back to text only when
    /// there is no trickplay data.
    pub fn preview_at(&self, position: Ticks) -> PreviewBubble {
        let position = self.clock.clamp(position);
        match &self.media {
            Some(media) => trickplay::preview_bubble(
                position,
                &media.load.chapters,
                media.trickplay.as_ref(),
            ),
            None => trickplay::preview_bubble(
                position,
                &Default::default(),
                None,
            ),
        }
    }

    // Commands

    pub fn dispatch(&mut self, command: TransportCommand) -> Result<()> {
        self.ensure_open()?;
        match command {
            TransportCommand::Play => self.play()?,
            TransportCommand::Pause => self.pause()?,
            TransportCommand::TogglePlay => self.toggle_play()?,
            TransportCommand::Stop => self.stop(),
            TransportCommand::SeekTo(target) => {
                self.commit_seek(target);
            }
            TransportCommand::SeekRelative(delta) => {
                self.seek_relative(delta);
            }
            TransportCommand::NextChapter => {
                self.seek_to_next_chapter();
            }
            TransportCommand::PreviousChapter => {
                self.seek_to_previous_chapter();
            }
            TransportCommand::SkipSegment => {
                self.skip_segment();
            }
            TransportCommand::NextItem => {
                self.next_item()?;
            }
            TransportCommand::PreviousItem => {
                self.previous_item()?;
            }
            TransportCommand::ToggleFullscreen => {
                self.toggle_fullscreen()?;
            }
            TransportCommand::TogglePictureInPicture => {
                self.toggle_picture_in_picture()?;
            }
            TransportCommand::ToggleMute => {
                self.toggle_mute();
            }
            TransportCommand::SetVolume(volume) => self.set_volume(volume),
            TransportCommand::SetRepeat(repeat) => self.set_repeat(repeat),
            TransportCommand::ReportProgress => self.report_progress(),
        }
        Ok(())
    }

    fn apply(&mut self, incoming: Incoming) {
        match incoming {
            Incoming::Element(event) => self.handle_element_event(event),
            Incoming::Command(command) => {
                let label = format!("{command:?}");
                if let Err(err) = self.dispatch(command) {
                    debug!(command = label, "transport command failed: {err}");
                }
            }
        }
    }

    /// Drain everything queued by the element and by transport handles
    /// without waiting. Returns how many messages were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while !self.closed {
            let next = self
                .events
                .as_mut()
                .and_then(|rx| rx.try_recv().ok())
                .map(Incoming::Element)
                .or_else(|| {
                    self.commands.try_recv().ok().map(Incoming::Command)
                });
            let Some(incoming) = next else {
                break;
            };
            self.apply(incoming);
            applied += 1;
        }
        applied
    }

    /// Wait for the next element event or command and apply it. Returns
    /// `false` once the session is closed.
    pub async fn process_next(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let incoming = tokio::select! {
            Some(event) = next_element_event(&mut self.events) => {
                Incoming::Element(event)
            }
            Some(command) = self.commands.recv() => Incoming::Command(command),
            else => return false,
        };
        self.apply(incoming);
        !self.closed
    }

    // Media session

    /// Take over OS media keys for this session.
    pub fn attach_media_session(&mut self, mut binding: MediaSessionBinding) {
        binding.bind(&self.handle);
        self.media_session = Some(binding);
        let item = self.media.as_ref().map(|media| media.load.item.clone());
        if let Some(binding) = self.media_session.as_mut() {
            binding.publish_metadata(item.as_ref());
        }
        self.publish_position();
    }

    /// Hand the binding back, still registered, so a replacement session
    /// can re-bind it.
    pub fn detach_media_session(&mut self) -> Option<MediaSessionBinding> {
        self.media_session.take()
    }

    // Teardown

    /// Stop playback, report it, cancel background work, release the media
    /// keys and drop the element subscription. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.stop_progress_reporting();
        self.stop_media();
        self.queue.clear();
        self.publish_queue();
        if let Some(mut binding) = self.media_session.take() {
            binding.unbind();
        }
        self.events = None;
        self.commands.close();
        self.closed = true;
        debug!(session = self.handle.id(), "playback session closed");
    }
}

impl<E: MediaElement> Drop for PlaybackSession<E> {
    fn drop(&mut self) {
        self.close();
    }
}
