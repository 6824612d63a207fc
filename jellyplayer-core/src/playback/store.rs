//! Published playback state.
//!
//! The session is the only writer. Every slice lives in its own `watch`
//! channel so a subscriber to, say, the transport flags is not woken by the
//! clock ticking several times a second. [`Selected`] narrows a slice
//! further to a single derived value.

use jellyplayer_model::{
    ChapterList, MediaSegment, MediaSourceId, PlaySessionId, PlayableItem,
    SegmentList, Ticks, TrackSelection, TrickplayInfo,
};
use serde::Serialize;
use tokio::sync::watch;

use super::clock::PlaybackClock;
use crate::queue::{PlaybackQueue, RepeatMode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClockSnapshot {
    pub current: Ticks,
    pub duration: Ticks,
    pub seeking: bool,
    pub pending: Option<Ticks>,
    pub displayed: Ticks,
}

impl From<&PlaybackClock> for ClockSnapshot {
    fn from(clock: &PlaybackClock) -> Self {
        Self {
            current: clock.current(),
            duration: clock.duration(),
            seeking: clock.is_seeking(),
            pending: clock.pending_seek(),
            displayed: clock.displayed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportSnapshot {
    pub playing: bool,
    pub fullscreen: bool,
    pub picture_in_picture: bool,
    pub picture_in_picture_supported: bool,
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
    pub can_seek: bool,
}

impl Default for TransportSnapshot {
    fn default() -> Self {
        Self {
            playing: false,
            fullscreen: false,
            picture_in_picture: false,
            picture_in_picture_supported: false,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            can_seek: true,
        }
    }
}

/// What is loaded. Replaced wholesale on every item change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaSnapshot {
    pub item: Option<PlayableItem>,
    pub media_source_id: Option<MediaSourceId>,
    pub play_session_id: Option<PlaySessionId>,
    pub chapters: ChapterList,
    pub segments: SegmentList,
    pub trickplay: Option<TrickplayInfo>,
}

impl MediaSnapshot {
    pub fn is_loaded(&self) -> bool {
        self.item.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentSnapshot {
    pub index: Option<usize>,
    pub segment: Option<MediaSegment>,
}

impl SegmentSnapshot {
    /// `-1` when no segment is active, for hosts that want the flat index.
    pub fn flat_index(&self) -> i64 {
        self.index
            .and_then(|idx| i64::try_from(idx).ok())
            .unwrap_or(-1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackSnapshot {
    pub audio: TrackSelection,
    pub subtitles: TrackSelection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub items: Vec<PlayableItem>,
    pub current: Option<usize>,
    pub repeat: RepeatMode,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<&PlaybackQueue> for QueueSnapshot {
    fn from(queue: &PlaybackQueue) -> Self {
        Self {
            items: queue.items().to_vec(),
            current: queue.current_index(),
            repeat: queue.repeat(),
            has_next: queue.has_next(),
            has_previous: queue.has_previous(),
        }
    }
}

/// Replace the channel value only if it differs, so receivers are not
/// notified for no-op writes.
fn publish<T: PartialEq>(tx: &watch::Sender<T>, value: T) -> bool {
    tx.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    })
}

#[derive(Debug)]
pub struct PlaybackStore {
    clock: watch::Sender<ClockSnapshot>,
    transport: watch::Sender<TransportSnapshot>,
    media: watch::Sender<MediaSnapshot>,
    segment: watch::Sender<SegmentSnapshot>,
    tracks: watch::Sender<TrackSnapshot>,
    queue: watch::Sender<QueueSnapshot>,
}

impl Default for PlaybackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackStore {
    pub fn new() -> Self {
        Self {
            clock: watch::Sender::new(ClockSnapshot::default()),
            transport: watch::Sender::new(TransportSnapshot::default()),
            media: watch::Sender::new(MediaSnapshot::default()),
            segment: watch::Sender::new(SegmentSnapshot::default()),
            tracks: watch::Sender::new(TrackSnapshot::default()),
            queue: watch::Sender::new(QueueSnapshot::default()),
        }
    }

    pub fn clock(&self) -> ClockSnapshot {
        *self.clock.borrow()
    }

    pub fn transport(&self) -> TransportSnapshot {
        self.transport.borrow().clone()
    }

    pub fn media(&self) -> MediaSnapshot {
        self.media.borrow().clone()
    }

    pub fn segment(&self) -> SegmentSnapshot {
        *self.segment.borrow()
    }

    pub fn tracks(&self) -> TrackSnapshot {
        self.tracks.borrow().clone()
    }

    pub fn queue(&self) -> QueueSnapshot {
        self.queue.borrow().clone()
    }

    pub fn subscribe_clock(&self) -> watch::Receiver<ClockSnapshot> {
        self.clock.subscribe()
    }

    pub fn subscribe_transport(&self) -> watch::Receiver<TransportSnapshot> {
        self.transport.subscribe()
    }

    pub fn subscribe_media(&self) -> watch::Receiver<MediaSnapshot> {
        self.media.subscribe()
    }

    pub fn subscribe_segment(&self) -> watch::Receiver<SegmentSnapshot> {
        self.segment.subscribe()
    }

    pub fn subscribe_tracks(&self) -> watch::Receiver<TrackSnapshot> {
        self.tracks.subscribe()
    }

    pub fn subscribe_queue(&self) -> watch::Receiver<QueueSnapshot> {
        self.queue.subscribe()
    }

    pub(crate) fn publish_clock(&self, snapshot: ClockSnapshot) -> bool {
        publish(&self.clock, snapshot)
    }

    pub(crate) fn publish_transport(&self, snapshot: TransportSnapshot) -> bool {
        publish(&self.transport, snapshot)
    }

    pub(crate) fn publish_media(&self, snapshot: MediaSnapshot) -> bool {
        publish(&self.media, snapshot)
    }

    pub(crate) fn publish_segment(&self, snapshot: SegmentSnapshot) -> bool {
        publish(&self.segment, snapshot)
    }

    pub(crate) fn publish_tracks(&self, snapshot: TrackSnapshot) -> bool {
        publish(&self.tracks, snapshot)
    }

    pub(crate) fn publish_queue(&self, snapshot: QueueSnapshot) -> bool {
        publish(&self.queue, snapshot)
    }
}

type Selector<S, T> = Box<dyn Fn(&S) -> T + Send + Sync>;

/// A subscription to one derived value of a slice. Wakes only when that
/// value changes.
pub struct Selected<S, T> {
    rx: watch::Receiver<S>,
    select: Selector<S, T>,
    last: T,
}

impl<S, T> std::fmt::Debug for Selected<S, T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selected").field("last", &self.last).finish()
    }
}

impl<S, T> Selected<S, T>
where
    T: Clone + PartialEq,
{
    pub fn new(
        mut rx: watch::Receiver<S>,
        select: impl Fn(&S) -> T + Send + Sync + 'static,
    ) -> Self {
        let last = select(&*rx.borrow_and_update());
        Self {
            rx,
            select: Box::new(select),
            last,
        }
    }

    pub fn get(&self) -> &T {
        &self.last
    }

    /// Non-blocking check. Returns the new value if it changed since the
    /// last call.
    pub fn poll(&mut self) -> Option<T> {
        if !self.rx.has_changed().unwrap_or(false) {
            return None;
        }
        let next = (self.select)(&*self.rx.borrow_and_update());
        self.accept(next)
    }

    /// Wait for the selected value to change. `None` once the session is
    /// gone.
    pub async fn changed(&mut self) -> Option<T> {
        loop {
            self.rx.changed().await.ok()?;
            let next = (self.select)(&*self.rx.borrow_and_update());
            if let Some(value) = self.accept(next) {
                return Some(value);
            }
        }
    }

    fn accept(&mut self, next: T) -> Option<T> {
        if next == self.last {
            return None;
        }
        self.last = next.clone();
        Some(next)
    }
}
