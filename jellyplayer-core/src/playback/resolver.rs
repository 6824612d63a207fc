//! Turning a queued item into something the element can open.

use std::collections::HashMap;

use jellyplayer_model::{
    ChapterList, ItemId, MediaSourceId, MediaTrack, PlayableItem, SegmentList,
    Ticks, TrackKind, TrickplayResolutionSet,
};
use parking_lot::RwLock;
use url::Url;

use crate::error::{PlayerError, Result};
use crate::trickplay::TrickplayEndpoint;

/// Everything fetched from the server for one item, already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaLoad {
    pub item: PlayableItem,
    pub media_source_id: Option<MediaSourceId>,
    pub stream_url: Url,
    /// Where to start; falls back to the item's resume position.
    pub start_position: Option<Ticks>,
    /// Server-side runtime, used until the element reports its own.
    pub duration: Option<Ticks>,
    pub chapters: ChapterList,
    pub segments: SegmentList,
    pub trickplay: TrickplayResolutionSet,
    pub trickplay_endpoint: Option<TrickplayEndpoint>,
    pub tracks: Vec<MediaTrack>,
    pub default_audio_index: Option<i32>,
    pub default_subtitle_index: Option<i32>,
    pub can_seek: bool,
}

impl MediaLoad {
    pub fn new(item: PlayableItem, stream_url: Url) -> Self {
        let duration = item.runtime;
        Self {
            item,
            media_source_id: None,
            stream_url,
            start_position: None,
            duration,
            chapters: ChapterList::default(),
            segments: SegmentList::default(),
            trickplay: TrickplayResolutionSet::default(),
            trickplay_endpoint: None,
            tracks: Vec::new(),
            default_audio_index: None,
            default_subtitle_index: None,
            can_seek: true,
        }
    }

    pub fn with_media_source(mut self, id: MediaSourceId) -> Self {
        self.media_source_id = Some(id);
        self
    }

    pub fn with_start(mut self, position: Ticks) -> Self {
        self.start_position = Some(position);
        self
    }

    pub fn with_duration(mut self, duration: Ticks) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_chapters(mut self, chapters: ChapterList) -> Self {
        self.chapters = chapters;
        self
    }

    pub fn with_segments(mut self, segments: SegmentList) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_trickplay(
        mut self,
        resolutions: TrickplayResolutionSet,
        endpoint: Option<TrickplayEndpoint>,
    ) -> Self {
        self.trickplay = resolutions;
        self.trickplay_endpoint = endpoint;
        self
    }

    pub fn with_tracks(mut self, tracks: Vec<MediaTrack>) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn with_default_streams(
        mut self,
        audio: Option<i32>,
        subtitle: Option<i32>,
    ) -> Self {
        self.default_audio_index = audio;
        self.default_subtitle_index = subtitle;
        self
    }

    pub fn start(&self) -> Ticks {
        self.start_position
            .or(self.item.resume_position)
            .unwrap_or(Ticks::ZERO)
    }

    pub fn tracks_of(&self, kind: TrackKind) -> Vec<MediaTrack> {
        self.tracks
            .iter()
            .filter(|track| track.kind == kind)
            .cloned()
            .collect()
    }

    /// The server default, else the first audio stream.
    pub fn initial_audio(&self) -> Option<i32> {
        self.pick_initial(TrackKind::Audio, self.default_audio_index)
    }

    /// The server default, else the first subtitle stream, else disabled.
    pub fn initial_subtitle(&self) -> Option<i32> {
        self.pick_initial(TrackKind::Subtitle, self.default_subtitle_index)
    }

    fn pick_initial(
        &self,
        kind: TrackKind,
        default: Option<i32>,
    ) -> Option<i32> {
        let of_kind = || self.tracks.iter().filter(move |t| t.kind == kind);
        default
            .filter(|index| of_kind().any(|track| track.index == *index))
            .or_else(|| of_kind().next().map(|track| track.index))
    }
}

/// Source of [`MediaLoad`]s for queue-driven playback. Implemented by the
/// host on top of its server client.
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, item: &PlayableItem) -> Result<MediaLoad>;
}

/// Resolver backed by a fixed table, for offline playback and tests.
#[derive(Debug, Default)]
pub struct StaticResolver {
    loads: RwLock<HashMap<ItemId, MediaLoad>>,
}

impl StaticResolver {
    pub fn new(loads: impl IntoIterator<Item = MediaLoad>) -> Self {
        Self {
            loads: RwLock::new(
                loads
                    .into_iter()
                    .map(|load| (load.item.id.clone(), load))
                    .collect(),
            ),
        }
    }

    pub fn insert(&self, load: MediaLoad) {
        self.loads.write().insert(load.item.id.clone(), load);
    }
}

impl MediaResolver for StaticResolver {
    fn resolve(&self, item: &PlayableItem) -> Result<MediaLoad> {
        self.loads
            .read()
            .get(&item.id)
            .cloned()
            .ok_or_else(|| PlayerError::Resolve {
                item: item.id.clone(),
                reason: "no media registered for item".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyplayer_model::ItemKind;

    fn load() -> MediaLoad {
        let item = PlayableItem::new(
            ItemId::new("ep1").unwrap(),
            "Pilot",
            ItemKind::Episode,
        )
        .with_runtime(Ticks::from_secs(1800));
        MediaLoad::new(item, Url::parse("https://media.example/ep1").unwrap())
    }

    fn track(index: i32, kind: TrackKind) -> MediaTrack {
        MediaTrack::new(index, kind)
    }

    #[test]
    fn subtitle_default_falls_back_to_first_then_disabled() {
        let base = load().with_tracks(vec![
            track(1, TrackKind::Audio),
            track(3, TrackKind::Subtitle),
            track(4, TrackKind::Subtitle),
        ]);
        assert_eq!(
            base.clone()
                .with_default_streams(None, Some(4))
                .initial_subtitle(),
            Some(4)
        );
        assert_eq!(base.initial_subtitle(), Some(3));
        assert_eq!(base.initial_audio(), Some(1));
        assert_eq!(load().initial_subtitle(), None);
    }

    #[test]
    fn unknown_default_index_is_ignored() {
        let load = load()
            .with_tracks(vec![track(2, TrackKind::Audio)])
            .with_default_streams(Some(9), None);
        assert_eq!(load.initial_audio(), Some(2));
    }

    #[test]
    fn start_prefers_explicit_position_over_resume_point() {
        let mut load = load();
        load.item.resume_position = Some(Ticks::from_secs(300));
        assert_eq!(load.start(), Ticks::from_secs(300));
        assert_eq!(load.with_start(Ticks::ZERO).start(), Ticks::ZERO);
    }

    #[test]
    fn static_resolver_reports_missing_items() {
        let resolver = StaticResolver::new([load()]);
        let item = load().item;
        assert!(resolver.resolve(&item).is_ok());

        let other = PlayableItem::new(
            ItemId::new("nope").unwrap(),
            "Missing",
            ItemKind::Movie,
        );
        assert!(matches!(
            resolver.resolve(&other),
            Err(PlayerError::Resolve { .. })
        ));
    }
}
