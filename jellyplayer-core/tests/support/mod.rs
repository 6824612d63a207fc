//! Shared fixtures for core integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use jellyplayer_core::{
    MediaLoad, PlaybackSession, RecordingReporter, SessionSettings,
    SimulatedElement, StaticResolver,
};
use jellyplayer_model::{
    Chapter, ChapterList, ItemId, ItemKind, MediaSegment, MediaSegmentKind,
    PlayableItem, SegmentList, Ticks,
};
use url::Url;

pub const FEATURE_SECS: u64 = 3600;

pub fn item(id: &str) -> PlayableItem {
    PlayableItem::new(ItemId::new(id).expect("valid id"), id, ItemKind::Movie)
        .with_runtime(Ticks::from_secs(FEATURE_SECS))
}

pub fn stream_url(id: &str) -> Url {
    Url::parse(&format!("https://media.example/Videos/{id}/stream"))
        .expect("valid url")
}

pub fn chapters() -> ChapterList {
    ChapterList::new(vec![
        Chapter::new("Prologue", Ticks::from_secs(0)),
        Chapter::new("Arrival", Ticks::from_secs(300)),
        Chapter::new("The Vault", Ticks::from_secs(1200)),
        Chapter::new("Aftermath", Ticks::from_secs(3000)),
    ])
}

pub fn intro(start_secs: u64, end_secs: u64) -> MediaSegment {
    MediaSegment::new(
        MediaSegmentKind::Intro,
        Ticks::from_secs(start_secs),
        Ticks::from_secs(end_secs),
    )
    .expect("valid segment")
}

pub fn credits(start_secs: u64, end_secs: u64) -> MediaSegment {
    MediaSegment::new(
        MediaSegmentKind::Outro,
        Ticks::from_secs(start_secs),
        Ticks::from_secs(end_secs),
    )
    .expect("valid segment")
}

pub fn load(id: &str) -> MediaLoad {
    MediaLoad::new(item(id), stream_url(id))
        .with_start(Ticks::ZERO)
        .with_chapters(chapters())
        .with_segments(SegmentList::new(vec![intro(0, 30)]))
}

pub struct Harness {
    pub session: PlaybackSession<SimulatedElement>,
    pub element: SimulatedElement,
    pub reporter: RecordingReporter,
    pub resolver: Arc<StaticResolver>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(SessionSettings::default())
    }

    pub fn with_settings(settings: SessionSettings) -> Self {
        let element =
            SimulatedElement::new().with_media_duration(FEATURE_SECS as f64);
        Self::with_element(element, settings)
    }

    pub fn with_element(
        element: SimulatedElement,
        settings: SessionSettings,
    ) -> Self {
        let reporter = RecordingReporter::new();
        let resolver = Arc::new(StaticResolver::new(
            ["a", "b", "c"].into_iter().map(load),
        ));
        let session = PlaybackSession::new(element.clone(), settings)
            .with_resolver(resolver.clone())
            .with_reporter(Arc::new(reporter.clone()));
        Self {
            session,
            element,
            reporter,
            resolver,
        }
    }

    /// Harness with item `a` loaded and all startup events applied.
    pub fn loaded() -> Self {
        let mut harness = Self::new();
        harness.session.load(load("a")).expect("load succeeds");
        harness.session.pump();
        harness
    }

    pub fn queue_ids(&self) -> Vec<String> {
        self.session
            .queue()
            .items()
            .iter()
            .map(|item| item.id.as_str().to_string())
            .collect()
    }

    pub fn current_id(&self) -> Option<String> {
        self.session
            .current_load()
            .map(|load| load.item.id.as_str().to_string())
    }
}
