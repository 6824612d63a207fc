//! Core data model definitions shared across Jellyplayer crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod chapter;
pub mod error;
pub mod format;
pub mod ids;
pub mod item;
pub mod prelude;
pub mod segment;
pub mod ticks;
pub mod tracks;
pub mod trickplay;

// Intentionally curated re-exports for downstream consumers.
pub use chapter::{Chapter, ChapterList};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{ItemId, MediaSourceId, PlaySessionId};
pub use item::{ItemKind, PlayableItem};
pub use segment::{MediaSegment, MediaSegmentKind, SegmentList};
pub use ticks::{TICKS_PER_MILLISECOND, TICKS_PER_SECOND, TickDelta, Ticks};
pub use tracks::{MediaTrack, TrackKind, TrackSelection};
pub use trickplay::{
    TrickplayInfo, TrickplayManifest, TrickplayResolutionSet,
};
