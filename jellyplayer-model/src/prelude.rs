//! Player focused snapshot of the model surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in the transport or presentation layers.

pub use super::chapter::{Chapter, ChapterList};
pub use super::format;
pub use super::ids::{ItemId, MediaSourceId, PlaySessionId};
pub use super::item::{ItemKind, PlayableItem};
pub use super::segment::{MediaSegment, MediaSegmentKind, SegmentList};
pub use super::ticks::{TickDelta, Ticks};
pub use super::tracks::{MediaTrack, TrackKind, TrackSelection};
pub use super::trickplay::{
    TrickplayInfo, TrickplayManifest, TrickplayResolutionSet,
};
