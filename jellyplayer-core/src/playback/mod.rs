pub mod clock;
pub mod commands;
pub mod element;
pub mod navigation;
pub mod reporting;
pub mod resolver;
pub mod session;
pub mod simulated;
pub mod store;

pub use clock::PlaybackClock;
pub use commands::{TransportCommand, TransportHandle};
pub use element::{ElementError, ElementEvent, ElementEvents, MediaElement};
pub use reporting::{
    ChannelReporter, NoopReporter, PlaybackProgressInfo, PlaybackReport,
    PlaybackReporter, PlaybackStopInfo, RecordingReporter,
};
pub use resolver::{MediaLoad, MediaResolver, StaticResolver};
pub use session::PlaybackSession;
pub use simulated::{SeekSupport, SimulatedElement};
pub use store::{
    ClockSnapshot, MediaSnapshot, PlaybackStore, QueueSnapshot, Selected,
    SegmentSnapshot, TrackSnapshot, TransportSnapshot,
};
