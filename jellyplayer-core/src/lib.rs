//! # Jellyplayer Core
//!
//! Playback transport coordinator for the Jellyplayer client.
//!
//! ## Overview
//!
//! A [`PlaybackSession`] sits between a native [`MediaElement`] and the
//! player UI. It reconciles the element's continuously advancing clock with
//! scrubbing, chapter jumps, segment skips and OS media keys, and publishes
//! the result through a [`PlaybackStore`] that views subscribe to.
//!
//! - [`playback`]: the session, its clock, the published store and the
//!   element seam
//! - [`queue`]: what plays next
//! - [`trickplay`]: scrub-preview thumbnail selection and tile math
//! - [`transport`]: seek bar gestures and control button state
//! - [`media_session`]: OS media-key integration
//!
//! ## Examples
//!
//! ```no_run
//! use jellyplayer_core::{
//!     MediaLoad, PlaybackSession, SessionSettings, SimulatedElement,
//! };
//! use jellyplayer_model::{ItemId, ItemKind, PlayableItem, Ticks};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let element = SimulatedElement::new().with_media_duration(5400.0);
//! let mut session = PlaybackSession::new(element, SessionSettings::default());
//!
//! let item = PlayableItem::new(ItemId::new("f00d")?, "Feature", ItemKind::Movie);
//! let url = "https://media.example/Videos/f00d/stream".parse()?;
//! session.load(MediaLoad::new(item, url))?;
//!
//! session.begin_seek(Ticks::from_secs(600));
//! session.commit_seek(Ticks::from_secs(630));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod constants;
pub mod error;
pub mod media_session;
pub mod playback;
pub mod queue;
pub mod settings;
pub mod transport;
pub mod trickplay;

pub use error::{PlayerError, Result};
pub use media_session::{
    ActionDetails, ActionHandler, MediaMetadata, MediaSessionAction,
    MediaSessionBinding, MediaSessionError, MediaSessionPlatform,
};
pub use playback::{
    ChannelReporter, ElementError, ElementEvent, MediaElement, MediaLoad,
    MediaResolver, NoopReporter, PlaybackClock, PlaybackReport,
    PlaybackReporter, PlaybackSession, PlaybackStore, RecordingReporter,
    SeekSupport, SimulatedElement, StaticResolver, TransportCommand,
    TransportHandle,
};
pub use queue::{PlaybackQueue, RemoveOutcome, RepeatMode};
pub use settings::SessionSettings;
pub use trickplay::{PreviewBubble, TrickplayEndpoint, TrickplayPreview};
