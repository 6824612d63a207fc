//! OS media-key and now-playing integration.
//!
//! The platform surface is abstract: MPRIS, SMTC and Now Playing all boil
//! down to "register a handler per action" plus metadata and position
//! updates. Platform failures never reach the user; an unsupported action
//! is logged and skipped.

use std::fmt;

use jellyplayer_model::{PlayableItem, TickDelta, Ticks};
use thiserror::Error;
use tracing::{debug, warn};

use crate::playback::commands::{TransportCommand, TransportHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaSessionAction {
    Play,
    Pause,
    Stop,
    SeekForward,
    SeekBackward,
    NextTrack,
    PreviousTrack,
}

impl MediaSessionAction {
    pub const ALL: [MediaSessionAction; 7] = [
        MediaSessionAction::Play,
        MediaSessionAction::Pause,
        MediaSessionAction::Stop,
        MediaSessionAction::SeekForward,
        MediaSessionAction::SeekBackward,
        MediaSessionAction::NextTrack,
        MediaSessionAction::PreviousTrack,
    ];
}

/// Extra data some platforms attach to an action.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionDetails {
    /// Seek offset in seconds, always positive.
    pub seek_offset: Option<f64>,
}

pub type ActionHandler = Box<dyn Fn(ActionDetails) + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaSessionError {
    #[error("Media session is not available on this platform")]
    Unavailable,

    #[error("Action {0:?} is not supported")]
    UnsupportedAction(MediaSessionAction),

    #[error("Platform error: {0}")]
    Platform(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaMetadata {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl From<&PlayableItem> for MediaMetadata {
    fn from(item: &PlayableItem) -> Self {
        let title = item.episode_title().unwrap_or_else(|| item.name.clone());
        let artist = if item.artists.is_empty() {
            item.series_name.clone()
        } else {
            Some(item.artists.join(", "))
        };
        Self {
            title,
            artist,
            album: None,
        }
    }
}

pub trait MediaSessionPlatform: Send {
    /// `None` unregisters.
    fn set_action_handler(
        &mut self,
        action: MediaSessionAction,
        handler: Option<ActionHandler>,
    ) -> Result<(), MediaSessionError>;

    fn set_metadata(
        &mut self,
        metadata: Option<MediaMetadata>,
    ) -> Result<(), MediaSessionError>;

    fn set_position_state(
        &mut self,
        position: Ticks,
        duration: Ticks,
        rate: f64,
    ) -> Result<(), MediaSessionError>;
}

fn handler_for(
    action: MediaSessionAction,
    handle: TransportHandle,
    default_step: TickDelta,
) -> ActionHandler {
    let step = move |details: ActionDetails| {
        details
            .seek_offset
            .filter(|offset| offset.is_finite() && *offset > 0.0)
            .map(TickDelta::from_seconds_f64)
            .unwrap_or(default_step)
    };
    Box::new(move |details| {
        let command = match action {
            MediaSessionAction::Play => TransportCommand::Play,
            MediaSessionAction::Pause => TransportCommand::Pause,
            MediaSessionAction::Stop => TransportCommand::Stop,
            MediaSessionAction::SeekForward => {
                TransportCommand::SeekRelative(step(details))
            }
            MediaSessionAction::SeekBackward => {
                TransportCommand::SeekRelative(step(details).reversed())
            }
            MediaSessionAction::NextTrack => TransportCommand::NextItem,
            MediaSessionAction::PreviousTrack => TransportCommand::PreviousItem,
        };
        if !handle.send(command) {
            debug!(?action, "media key pressed after session teardown");
        }
    })
}

/// Registers a session's transport with the platform and keeps the
/// registration pointed at the live session.
pub struct MediaSessionBinding {
    platform: Box<dyn MediaSessionPlatform>,
    default_step: TickDelta,
    bound_to: Option<u64>,
    registered: Vec<MediaSessionAction>,
}

impl fmt::Debug for MediaSessionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSessionBinding")
            .field("default_step", &self.default_step)
            .field("bound_to", &self.bound_to)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

impl MediaSessionBinding {
    /// `default_step` is used when the platform does not say how far to
    /// seek.
    pub fn new(
        platform: Box<dyn MediaSessionPlatform>,
        default_step: TickDelta,
    ) -> Self {
        Self {
            platform,
            default_step,
            bound_to: None,
            registered: Vec::new(),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound_to.is_some()
    }

    pub fn registered_actions(&self) -> &[MediaSessionAction] {
        &self.registered
    }

    /// Register handlers for `handle`. A no-op when already bound to the
    /// same session; otherwise the old handlers are dropped first.
    pub fn bind(&mut self, handle: &TransportHandle) {
        if self.bound_to == Some(handle.id()) {
            return;
        }
        self.unbind();

        for action in MediaSessionAction::ALL {
            let handler = handler_for(action, handle.clone(), self.default_step);
            match self.platform.set_action_handler(action, Some(handler)) {
                Ok(()) => self.registered.push(action),
                Err(err) => {
                    debug!(?action, "media session action unavailable: {err}")
                }
            }
        }
        self.bound_to = Some(handle.id());
    }

    pub fn unbind(&mut self) {
        for action in self.registered.drain(..) {
            if let Err(err) = self.platform.set_action_handler(action, None) {
                warn!(?action, "failed to unregister media session handler: {err}");
            }
        }
        if self.bound_to.take().is_some()
            && let Err(err) = self.platform.set_metadata(None)
        {
            debug!("failed to clear media session metadata: {err}");
        }
    }

    pub fn publish_metadata(&mut self, item: Option<&PlayableItem>) {
        let metadata = item.map(MediaMetadata::from);
        if let Err(err) = self.platform.set_metadata(metadata) {
            debug!("media session metadata rejected: {err}");
        }
    }

    pub fn publish_position(
        &mut self,
        position: Ticks,
        duration: Ticks,
        rate: f64,
    ) {
        if duration.is_zero() {
            return;
        }
        let position = position.clamp_to(duration);
        if let Err(err) =
            self.platform.set_position_state(position, duration, rate)
        {
            debug!("media session position rejected: {err}");
        }
    }
}

impl Drop for MediaSessionBinding {
    fn drop(&mut self) {
        self.unbind();
    }
}
