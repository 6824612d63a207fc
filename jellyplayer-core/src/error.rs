use jellyplayer_model::{ItemId, TrackKind};
use thiserror::Error;

use crate::playback::element::ElementError;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Index {index} is out of range for a queue of {len} items")]
    InvalidIndex { index: usize, len: usize },

    #[error("No media is loaded")]
    NoMediaLoaded,

    #[error("No {kind:?} track with stream index {index}")]
    TrackNotFound { kind: TrackKind, index: i32 },

    #[error("Media element error: {0}")]
    Element(#[from] ElementError),

    #[error("Could not resolve item {item}: {reason}")]
    Resolve { item: ItemId, reason: String },

    #[error("Playback session is closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, PlayerError>;
