//! The seam between the transport coordinator and whatever actually decodes
//! media.
//!
//! Positions cross this boundary in seconds because that is what every
//! native element speaks. Everything above it works in ticks.

use thiserror::Error;
use tokio::sync::mpsc;
use url::Url;

/// Notifications a media element pushes to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    TimeUpdate(f64),
    DurationChange(f64),
    Playing,
    Paused,
    Seeked(f64),
    Ended,
    Error(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("Element is not seekable")]
    NotSeekable,

    #[error("{0} is not supported by this element")]
    Unsupported(&'static str),

    #[error("No stream with index {0}")]
    NoSuchStream(i32),

    #[error("Element failed: {0}")]
    Failed(String),
}

pub type ElementEvents = mpsc::UnboundedReceiver<ElementEvent>;

/// A native playback element.
///
/// Implementations must be cheap to call from the coordinator's thread; any
/// real work happens on the element's own pipeline and is reported back via
/// [`ElementEvent`]s.
#[cfg_attr(test, mockall::automock)]
pub trait MediaElement {
    /// Open a stream and position it at `start_seconds`.
    fn open(&mut self, url: &Url, start_seconds: f64)
    -> Result<(), ElementError>;

    fn stop(&mut self);

    fn current_time(&self) -> f64;

    /// Ask the element to move to `seconds`. Elements that cannot seek may
    /// either fail or silently stay where they are.
    fn set_current_time(&mut self, seconds: f64) -> Result<(), ElementError>;

    fn duration(&self) -> Option<f64>;

    fn paused(&self) -> bool;

    fn play(&mut self) -> Result<(), ElementError>;

    fn pause(&mut self);

    fn set_volume(&mut self, volume: f64);

    fn set_muted(&mut self, muted: bool);

    fn set_playback_rate(&mut self, rate: f64);

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), ElementError>;

    fn supports_picture_in_picture(&self) -> bool;

    fn set_picture_in_picture(
        &mut self,
        enabled: bool,
    ) -> Result<(), ElementError>;

    fn select_audio_stream(&mut self, index: i32) -> Result<(), ElementError>;

    /// `None` disables subtitles.
    fn select_subtitle_stream(
        &mut self,
        index: Option<i32>,
    ) -> Result<(), ElementError>;

    /// Start receiving events. Calling this again replaces the previous
    /// subscription.
    fn subscribe(&mut self) -> ElementEvents;
}
