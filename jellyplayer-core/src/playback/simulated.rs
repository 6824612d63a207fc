//! An in-memory [`MediaElement`] that plays back a fixed-length timeline.
//!
//! Used by the `jellyplayerctl simulate` command and by the test suites.
//! Clones share state, so a test can keep one handle while the session owns
//! another.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use url::Url;

use super::element::{ElementError, ElementEvent, ElementEvents, MediaElement};

/// How the element answers `set_current_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekSupport {
    #[default]
    Seekable,
    /// Accepts the call but stays where it is, like a live stream.
    Ignored,
    Rejected,
}

#[derive(Debug)]
struct Inner {
    url: Option<Url>,
    media_duration: Option<f64>,
    position: f64,
    loaded: bool,
    paused: bool,
    volume: f64,
    muted: bool,
    rate: f64,
    fullscreen: bool,
    picture_in_picture: bool,
    pip_supported: bool,
    seek_support: SeekSupport,
    audio_stream: Option<i32>,
    subtitle_stream: Option<i32>,
    seeks: Vec<f64>,
    events: Option<mpsc::UnboundedSender<ElementEvent>>,
}

impl Inner {
    fn emit(&self, event: ElementEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening any more.
            let _ = tx.send(event);
        }
    }

    fn clamp(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        match self.media_duration {
            Some(duration) => seconds.min(duration),
            None => seconds,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedElement {
    inner: Arc<Mutex<Inner>>,
}

impl Default for SimulatedElement {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedElement {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                url: None,
                media_duration: None,
                position: 0.0,
                loaded: false,
                paused: true,
                volume: 1.0,
                muted: false,
                rate: 1.0,
                fullscreen: false,
                picture_in_picture: false,
                pip_supported: true,
                seek_support: SeekSupport::Seekable,
                audio_stream: None,
                subtitle_stream: None,
                seeks: Vec::new(),
                events: None,
            })),
        }
    }

    /// Length reported for every stream opened from now on.
    pub fn with_media_duration(self, seconds: f64) -> Self {
        self.inner.lock().media_duration = Some(seconds);
        self
    }

    pub fn with_seek_support(self, support: SeekSupport) -> Self {
        self.inner.lock().seek_support = support;
        self
    }

    pub fn with_picture_in_picture(self, supported: bool) -> Self {
        self.inner.lock().pip_supported = supported;
        self
    }

    /// Move the playhead forward by `seconds` of wall time, honouring the
    /// playback rate. Emits a time update, and `Ended` once the end of the
    /// media is reached.
    pub fn advance(&self, seconds: f64) {
        let mut inner = self.inner.lock();
        if !inner.loaded || inner.paused {
            return;
        }
        let next = inner.clamp(inner.position + seconds * inner.rate);
        inner.position = next;
        inner.emit(ElementEvent::TimeUpdate(next));
        if inner.media_duration.is_some_and(|duration| next >= duration) {
            inner.paused = true;
            inner.emit(ElementEvent::Ended);
        }
    }

    /// Push an arbitrary event, as a real pipeline might.
    pub fn emit(&self, event: ElementEvent) {
        self.inner.lock().emit(event);
    }

    /// Play through to the end immediately.
    pub fn finish(&self) {
        let mut inner = self.inner.lock();
        if let Some(duration) = inner.media_duration {
            inner.position = duration;
            inner.emit(ElementEvent::TimeUpdate(duration));
        }
        inner.paused = true;
        inner.emit(ElementEvent::Ended);
    }

    pub fn position(&self) -> f64 {
        self.inner.lock().position
    }

    pub fn seek_log(&self) -> Vec<f64> {
        self.inner.lock().seeks.clone()
    }

    pub fn opened_url(&self) -> Option<Url> {
        self.inner.lock().url.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.lock().loaded
    }

    pub fn is_fullscreen(&self) -> bool {
        self.inner.lock().fullscreen
    }

    pub fn is_picture_in_picture(&self) -> bool {
        self.inner.lock().picture_in_picture
    }

    pub fn volume(&self) -> f64 {
        self.inner.lock().volume
    }

    pub fn muted(&self) -> bool {
        self.inner.lock().muted
    }

    pub fn playback_rate(&self) -> f64 {
        self.inner.lock().rate
    }

    pub fn audio_stream(&self) -> Option<i32> {
        self.inner.lock().audio_stream
    }

    pub fn subtitle_stream(&self) -> Option<i32> {
        self.inner.lock().subtitle_stream
    }
}

impl MediaElement for SimulatedElement {
    fn open(
        &mut self,
        url: &Url,
        start_seconds: f64,
    ) -> Result<(), ElementError> {
        let mut inner = self.inner.lock();
        inner.url = Some(url.clone());
        inner.loaded = true;
        inner.paused = true;
        inner.audio_stream = None;
        inner.subtitle_stream = None;
        inner.position = inner.clamp(start_seconds);
        if let Some(duration) = inner.media_duration {
            inner.emit(ElementEvent::DurationChange(duration));
        }
        inner.emit(ElementEvent::TimeUpdate(inner.position));
        Ok(())
    }

    fn stop(&mut self) {
        let mut inner = self.inner.lock();
        inner.loaded = false;
        inner.paused = true;
        inner.position = 0.0;
        inner.url = None;
    }

    fn current_time(&self) -> f64 {
        self.inner.lock().position
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<(), ElementError> {
        let mut inner = self.inner.lock();
        inner.seeks.push(seconds);
        match inner.seek_support {
            SeekSupport::Rejected => Err(ElementError::NotSeekable),
            SeekSupport::Ignored => Ok(()),
            SeekSupport::Seekable => {
                let target = inner.clamp(seconds);
                inner.position = target;
                inner.emit(ElementEvent::Seeked(target));
                inner.emit(ElementEvent::TimeUpdate(target));
                Ok(())
            }
        }
    }

    fn duration(&self) -> Option<f64> {
        let inner = self.inner.lock();
        inner.loaded.then_some(inner.media_duration).flatten()
    }

    fn paused(&self) -> bool {
        self.inner.lock().paused
    }

    fn play(&mut self) -> Result<(), ElementError> {
        let mut inner = self.inner.lock();
        if !inner.loaded {
            return Err(ElementError::Failed("nothing is loaded".into()));
        }
        if inner.paused {
            inner.paused = false;
            inner.emit(ElementEvent::Playing);
        }
        Ok(())
    }

    fn pause(&mut self) {
        let mut inner = self.inner.lock();
        if !inner.paused {
            inner.paused = true;
            inner.emit(ElementEvent::Paused);
        }
    }

    fn set_volume(&mut self, volume: f64) {
        self.inner.lock().volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.lock().muted = muted;
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.inner.lock().rate = rate;
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), ElementError> {
        self.inner.lock().fullscreen = fullscreen;
        Ok(())
    }

    fn supports_picture_in_picture(&self) -> bool {
        self.inner.lock().pip_supported
    }

    fn set_picture_in_picture(
        &mut self,
        enabled: bool,
    ) -> Result<(), ElementError> {
        let mut inner = self.inner.lock();
        if !inner.pip_supported {
            return Err(ElementError::Unsupported("picture-in-picture"));
        }
        inner.picture_in_picture = enabled;
        Ok(())
    }

    fn select_audio_stream(&mut self, index: i32) -> Result<(), ElementError> {
        self.inner.lock().audio_stream = Some(index);
        Ok(())
    }

    fn select_subtitle_stream(
        &mut self,
        index: Option<i32>,
    ) -> Result<(), ElementError> {
        self.inner.lock().subtitle_stream = index;
        Ok(())
    }

    fn subscribe(&mut self) -> ElementEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().events = Some(tx);
        rx
    }
}
