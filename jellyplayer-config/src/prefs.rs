//! Volume and mute preferences that survive restarts.
//!
//! Audio and video keep independent values so turning a film down does not
//! silence the music queue.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use jellyplayer_core::{SessionSettings, constants::volume};
use jellyplayer_model::ItemKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const APP_DIR: &str = "jellyplayer";
const PREFS_FILE: &str = "prefs.toml";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("no per-user config directory is available on this platform")]
    NoConfigDir,
    #[error("failed to access preferences at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid preferences file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render preferences")]
    Render(#[from] toml::ser::Error),
}

/// Which set of preferences applies to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackKind {
    Audio,
    Video,
}

impl From<ItemKind> for PlaybackKind {
    fn from(kind: ItemKind) -> Self {
        if kind.is_audio() {
            PlaybackKind::Audio
        } else {
            PlaybackKind::Video
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VolumePrefs {
    pub volume: f64,
    pub muted: bool,
}

impl Default for VolumePrefs {
    fn default() -> Self {
        Self {
            volume: volume::DEFAULT,
            muted: false,
        }
    }
}

impl VolumePrefs {
    /// Seed a session with these values.
    pub fn apply_to(&self, settings: &mut SessionSettings) {
        settings.initial_volume = self.volume;
        settings.initial_muted = self.muted;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerPrefs {
    pub audio: VolumePrefs,
    pub video: VolumePrefs,
}

impl PlayerPrefs {
    pub fn get(&self, kind: PlaybackKind) -> VolumePrefs {
        match kind {
            PlaybackKind::Audio => self.audio,
            PlaybackKind::Video => self.video,
        }
    }

    fn get_mut(&mut self, kind: PlaybackKind) -> &mut VolumePrefs {
        match kind {
            PlaybackKind::Audio => &mut self.audio,
            PlaybackKind::Video => &mut self.video,
        }
    }
}

/// File-backed [`PlayerPrefs`]. Changes stay in memory until
/// [`save`](Self::save).
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
    prefs: PlayerPrefs,
}

impl PrefsStore {
    /// `<config dir>/jellyplayer/prefs.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFS_FILE))
    }

    pub fn open_default() -> Result<Self, PrefsError> {
        let path = Self::default_path().ok_or(PrefsError::NoConfigDir)?;
        Self::open(path)
    }

    /// Read the preferences at `path`. A missing file yields the defaults.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, PrefsError> {
        let path = path.into();
        let prefs = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).map_err(|source| {
                PrefsError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no stored preferences, using defaults");
                PlayerPrefs::default()
            }
            Err(source) => return Err(PrefsError::Io { path, source }),
        };

        Ok(Self { path, prefs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn prefs(&self) -> &PlayerPrefs {
        &self.prefs
    }

    pub fn get(&self, kind: PlaybackKind) -> VolumePrefs {
        self.prefs.get(kind)
    }

    /// Stores the volume clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, kind: PlaybackKind, volume: f64) {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            volume::DEFAULT
        };
        self.prefs.get_mut(kind).volume = volume;
    }

    pub fn set_muted(&mut self, kind: PlaybackKind, muted: bool) {
        self.prefs.get_mut(kind).muted = muted;
    }

    /// Write through a temporary file in the same directory so a crash never
    /// leaves a truncated file behind.
    pub fn save(&self) -> Result<(), PrefsError> {
        let rendered = toml::to_string(&self.prefs)?;
        let dir = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let io_err = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(rendered.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|err| io_err(err.error))?;

        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
