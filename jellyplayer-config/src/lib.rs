//! Configuration for the Jellyplayer client.
//!
//! Player tunables are read once at startup by [`ConfigLoader`] from a TOML
//! or JSON file, an inline JSON environment variable, or the built-in
//! defaults, checked against a small set of guard rails, and turned into the
//! core crate's [`SessionSettings`](jellyplayer_core::SessionSettings).
//! Per-user volume and mute preferences live separately in [`PrefsStore`].

#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod prefs;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::{
    ConfigSource, ControlsConfig, PlayerConfig, QueueConfig, ReportingConfig,
    SeekingConfig, TrickplayConfig,
};
pub use prefs::{PlaybackKind, PlayerPrefs, PrefsError, PrefsStore, VolumePrefs};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
