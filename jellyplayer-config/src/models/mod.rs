use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, anyhow};
use jellyplayer_core::{
    RepeatMode, SessionSettings,
    constants::{controls, reporting, seeking, trickplay},
};
use jellyplayer_model::{TickDelta, Ticks};
use serde::{Deserialize, Serialize};

/// Environment variable naming a TOML or JSON config file.
pub const CONFIG_PATH_ENV: &str = "JELLYPLAYER_CONFIG_PATH";
/// Environment variable carrying the whole config as inline JSON.
pub const CONFIG_JSON_ENV: &str = "JELLYPLAYER_CONFIG_JSON";

const DEFAULT_CANDIDATES: &[&str] = &[
    "jellyplayer.toml",
    "jellyplayer.json",
    "config/jellyplayer.toml",
    "config/jellyplayer.json",
];

/// Source that produced the player configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => f.write_str("built-in defaults"),
            ConfigSource::EnvPath(path) => {
                write!(f, "{CONFIG_PATH_ENV} ({})", path.display())
            }
            ConfigSource::EnvInline => f.write_str(CONFIG_JSON_ENV),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Seek step sizes and the chapter restart rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeekingConfig {
    /// Step used by the rewind and fast-forward buttons.
    pub manual_step_secs: u64,
    /// Step used by OS media keys when the platform does not send an offset.
    pub media_key_default_secs: u64,
    /// How far past a chapter start the playhead must be before "previous
    /// chapter" restarts the current chapter instead of jumping further back.
    /// Zero keeps the plain strict comparison.
    pub chapter_restart_threshold_secs: u64,
}

impl Default for SeekingConfig {
    fn default() -> Self {
        Self {
            manual_step_secs: seeking::MANUAL_STEP_SECS.unsigned_abs(),
            media_key_default_secs: seeking::MEDIA_KEY_DEFAULT_SECS
                .unsigned_abs(),
            chapter_restart_threshold_secs:
                seeking::CHAPTER_RESTART_THRESHOLD_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrickplayConfig {
    /// Target thumbnail width as a fraction of the physical screen width.
    pub screen_fraction: f64,
}

impl Default for TrickplayConfig {
    fn default() -> Self {
        Self {
            screen_fraction: trickplay::SCREEN_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Period of the progress reports sent while an item is loaded.
    pub progress_interval_ms: u64,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: reporting::PROGRESS_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Inactivity window after which the overlay hides during playback.
    pub auto_hide_ms: u64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            auto_hide_ms: controls::AUTO_HIDE_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    pub repeat: RepeatMode,
}

/// Top-level player settings. Every section is optional in the source file;
/// missing keys fall back to the stock player behaviour.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub seeking: SeekingConfig,
    pub trickplay: TrickplayConfig,
    pub reporting: ReportingConfig,
    pub controls: ControlsConfig,
    pub queue: QueueConfig,
}

impl PlayerConfig {
    /// Load player configuration using environment variables.
    /// Evaluation order:
    /// 1) `$JELLYPLAYER_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$JELLYPLAYER_CONFIG_JSON` (inline JSON),
    /// 3) `jellyplayer.toml` or `config/jellyplayer.toml` in the working
    ///    directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        Self::load_with(|key| env::var(key).ok(), Path::new("."))
    }

    /// Same as [`load_from_env`](Self::load_from_env) with an explicit
    /// variable lookup and base directory for the default files.
    pub fn load_with<F>(
        lookup: F,
        base_dir: &Path,
    ) -> anyhow::Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path_str) = lookup(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str.trim());
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base_dir) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read player config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid player config {}", path.display())
            }),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid player config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse player config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid player config json: {err}"))
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string(self).context("failed to render player config")
    }

    fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.exists())
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.reporting.progress_interval_ms)
    }

    pub fn controls_auto_hide(&self) -> Duration {
        Duration::from_millis(self.controls.auto_hide_ms)
    }

    /// Session tunables for the playback core. Volume and mute come from
    /// the persisted preferences, not from this file.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            manual_seek_step: step(self.seeking.manual_step_secs),
            media_key_seek_step: step(self.seeking.media_key_default_secs),
            chapter_restart_threshold: Ticks::from_secs(
                self.seeking.chapter_restart_threshold_secs,
            ),
            trickplay_screen_fraction: self.trickplay.screen_fraction,
            progress_interval: self.progress_interval(),
            controls_auto_hide: self.controls_auto_hide(),
            repeat: self.queue.repeat,
            ..SessionSettings::default()
        }
    }
}

fn step(secs: u64) -> TickDelta {
    TickDelta::from_secs(i64::try_from(secs).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_stock_player() {
        let config = PlayerConfig::default();
        assert_eq!(config.seeking.manual_step_secs, 15);
        assert_eq!(config.seeking.media_key_default_secs, 10);
        assert_eq!(config.seeking.chapter_restart_threshold_secs, 0);
        assert_eq!(config.trickplay.screen_fraction, 0.2);
        assert_eq!(config.reporting.progress_interval_ms, 10_000);
        assert_eq!(config.controls.auto_hide_ms, 3_000);
        assert_eq!(config.queue.repeat, RepeatMode::Off);
        assert_eq!(config.session_settings(), SessionSettings::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = PlayerConfig::parse_from_str(
            "[seeking]\nmanual_step_secs = 30\n\n[queue]\nrepeat = \"all\"\n",
            "inline",
        )
        .unwrap();
        assert_eq!(config.seeking.manual_step_secs, 30);
        assert_eq!(config.seeking.media_key_default_secs, 10);
        assert_eq!(config.queue.repeat, RepeatMode::All);

        let settings = config.session_settings();
        assert_eq!(settings.manual_seek_step, TickDelta::from_secs(30));
        assert_eq!(settings.repeat, RepeatMode::All);
    }

    #[test]
    fn parse_from_str_falls_back_to_json() {
        let config = PlayerConfig::parse_from_str(
            r#"{"trickplay": {"screen_fraction": 0.25}}"#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.trickplay.screen_fraction, 0.25);
    }

    #[test]
    fn unparseable_input_names_both_formats() {
        let err = PlayerConfig::parse_from_str("[[[", "broken.conf")
            .unwrap_err()
            .to_string();
        assert!(err.contains("broken.conf"));
        assert!(err.contains("toml error"));
        assert!(err.contains("json error"));
    }

    #[test]
    fn env_path_wins_over_inline_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.toml");
        fs::write(&path, "[controls]\nauto_hide_ms = 5000\n").unwrap();

        let vars = lookup(&[
            (CONFIG_PATH_ENV, path.to_str().unwrap()),
            (CONFIG_JSON_ENV, r#"{"controls": {"auto_hide_ms": 1}}"#),
        ]);
        let (config, source) =
            PlayerConfig::load_with(vars, dir.path()).unwrap();
        assert_eq!(config.controls.auto_hide_ms, 5000);
        assert_eq!(source, ConfigSource::EnvPath(path));
    }

    #[test]
    fn inline_json_is_used_when_no_path_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let vars = lookup(&[
            (CONFIG_PATH_ENV, "  "),
            (CONFIG_JSON_ENV, r#"{"queue": {"repeat": "one"}}"#),
        ]);
        let (config, source) =
            PlayerConfig::load_with(vars, dir.path()).unwrap();
        assert_eq!(config.queue.repeat, RepeatMode::One);
        assert_eq!(source, ConfigSource::EnvInline);
    }

    #[test]
    fn bad_inline_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let vars = lookup(&[(CONFIG_JSON_ENV, "{not json")]);
        let err = PlayerConfig::load_with(vars, dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_JSON_ENV));
    }

    #[test]
    fn default_file_is_discovered_under_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        let path = dir.path().join("config/jellyplayer.toml");
        fs::write(&path, "[reporting]\nprogress_interval_ms = 2500\n").unwrap();

        let (config, source) =
            PlayerConfig::load_with(lookup(&[]), dir.path()).unwrap();
        assert_eq!(config.reporting.progress_interval_ms, 2500);
        assert_eq!(source, ConfigSource::File(path));
    }

    #[test]
    fn falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) =
            PlayerConfig::load_with(lookup(&[]), dir.path()).unwrap();
        assert_eq!(config, PlayerConfig::default());
        assert_eq!(source, ConfigSource::Default);
    }

    #[test]
    fn rendered_toml_parses_back() {
        let mut config = PlayerConfig::default();
        config.seeking.chapter_restart_threshold_secs = 3;
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("chapter_restart_threshold_secs = 3"));
        assert_eq!(PlayerConfig::parse_from_str(&rendered, "x").unwrap(), config);
    }
}
