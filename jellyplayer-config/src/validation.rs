use std::time::Duration;

use thiserror::Error;

use crate::models::PlayerConfig;

/// Progress reports more frequent than this flood the server.
const MIN_QUIET_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
/// Thresholds above this make "previous chapter" feel unresponsive.
const MAX_QUIET_RESTART_THRESHOLD_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigGuardRailError {
    #[error("{field} must be greater than zero")]
    ZeroStep { field: &'static str },
    #[error("trickplay.screen_fraction must be within (0, 1], got {value}")]
    ScreenFractionOutOfRange { value: f64 },
    #[error("reporting.progress_interval_ms must be greater than zero")]
    ZeroProgressInterval,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &PlayerConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.seeking.manual_step_secs == 0 {
        return Err(ConfigGuardRailError::ZeroStep {
            field: "seeking.manual_step_secs",
        });
    }
    if config.seeking.media_key_default_secs == 0 {
        return Err(ConfigGuardRailError::ZeroStep {
            field: "seeking.media_key_default_secs",
        });
    }

    let fraction = config.trickplay.screen_fraction;
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(ConfigGuardRailError::ScreenFractionOutOfRange {
            value: fraction,
        });
    }

    if config.reporting.progress_interval_ms == 0 {
        return Err(ConfigGuardRailError::ZeroProgressInterval);
    }

    let interval = config.progress_interval();
    if interval < MIN_QUIET_PROGRESS_INTERVAL {
        warnings.push_with_hint(
            format!(
                "progress reports every {} will flood the server",
                humantime::format_duration(interval)
            ),
            "Use a reporting.progress_interval_ms of at least 1000",
        );
    }

    if config.seeking.chapter_restart_threshold_secs
        > MAX_QUIET_RESTART_THRESHOLD_SECS
    {
        warnings.push(format!(
            "chapter restart threshold of {}s keeps \"previous chapter\" inside the current chapter for a long time",
            config.seeking.chapter_restart_threshold_secs
        ));
    }

    if config.controls.auto_hide_ms == 0 {
        warnings.push_with_hint(
            "controls.auto_hide_ms is zero; the overlay hides as soon as playback runs",
            "Set controls.auto_hide_ms to a few seconds",
        );
    }

    Ok(warnings)
}
