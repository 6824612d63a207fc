pub mod error;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    models::{ConfigSource, PlayerConfig},
    validation::{ConfigWarnings, apply_guard_rails},
};
use error::ConfigLoadError;

#[derive(Debug, Clone, Default)]
pub struct ConfigLoaderOptions {
    /// Explicit config file, bypassing the environment lookup.
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

/// A validated configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: PlayerConfig,
    pub source: ConfigSource,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (config, source) = match &self.options.config_path {
            Some(path) => {
                let config =
                    PlayerConfig::load_from_file(path).map_err(|source| {
                        ConfigLoadError::File {
                            path: path.clone(),
                            source,
                        }
                    })?;
                (config, ConfigSource::File(path.clone()))
            }
            None => PlayerConfig::load_from_env()
                .map_err(ConfigLoadError::Player)?,
        };

        Self::finish(config, source)
    }

    /// Run the guard rails over an already parsed configuration.
    pub fn finish(
        config: PlayerConfig,
        source: ConfigSource,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let warnings = apply_guard_rails(&config)?;
        for warning in warnings.iter() {
            match &warning.hint {
                Some(hint) => warn!(%hint, "{}", warning.message),
                None => warn!("{}", warning.message),
            }
        }

        info!(
            %source,
            repeat = ?config.queue.repeat,
            manual_step_secs = config.seeking.manual_step_secs,
            progress_interval = %humantime::format_duration(config.progress_interval()),
            "player configuration loaded"
        );

        Ok(ConfigLoad {
            config,
            source,
            warnings,
        })
    }
}
