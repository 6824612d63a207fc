use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ConfigGuardRailError;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to load player configuration: {0}")]
    Player(#[source] anyhow::Error),
    #[error("failed to load player configuration from {path}")]
    File {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
}
