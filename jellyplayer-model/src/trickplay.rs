use crate::error::ModelError;
use crate::ids::MediaSourceId;
use std::collections::{BTreeMap, HashMap};

/// Server description of one trickplay resolution.
///
/// `width`/`height` are the pixel size of a single thumbnail, while
/// `tile_width`/`tile_height` count thumbnails per row and column of a
/// sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrickplayInfo {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub thumbnail_count: u32,
    /// Milliseconds between consecutive thumbnails.
    pub interval_ms: u64,
    pub bandwidth: u32,
}

impl TrickplayInfo {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.width == 0 || self.height == 0 {
            return Err(ModelError::InvalidTrickplay(
                "thumbnail size must be non-zero".to_string(),
            ));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(ModelError::InvalidTrickplay(
                "sheet grid must be non-zero".to_string(),
            ));
        }
        if self.interval_ms == 0 {
            return Err(ModelError::InvalidTrickplay(
                "interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Thumbnails per sprite sheet.
    pub fn tiles_per_sheet(&self) -> u64 {
        u64::from(self.tile_width) * u64::from(self.tile_height)
    }

    pub fn sheet_count(&self) -> u64 {
        let per_sheet = self.tiles_per_sheet();
        if per_sheet == 0 {
            return 0;
        }
        u64::from(self.thumbnail_count).div_ceil(per_sheet)
    }
}

/// Available trickplay resolutions of one media source, keyed by width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TrickplayResolutionSet(BTreeMap<u32, TrickplayInfo>);

impl TrickplayResolutionSet {
    /// Build a set, dropping resolutions that cannot be rendered.
    pub fn new(infos: impl IntoIterator<Item = TrickplayInfo>) -> Self {
        TrickplayResolutionSet(
            infos
                .into_iter()
                .filter(|info| info.validate().is_ok())
                .map(|info| (info.width, info))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, width: u32) -> Option<&TrickplayInfo> {
        self.0.get(&width)
    }

    /// Resolutions in ascending width order.
    pub fn iter(&self) -> impl Iterator<Item = &TrickplayInfo> {
        self.0.values()
    }
}

/// Trickplay resolutions of every media source of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TrickplayManifest(HashMap<MediaSourceId, TrickplayResolutionSet>);

impl TrickplayManifest {
    pub fn insert(
        &mut self,
        source: MediaSourceId,
        set: TrickplayResolutionSet,
    ) {
        self.0.insert(source, set);
    }

    pub fn for_source(
        &self,
        source: &MediaSourceId,
    ) -> Option<&TrickplayResolutionSet> {
        self.0.get(source).filter(|set| !set.is_empty())
    }
}
