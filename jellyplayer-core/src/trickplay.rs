//! Scrub-preview thumbnails.
//!
//! A trickplay sheet is a grid of `tile_width` x `tile_height` thumbnails,
//! each `width` x `height` pixels, sampled every `interval_ms`. Sheets are
//! numbered from zero and fetched from the media server by width.

use jellyplayer_model::{
    ChapterList, ItemId, MediaSourceId, Ticks, TrickplayInfo,
    TrickplayResolutionSet, format,
};
use serde::Serialize;
use url::Url;

/// Pick the widest sheet that fits in `screen_fraction` of the rendered
/// player width, or the narrowest one when none fit.
pub fn select_resolution(
    resolutions: &TrickplayResolutionSet,
    display_width_px: f64,
    device_pixel_ratio: f64,
    screen_fraction: f64,
) -> Option<&TrickplayInfo> {
    let target = screen_fraction * display_width_px * device_pixel_ratio;
    resolutions
        .iter()
        .take_while(|info| f64::from(info.width) <= target)
        .last()
        .or_else(|| resolutions.iter().next())
}

/// Where one thumbnail lives inside its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrickplayTile {
    pub global_index: u64,
    pub sheet: u64,
    pub tile_in_sheet: u64,
    pub column: u64,
    pub row: u64,
    /// Background offset in pixels; both components are zero or negative.
    pub offset_x: i64,
    pub offset_y: i64,
    pub width: u32,
    pub height: u32,
}

/// Tile for the thumbnail shown at `position`.
///
/// Positions past the last sampled thumbnail reuse the last one when the
/// sheet advertises a thumbnail count.
pub fn tile_at(info: &TrickplayInfo, position: Ticks) -> TrickplayTile {
    let interval = info.interval_ms.max(1);
    let mut global_index = position.to_millis() / interval;
    if info.thumbnail_count > 0 {
        let last = u64::from(info.thumbnail_count) - 1;
        global_index = global_index.min(last);
    }

    let per_sheet = info.tiles_per_sheet().max(1);
    let columns = u64::from(info.tile_width.max(1));
    let sheet = global_index / per_sheet;
    let tile_in_sheet = global_index % per_sheet;
    let column = tile_in_sheet % columns;
    let row = tile_in_sheet / columns;

    let offset = |cells: u64, size: u32| -> i64 {
        let px = cells.saturating_mul(u64::from(size));
        -i64::try_from(px).unwrap_or(i64::MAX)
    };

    TrickplayTile {
        global_index,
        sheet,
        tile_in_sheet,
        column,
        row,
        offset_x: offset(column, info.width),
        offset_y: offset(row, info.height),
        width: info.width,
        height: info.height,
    }
}

/// Server coordinates needed to turn a sheet number into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickplayEndpoint {
    pub base: Url,
    pub item_id: ItemId,
    pub media_source_id: Option<MediaSourceId>,
    pub api_key: Option<String>,
}

impl TrickplayEndpoint {
    pub fn new(base: Url, item_id: ItemId) -> Self {
        Self {
            base,
            item_id,
            media_source_id: None,
            api_key: None,
        }
    }

    pub fn with_media_source(mut self, id: MediaSourceId) -> Self {
        self.media_source_id = Some(id);
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// `{base}/Videos/{item}/Trickplay/{width}/{sheet}.jpg`, keeping any
    /// path prefix the server is mounted under.
    pub fn sheet_url(&self, width: u32, sheet: u64) -> Option<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty().extend([
                "Videos",
                self.item_id.as_str(),
                "Trickplay",
                &width.to_string(),
                &format!("{sheet}.jpg"),
            ]);
        }
        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                query.append_pair("api_key", key);
            }
            if let Some(source) = &self.media_source_id {
                query.append_pair("MediaSourceId", source.as_str());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Some(url)
    }
}

/// The resolution chosen for the current playback session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickplayPreview {
    info: TrickplayInfo,
    endpoint: Option<TrickplayEndpoint>,
}

impl TrickplayPreview {
    pub fn new(
        info: TrickplayInfo,
        endpoint: Option<TrickplayEndpoint>,
    ) -> Self {
        Self { info, endpoint }
    }

    pub fn info(&self) -> &TrickplayInfo {
        &self.info
    }

    pub fn thumbnail_at(&self, position: Ticks) -> Thumbnail {
        let tile = tile_at(&self.info, position);
        let width = self.info.width;
        let url = self
            .endpoint
            .as_ref()
            .and_then(|endpoint| endpoint.sheet_url(width, tile.sheet));
        Thumbnail { tile, url }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub tile: TrickplayTile,
    pub url: Option<Url>,
}

/// What the scrubber shows above the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewBubble {
    pub position: Ticks,
    pub timestamp: String,
    pub chapter_name: Option<String>,
    /// `None` renders as a text-only bubble.
    pub thumbnail: Option<Thumbnail>,
}

pub fn preview_bubble(
    position: Ticks,
    chapters: &ChapterList,
    preview: Option<&TrickplayPreview>,
) -> PreviewBubble {
    PreviewBubble {
        position,
        timestamp: format::clock_display(position),
        chapter_name: chapters
            .containing(position)
            .map(|chapter| chapter.name.clone()),
        thumbnail: preview.map(|preview| preview.thumbnail_at(position)),
    }
}
