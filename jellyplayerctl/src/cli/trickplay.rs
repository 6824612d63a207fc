use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use jellyplayer_config::PlayerConfig;
use jellyplayer_core::{
    TrickplayEndpoint, TrickplayPreview,
    trickplay::{Thumbnail, select_resolution},
};
use jellyplayer_model::{
    ItemId, MediaSourceId, Ticks, TrickplayInfo, TrickplayResolutionSet,
    format,
};
use serde::Serialize;
use url::Url;

#[derive(Debug, Args)]
pub struct TrickplayArgs {
    /// Hover position, e.g. `25s 5ms` or `1h 20m`
    #[arg(long, value_parser = humantime::parse_duration)]
    pub at: Duration,
    /// Rendered player width in CSS pixels
    #[arg(long, default_value_t = 1280.0)]
    pub display_width: f64,
    #[arg(long, default_value_t = 1.0)]
    pub device_pixel_ratio: f64,
    /// Thumbnail widths the server offers
    #[arg(long, value_delimiter = ',', default_value = "160,320")]
    pub widths: Vec<u32>,
    /// Thumbnails per sheet row and column
    #[arg(long, default_value_t = 10)]
    pub tiles: u32,
    #[arg(long, value_parser = humantime::parse_duration, default_value = "10s")]
    pub interval: Duration,
    /// Media runtime; bounds the last thumbnail when given
    #[arg(long, value_parser = humantime::parse_duration)]
    pub runtime: Option<Duration>,
    #[arg(long, default_value = "https://jellyfin.local/")]
    pub server: Url,
    #[arg(long, default_value = "demo")]
    pub item: String,
    #[arg(long)]
    pub media_source: Option<String>,
}

#[derive(Debug, Serialize)]
struct TrickplayLine {
    at: String,
    target_width: f64,
    width: u32,
    height: u32,
    thumbnail: Thumbnail,
}

fn resolutions(args: &TrickplayArgs) -> TrickplayResolutionSet {
    let interval_ms =
        u64::try_from(args.interval.as_millis()).unwrap_or(u64::MAX);
    let thumbnail_count = args
        .runtime
        .map(|runtime| {
            let count = runtime
                .as_millis()
                .div_ceil(u128::from(interval_ms.max(1)));
            u32::try_from(count).unwrap_or(u32::MAX)
        })
        .unwrap_or(0);

    TrickplayResolutionSet::new(args.widths.iter().map(|&width| {
        TrickplayInfo {
            width,
            height: width * 9 / 16,
            tile_width: args.tiles,
            tile_height: args.tiles,
            thumbnail_count,
            interval_ms,
            bandwidth: 0,
        }
    }))
}

pub fn run(args: TrickplayArgs, config: &PlayerConfig) -> Result<()> {
    let set = resolutions(&args);
    let fraction = config.trickplay.screen_fraction;
    let Some(info) = select_resolution(
        &set,
        args.display_width,
        args.device_pixel_ratio,
        fraction,
    ) else {
        bail!("no usable trickplay resolution among {:?}", args.widths);
    };

    let item_id = ItemId::new(args.item.as_str())?;
    let mut endpoint = TrickplayEndpoint::new(args.server.clone(), item_id);
    if let Some(source) = &args.media_source {
        endpoint =
            endpoint.with_media_source(MediaSourceId::new(source.as_str())?);
    }

    let position = Ticks::from(args.at);
    let preview = TrickplayPreview::new(*info, Some(endpoint));
    let line = TrickplayLine {
        at: format::clock_display(position),
        target_width: fraction * args.display_width * args.device_pixel_ratio,
        width: info.width,
        height: info.height,
        thumbnail: preview.thumbnail_at(position),
    };
    println!("{}", serde_json::to_string_pretty(&line)?);
    Ok(())
}
