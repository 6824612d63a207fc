//! The tiny line-oriented language `simulate` reads.
//!
//! One step per line, `#` starts a comment. Times use humantime syntax
//! (`90s`, `20m`, `1h 5m`). Pointer steps take a spot on the seek bar as a
//! percentage of its width (`25%`).

use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result, anyhow, bail};
use jellyplayer_core::RepeatMode;

pub const DEFAULT_SCRIPT: &str = "\
# warm up inside the intro, then skip it
advance 15s
skip
forward
rewind
scrub 20m
advance 30s
commit
# drag the seek bar while playback keeps reporting
press 50%
drag 75%
advance 5s
release 75%
next-chapter
prev-chapter
pause
volume 0.5
mute
play
next
end
";

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Play,
    Pause,
    Toggle,
    Advance(Duration),
    Seek(Duration),
    Scrub(Duration),
    Commit,
    Cancel,
    Hover(f32),
    Press(f32),
    Drag(f32),
    Release(f32),
    Leave,
    Forward,
    Rewind,
    NextChapter,
    PreviousChapter,
    Skip,
    Volume(f64),
    Mute,
    Next,
    Previous,
    Repeat(RepeatMode),
    End,
    Report,
}

fn duration_arg(verb: &str, arg: Option<&str>) -> Result<Duration> {
    let raw = arg.ok_or_else(|| anyhow!("`{verb}` needs a time"))?;
    humantime::parse_duration(raw)
        .with_context(|| format!("`{verb}` got an invalid time `{raw}`"))
}

/// Seek bar spot as a fraction of its width, from `40%` or `40`.
fn bar_spot(verb: &str, arg: Option<&str>) -> Result<f32> {
    let raw = arg.ok_or_else(|| anyhow!("`{verb}` needs a spot on the bar"))?;
    let percent: f32 = raw
        .trim_end_matches('%')
        .trim()
        .parse()
        .with_context(|| format!("`{verb}` got an invalid spot `{raw}`"))?;
    if !(0.0..=100.0).contains(&percent) {
        bail!("`{verb}` spot `{raw}` is outside 0-100%");
    }
    Ok(percent / 100.0)
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, Some(rest.trim())),
            None => (line, None),
        };

        let step = match verb {
            "play" => Step::Play,
            "pause" => Step::Pause,
            "toggle" => Step::Toggle,
            "advance" => Step::Advance(duration_arg(verb, arg)?),
            "seek" => Step::Seek(duration_arg(verb, arg)?),
            "scrub" => Step::Scrub(duration_arg(verb, arg)?),
            "commit" => Step::Commit,
            "cancel" => Step::Cancel,
            "hover" => Step::Hover(bar_spot(verb, arg)?),
            "press" => Step::Press(bar_spot(verb, arg)?),
            "drag" => Step::Drag(bar_spot(verb, arg)?),
            "release" => Step::Release(bar_spot(verb, arg)?),
            "leave" => Step::Leave,
            "forward" => Step::Forward,
            "rewind" => Step::Rewind,
            "next-chapter" => Step::NextChapter,
            "prev-chapter" => Step::PreviousChapter,
            "skip" => Step::Skip,
            "volume" => {
                let raw = arg.ok_or_else(|| anyhow!("`volume` needs a level"))?;
                let level: f64 = raw
                    .parse()
                    .with_context(|| format!("invalid volume `{raw}`"))?;
                Step::Volume(level)
            }
            "mute" => Step::Mute,
            "next" => Step::Next,
            "previous" => Step::Previous,
            "repeat" => {
                let raw = arg.ok_or_else(|| anyhow!("`repeat` needs a mode"))?;
                Step::Repeat(raw.parse().map_err(|err: String| anyhow!(err))?)
            }
            "end" => Step::End,
            "report" => Step::Report,
            other => bail!("unknown step `{other}`"),
        };
        Ok(step)
    }
}

pub fn parse_script(text: &str) -> Result<Vec<(String, Step)>> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(n, line)| {
            line.parse()
                .map(|step| (line.to_string(), step))
                .with_context(|| format!("line {n}"))
        })
        .collect()
}
