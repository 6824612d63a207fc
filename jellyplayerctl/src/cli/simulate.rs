use std::{
    fs,
    io::Write,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Args;
use jellyplayer_config::PlayerConfig;
use jellyplayer_core::{
    ChannelReporter, MediaLoad, PlaybackReport, PlaybackSession,
    SessionSettings, SimulatedElement, StaticResolver, TransportCommand,
    playback::ClockSnapshot,
    transport::{
        ControlsView, ControlsVisibility, PointerEvent, SeekBar, SeekBarView,
        TransportAction, controls_view,
    },
};
use jellyplayer_model::{
    Chapter, ChapterList, ItemId, ItemKind, MediaSegment, MediaSegmentKind,
    PlayableItem, SegmentList, Ticks,
};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};
use url::Url;

use super::script::{DEFAULT_SCRIPT, Step, parse_script};

/// Seek bar width in pointer units; script spots scale onto it.
const SEEK_BAR_WIDTH: f32 = 1000.0;

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Script file, one step per line. The built-in demo runs otherwise.
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Runtime of every simulated item
    #[arg(long, value_parser = humantime::parse_duration, default_value = "1h")]
    pub runtime: Duration,
    /// Number of items in the queue
    #[arg(long, default_value_t = 3)]
    pub items: usize,
    /// Also print start, progress and stopped reports
    #[arg(long)]
    pub reports: bool,
}

#[derive(Debug, Serialize)]
struct StepLine<'a> {
    step: usize,
    command: &'a str,
    item: Option<&'a str>,
    clock: ClockSnapshot,
    controls: ControlsView,
    controls_visible: bool,
    seek_bar: SeekBarView,
}

#[derive(Debug, Serialize)]
struct ReportLine<'a> {
    step: usize,
    report: &'a PlaybackReport,
}

fn demo_load(index: usize, runtime: Duration) -> Result<MediaLoad> {
    let id = format!("item-{}", index + 1);
    let runtime = Ticks::from(runtime);
    let item = PlayableItem::new(
        ItemId::new(id.as_str())?,
        format!("Feature {}", index + 1),
        ItemKind::Movie,
    )
    .with_runtime(runtime);
    let url = Url::parse(&format!("https://jellyfin.local/Videos/{id}/stream"))?;

    // Four evenly spaced chapters and a thirty second intro.
    let quarter = Ticks::new(runtime.value() / 4);
    let chapters = ChapterList::new(
        (0..4u64)
            .map(|n| {
                Chapter::new(
                    format!("Chapter {}", n + 1),
                    Ticks::new(quarter.value() * n),
                )
            })
            .collect(),
    );
    let intro = MediaSegment::new(
        MediaSegmentKind::Intro,
        Ticks::ZERO,
        Ticks::from_secs(30).clamp_to(runtime),
    )?;

    Ok(MediaLoad::new(item, url)
        .with_start(Ticks::ZERO)
        .with_chapters(chapters)
        .with_segments(SegmentList::new(vec![intro])))
}

/// Feed one pointer event through the seek bar into the session.
fn pointer(
    session: &mut PlaybackSession<SimulatedElement>,
    bar: &mut SeekBar,
    event: PointerEvent,
) {
    let duration = session.clock().duration();
    if let Some(gesture) = bar.handle(event, duration) {
        let target = gesture.apply(session);
        debug!(?gesture, target = %target, "seek bar gesture");
    }
}

fn apply(
    session: &mut PlaybackSession<SimulatedElement>,
    element: &SimulatedElement,
    bar: &mut SeekBar,
    settings: &SessionSettings,
    step: &Step,
) -> Result<()> {
    let x = |spot: &f32| spot * SEEK_BAR_WIDTH;
    let command = match step {
        Step::Advance(by) => {
            element.advance(by.as_secs_f64());
            return Ok(());
        }
        Step::Scrub(to) => {
            session.begin_seek(Ticks::from(*to));
            return Ok(());
        }
        Step::Commit => {
            match session.clock().pending_seek() {
                Some(target) => {
                    session.commit_seek(target);
                }
                None => debug!("commit without a pending scrub"),
            }
            return Ok(());
        }
        Step::Cancel => {
            session.cancel_seek();
            return Ok(());
        }
        Step::Hover(spot) | Step::Drag(spot) => {
            let event = PointerEvent::Moved { x: x(spot), y: 0.0 };
            pointer(session, bar, event);
            return Ok(());
        }
        Step::Press(spot) => {
            let event = PointerEvent::Pressed { x: x(spot), y: 0.0 };
            pointer(session, bar, event);
            return Ok(());
        }
        Step::Release(spot) => {
            pointer(session, bar, PointerEvent::Released { x: x(spot) });
            return Ok(());
        }
        Step::Leave => {
            pointer(session, bar, PointerEvent::Left);
            return Ok(());
        }
        Step::End => {
            element.finish();
            return Ok(());
        }
        Step::Play => TransportCommand::Play,
        Step::Pause => TransportCommand::Pause,
        Step::Toggle => TransportCommand::TogglePlay,
        Step::Seek(to) => TransportCommand::SeekTo(Ticks::from(*to)),
        Step::Forward => TransportAction::FastForward.command(settings),
        Step::Rewind => TransportAction::Rewind.command(settings),
        Step::NextChapter => TransportCommand::NextChapter,
        Step::PreviousChapter => TransportCommand::PreviousChapter,
        Step::Skip => TransportCommand::SkipSegment,
        Step::Volume(level) => TransportCommand::SetVolume(*level),
        Step::Mute => TransportCommand::ToggleMute,
        Step::Next => TransportCommand::NextItem,
        Step::Previous => TransportCommand::PreviousItem,
        Step::Repeat(mode) => TransportCommand::SetRepeat(*mode),
        Step::Report => TransportCommand::ReportProgress,
    };
    session.dispatch(command)?;
    Ok(())
}

fn drain_reports(
    step: usize,
    reports: &mut UnboundedReceiver<PlaybackReport>,
    print: bool,
    out: &mut impl Write,
) -> Result<()> {
    while let Ok(report) = reports.try_recv() {
        if print {
            let line = ReportLine {
                step,
                report: &report,
            };
            writeln!(out, "{}", serde_json::to_string(&line)?)?;
        }
    }
    Ok(())
}

pub async fn run(args: SimulateArgs, config: &PlayerConfig) -> Result<()> {
    let text = match &args.script {
        Some(path) => fs::read_to_string(path).with_context(|| {
            format!("failed to read script {}", path.display())
        })?,
        None => DEFAULT_SCRIPT.to_string(),
    };
    let steps = parse_script(&text)?;

    let settings = config.session_settings();
    let loads = (0..args.items.max(1))
        .map(|index| demo_load(index, args.runtime))
        .collect::<Result<Vec<_>>>()?;
    let items: Vec<PlayableItem> =
        loads.iter().map(|load| load.item.clone()).collect();

    let element = SimulatedElement::new()
        .with_media_duration(args.runtime.as_secs_f64());
    let (reporter, mut reports) = ChannelReporter::new();
    let mut session = PlaybackSession::new(element.clone(), settings.clone())
        .with_resolver(Arc::new(StaticResolver::new(loads)))
        .with_reporter(Arc::new(reporter));

    session.set_queue(items, 0)?;
    session.start_progress_reporting();
    session.pump();

    let mut bar = SeekBar::new(SEEK_BAR_WIDTH);
    // Script time only moves on `advance`.
    let mut now = Instant::now();
    let mut visibility =
        ControlsVisibility::new(settings.controls_auto_hide, now);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    drain_reports(0, &mut reports, args.reports, &mut out)?;

    for (index, (source, step)) in steps.iter().enumerate() {
        let number = index + 1;
        match step {
            Step::Advance(by) => now += *by,
            _ => {
                visibility.touch(now);
            }
        }
        if let Err(err) =
            apply(&mut session, &element, &mut bar, &settings, step)
        {
            warn!(step = number, command = %source, "step failed: {err}");
        }
        session.pump();
        visibility.tick(now, session.store().transport().playing);

        let line = StepLine {
            step: number,
            command: source,
            item: session.current_load().map(|load| load.item.id.as_str()),
            clock: session.store().clock(),
            controls: controls_view(session.store(), session.settings()),
            controls_visible: visibility.is_visible(),
            seek_bar: bar.view(&session),
        };
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
        drain_reports(number, &mut reports, args.reports, &mut out)?;
    }

    session.close();
    drain_reports(steps.len() + 1, &mut reports, args.reports, &mut out)?;
    Ok(())
}
