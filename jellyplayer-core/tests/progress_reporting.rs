mod support;

use std::time::Duration;

use jellyplayer_core::{PlaybackReport, SessionSettings, TransportCommand};
use jellyplayer_model::Ticks;
use support::Harness;

fn settings() -> SessionSettings {
    SessionSettings {
        progress_interval: Duration::from_secs(10),
        ..SessionSettings::default()
    }
}

#[tokio::test(start_paused = true)]
async fn ticker_drives_progress_reports() {
    let mut h = Harness::with_settings(settings());
    h.session.load(support::load("a")).unwrap();
    h.session.start_progress_reporting();
    h.session.commit_seek(Ticks::from_secs(75));

    tokio::time::sleep(Duration::from_secs(11)).await;
    while h.session.pump() > 0 {}

    let progress: Vec<_> = h
        .reporter
        .reports()
        .into_iter()
        .filter(|report| matches!(report, PlaybackReport::Progress(_)))
        .collect();
    assert_eq!(progress.len(), 1);
    let info = progress[0].info();
    assert_eq!(info.position_ticks, Ticks::from_secs(75));
    assert_eq!(info.volume_level, 80);
    assert!(!info.is_paused);
    assert_eq!(info.repeat_mode, "RepeatNone");
}

#[tokio::test(start_paused = true)]
async fn closing_cancels_the_ticker() {
    let mut h = Harness::with_settings(settings());
    h.session.load(support::load("a")).unwrap();
    h.session.start_progress_reporting();
    let handle = h.session.handle();

    h.session.close();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(handle.is_closed());
    assert!(!handle.send(TransportCommand::ReportProgress));
    assert_eq!(h.reporter.kinds(), ["start", "stopped"]);
}

#[tokio::test(start_paused = true)]
async fn process_next_applies_commands_from_other_tasks() {
    let mut h = Harness::loaded();
    let handle = h.session.handle();

    tokio::spawn(async move {
        handle.send(TransportCommand::SeekTo(Ticks::from_secs(300)));
        handle.send(TransportCommand::Pause);
    });

    while h.session.store().transport().playing {
        assert!(h.session.process_next().await);
    }
    assert_eq!(h.session.clock().current(), Ticks::from_secs(300));
}

#[test]
fn reporting_without_a_runtime_is_skipped() {
    let mut h = Harness::loaded();
    h.session.start_progress_reporting();
    h.session.report_progress();
    assert_eq!(h.reporter.kinds(), ["start", "progress"]);
}

#[test]
fn track_changes_are_reported() {
    use jellyplayer_model::{MediaTrack, TrackKind};

    let mut h = Harness::new();
    let load = support::load("a").with_tracks(vec![
        MediaTrack::new(1, TrackKind::Audio),
        MediaTrack::new(2, TrackKind::Audio),
        MediaTrack::new(5, TrackKind::Subtitle),
    ]);
    h.session.load(load).unwrap();
    assert_eq!(h.element.subtitle_stream(), Some(5));

    h.session.select_audio_track(2).unwrap();
    h.session.toggle_subtitles().unwrap();
    assert!(h.session.select_audio_track(9).is_err());

    let reports = h.reporter.reports();
    let last = reports.last().unwrap().info();
    assert_eq!(last.audio_stream_index, Some(2));
    assert_eq!(last.subtitle_stream_index, None);
    assert_eq!(h.element.audio_stream(), Some(2));
    assert_eq!(h.element.subtitle_stream(), None);
}
