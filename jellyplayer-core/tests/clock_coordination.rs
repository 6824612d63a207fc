mod support;

use std::time::{Duration, Instant};

use jellyplayer_core::ElementEvent;
use jellyplayer_core::transport::{ControlsVisibility, PointerEvent, SeekBar};
use jellyplayer_model::{TickDelta, Ticks};
use support::{FEATURE_SECS, Harness};

#[test]
fn commit_then_matching_time_update_settles() {
    let mut h = Harness::loaded();
    for secs in [0, 1, 59, 1800, FEATURE_SECS] {
        let target = Ticks::from_secs(secs);
        h.session.begin_seek(target);
        h.session.commit_seek(target);
        h.session.on_time_update(target.as_seconds_f64());

        assert_eq!(h.session.clock().current(), target);
        assert!(!h.session.clock().is_seeking());
    }
}

#[test]
fn element_reports_cannot_move_a_pending_scrub() {
    let mut h = Harness::loaded();
    h.session.on_time_update(100.0);
    h.session.begin_seek(Ticks::from_secs(2000));

    for secs in [101.0, 102.0, 103.0] {
        h.element.emit(ElementEvent::TimeUpdate(secs));
    }
    h.session.pump();

    let clock = h.session.store().clock();
    assert_eq!(clock.current, Ticks::from_secs(100));
    assert_eq!(clock.displayed, Ticks::from_secs(2000));
    assert!(clock.seeking);

    h.session.commit_seek(Ticks::from_secs(2000));
    h.session.pump();
    assert_eq!(h.session.clock().current(), Ticks::from_secs(2000));
    assert_eq!(h.element.position(), 2000.0);
}

#[test]
fn seek_bar_drag_holds_the_clock_until_release() {
    let mut h = Harness::loaded();
    let mut bar = SeekBar::new(1000.0);
    let duration = h.session.clock().duration();
    h.element.advance(10.0);
    h.session.pump();
    let seeks_before = h.element.seek_log().len();

    let begin = bar
        .handle(PointerEvent::Pressed { x: 250.0, y: 0.0 }, duration)
        .expect("press on the bar starts a drag");
    assert_eq!(begin.apply(&mut h.session), Ticks::from_secs(900));

    // The element keeps reporting while the pointer moves.
    h.element.advance(1.0);
    let update = bar
        .handle(PointerEvent::Moved { x: 500.0, y: 60.0 }, duration)
        .expect("drag follows the pointer off the bar");
    update.apply(&mut h.session);
    h.element.emit(ElementEvent::TimeUpdate(12.0));
    h.session.pump();

    assert_eq!(h.session.clock().current(), Ticks::from_secs(10));
    let view = bar.view(&h.session);
    assert!(view.dragging);
    assert_eq!(view.displayed, Ticks::from_secs(1800));
    assert_eq!(view.played_fraction, 0.5);
    assert_eq!(h.element.seek_log().len(), seeks_before);

    let commit = bar
        .handle(PointerEvent::Released { x: 500.0 }, duration)
        .expect("release ends the drag");
    assert_eq!(commit.apply(&mut h.session), Ticks::from_secs(1800));
    h.session.pump();

    assert!(!h.session.clock().is_seeking());
    assert_eq!(h.session.clock().current(), Ticks::from_secs(1800));
    assert_eq!(h.element.position(), 1800.0);
    let view = bar.view(&h.session);
    assert!(!view.dragging);
    assert_eq!(view.displayed, Ticks::from_secs(1800));
}

#[test]
fn seek_bar_activity_keeps_controls_visible() {
    let mut h = Harness::loaded();
    h.session.play().expect("play succeeds");
    let mut bar = SeekBar::new(1000.0);
    let duration = h.session.clock().duration();
    let start = Instant::now();
    let mut controls = ControlsVisibility::new(Duration::from_secs(3), start);
    let playing = h.session.store().transport().playing;

    assert!(controls.tick(start + Duration::from_secs(4), playing));
    assert!(!controls.is_visible());

    let hover = PointerEvent::Moved { x: 100.0, y: 0.0 };
    assert_eq!(bar.handle(hover, duration), None);
    assert!(controls.touch(start + Duration::from_secs(5)));
    let view = bar.view(&h.session);
    let preview = view.hover.expect("hovering shows a preview");
    assert_eq!(preview.x, 100.0);
    assert!(!controls.tick(start + Duration::from_secs(6), playing));

    h.session.pause().expect("pause succeeds");
    let playing = h.session.store().transport().playing;
    assert!(!playing);
    assert!(!controls.tick(start + Duration::from_secs(30), playing));
    assert!(controls.is_visible());
}

#[test]
fn scrub_without_commit_stays_diverged() {
    let mut h = Harness::loaded();
    h.session.begin_seek(Ticks::from_secs(900));
    h.element.advance(30.0);
    h.element.advance(30.0);
    h.session.pump();

    assert!(h.session.clock().is_seeking());
    assert_eq!(h.session.clock().displayed(), Ticks::from_secs(900));
    assert_eq!(h.session.clock().current(), Ticks::ZERO);

    h.session.cancel_seek();
    h.element.advance(1.0);
    h.session.pump();
    assert_eq!(h.session.clock().current(), Ticks::from_secs(61));
}

#[test]
fn relative_seeks_round_trip_and_clamp() {
    let mut h = Harness::loaded();
    let step = h.session.settings().manual_seek_step;

    h.session.commit_seek(Ticks::from_secs(600));
    h.session.seek_relative(step);
    h.session.seek_relative(step.reversed());
    assert_eq!(h.session.clock().current(), Ticks::from_secs(600));

    h.session.commit_seek(Ticks::ZERO);
    assert_eq!(h.session.seek_relative(step.reversed()), Ticks::ZERO);

    h.session.commit_seek(Ticks::from_secs(FEATURE_SECS - 5));
    assert_eq!(
        h.session.seek_relative(TickDelta::from_secs(15)),
        Ticks::from_secs(FEATURE_SECS)
    );
}

#[test]
fn out_of_range_commit_is_clamped() {
    let mut h = Harness::loaded();
    let landed = h.session.commit_seek(Ticks::from_secs(FEATURE_SECS * 2));
    assert_eq!(landed, Ticks::from_secs(FEATURE_SECS));
    assert_eq!(h.element.seek_log().last(), Some(&(FEATURE_SECS as f64)));
}

#[test]
fn next_chapter_walks_forward_then_stops() {
    let mut h = Harness::loaded();
    h.session.commit_seek(Ticks::from_secs(10));

    let mut visited = Vec::new();
    while let Some(start) = h.session.seek_to_next_chapter() {
        visited.push(start);
        assert!(visited.len() <= 10, "chapter navigation did not terminate");
    }

    assert_eq!(
        visited,
        vec![
            Ticks::from_secs(300),
            Ticks::from_secs(1200),
            Ticks::from_secs(3000)
        ]
    );
    assert!(visited.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(h.session.clock().current(), Ticks::from_secs(3000));
    assert_eq!(h.session.seek_to_next_chapter(), None);
}

#[test]
fn previous_chapter_uses_strictly_earlier_starts() {
    let mut h = Harness::loaded();

    h.session.commit_seek(Ticks::from_secs(1202));
    assert_eq!(
        h.session.seek_to_previous_chapter(),
        Some(Ticks::from_secs(1200))
    );
    // Exactly on a boundary: the chapter before it.
    assert_eq!(
        h.session.seek_to_previous_chapter(),
        Some(Ticks::from_secs(300))
    );
    h.session.commit_seek(Ticks::ZERO);
    assert_eq!(h.session.seek_to_previous_chapter(), None);
}

#[test]
fn restart_threshold_skips_a_just_started_chapter() {
    let settings = jellyplayer_core::SessionSettings {
        chapter_restart_threshold: Ticks::from_secs(3),
        ..Default::default()
    };
    let mut h = Harness::with_settings(settings);
    h.session.load(support::load("a")).unwrap();

    h.session.commit_seek(Ticks::from_secs(1202));
    assert_eq!(
        h.session.seek_to_previous_chapter(),
        Some(Ticks::from_secs(300))
    );
}

#[test]
fn duration_from_the_element_overrides_runtime() {
    let element =
        jellyplayer_core::SimulatedElement::new().with_media_duration(120.0);
    let mut h = Harness::with_element(element, Default::default());
    h.session.load(support::load("a")).unwrap();
    assert_eq!(h.session.clock().duration(), Ticks::from_secs(FEATURE_SECS));

    h.session.pump();
    assert_eq!(h.session.clock().duration(), Ticks::from_secs(120));
    assert_eq!(
        h.session.commit_seek(Ticks::from_secs(500)),
        Ticks::from_secs(120)
    );
}
