mod support;

use jellyplayer_core::{PlayerError, RemoveOutcome, RepeatMode};
use jellyplayer_model::ItemId;
use support::{Harness, item};

fn abc() -> Vec<jellyplayer_model::PlayableItem> {
    vec![item("a"), item("b"), item("c")]
}

fn id(s: &str) -> ItemId {
    ItemId::new(s).unwrap()
}

#[test]
fn set_queue_loads_the_start_item() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 1).unwrap();

    assert_eq!(h.current_id().as_deref(), Some("b"));
    assert_eq!(
        h.element.opened_url().unwrap().as_str(),
        "https://media.example/Videos/b/stream"
    );
    assert_eq!(h.session.store().queue().current, Some(1));
}

#[test]
fn invalid_start_keeps_the_previous_queue() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 0).unwrap();

    let err = h.session.set_queue(vec![item("c")], 5).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidIndex { index: 5, len: 1 }));
    assert_eq!(h.queue_ids(), ["a", "b", "c"]);
    assert_eq!(h.current_id().as_deref(), Some("a"));
}

#[test]
fn removing_an_earlier_item_keeps_the_current_one() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 1).unwrap();

    let outcome = h.session.remove_from_queue(&id("a")).unwrap();
    assert_eq!(outcome, RemoveOutcome::Removed);
    assert_eq!(h.queue_ids(), ["b", "c"]);
    assert_eq!(h.session.queue().current_index(), Some(0));
    assert_eq!(h.current_id().as_deref(), Some("b"));
}

#[test]
fn reorder_tracks_the_playing_item() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 0).unwrap();

    h.session.reorder_queue(0, 2).unwrap();
    assert_eq!(h.queue_ids(), ["b", "c", "a"]);
    assert_eq!(h.session.queue().current_index(), Some(2));
    assert_eq!(h.current_id().as_deref(), Some("a"));
}

#[test]
fn removing_the_playing_item_loads_its_successor() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 1).unwrap();

    let outcome = h.session.remove_from_queue(&id("b")).unwrap();
    assert_eq!(outcome, RemoveOutcome::CurrentReplaced(1));
    assert_eq!(h.current_id().as_deref(), Some("c"));
}

#[test]
fn removing_the_only_item_stops_playback() {
    let mut h = Harness::new();
    h.session.set_queue(vec![item("a")], 0).unwrap();

    let outcome = h.session.remove_from_queue(&id("a")).unwrap();
    assert_eq!(outcome, RemoveOutcome::Stopped);
    assert!(h.session.current_load().is_none());
    assert!(!h.element.is_loaded());
    assert!(h.session.store().media().item.is_none());
}

#[test]
fn removing_the_playing_tail_item_keeps_a_usable_cursor() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 2).unwrap();

    let outcome = h.session.remove_from_queue(&id("c")).unwrap();
    assert_eq!(outcome, RemoveOutcome::Stopped);
    assert!(h.session.current_load().is_none());
    assert_eq!(h.queue_ids(), ["a", "b"]);

    let snapshot = h.session.store().queue();
    assert_eq!(snapshot.current, Some(1));
    assert!(snapshot.has_previous);
    assert!(!snapshot.has_next);

    assert!(h.session.previous_item().unwrap());
    assert_eq!(h.current_id().as_deref(), Some("a"));
}

#[test]
fn next_is_a_no_op_at_the_end_without_repeat() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 2).unwrap();

    assert!(!h.session.next_item().unwrap());
    assert_eq!(h.current_id().as_deref(), Some("c"));

    h.session.set_repeat(RepeatMode::All);
    assert!(h.session.next_item().unwrap());
    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert!(!h.session.previous_item().unwrap());
}

#[test]
fn end_of_stream_advances_through_the_queue() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 0).unwrap();
    h.session.pump();

    h.element.finish();
    h.session.pump();
    assert_eq!(h.current_id().as_deref(), Some("b"));

    h.session.jump_to(2).unwrap();
    h.session.pump();
    h.element.finish();
    h.session.pump();
    assert!(h.session.current_load().is_none());
    assert_eq!(h.session.queue().current_index(), Some(2));
}

#[test]
fn repeat_one_replays_on_end() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 1).unwrap();
    h.session.set_repeat(RepeatMode::One);
    h.session.pump();
    let first_session = h.session.play_session_id();

    h.element.finish();
    h.session.pump();
    assert_eq!(h.current_id().as_deref(), Some("b"));
    assert_ne!(h.session.play_session_id(), first_session);
}

#[test]
fn unresolvable_items_surface_an_error() {
    let mut h = Harness::new();
    let err = h
        .session
        .set_queue(vec![item("missing")], 0)
        .unwrap_err();
    assert!(matches!(err, PlayerError::Resolve { .. }));
    assert!(h.session.queue().is_empty());
    assert_eq!(h.session.store().queue().current, None);
}

#[test]
fn failed_resolution_leaves_queue_and_playback_alone() {
    let mut h = Harness::new();
    h.session
        .set_queue(vec![item("a"), item("missing"), item("c")], 0)
        .unwrap();
    h.session.pump();

    let err = h.session.next_item().unwrap_err();
    assert!(matches!(err, PlayerError::Resolve { .. }));
    let err = h.session.jump_to(1).unwrap_err();
    assert!(matches!(err, PlayerError::Resolve { .. }));

    assert_eq!(h.session.store().queue().current, Some(0));
    assert_eq!(h.session.queue().current_index(), Some(0));
    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert!(h.element.is_loaded());

    let err = h.session.remove_from_queue(&id("a")).unwrap_err();
    assert!(matches!(err, PlayerError::Resolve { .. }));
    assert_eq!(h.queue_ids(), ["a", "missing", "c"]);
    assert_eq!(h.current_id().as_deref(), Some("a"));

    let rejected = h
        .session
        .set_queue(vec![item("missing"), item("b")], 0)
        .unwrap_err();
    assert!(matches!(rejected, PlayerError::Resolve { .. }));
    assert_eq!(h.queue_ids(), ["a", "missing", "c"]);
    assert_eq!(h.session.store().queue().items.len(), 3);
    assert_eq!(h.current_id().as_deref(), Some("a"));
}

#[test]
fn item_changes_are_reported_as_stop_then_start() {
    let mut h = Harness::new();
    h.session.set_queue(abc(), 0).unwrap();
    h.session.next_item().unwrap();
    h.session.stop();

    assert_eq!(
        h.reporter.kinds(),
        ["start", "stopped", "start", "stopped"]
    );
    let reports = h.reporter.reports();
    assert_eq!(reports[1].info().item_id.as_str(), "a");
    assert_eq!(reports[2].info().item_id.as_str(), "b");
    assert!(h.session.queue().is_empty());
}
