mod support;

use std::collections::HashMap;
use std::sync::Arc;

use jellyplayer_core::transport::TransportAction;
use jellyplayer_core::{
    ActionDetails, ActionHandler, MediaMetadata, MediaSessionAction,
    MediaSessionBinding, MediaSessionError, MediaSessionPlatform,
};
use jellyplayer_model::{TickDelta, Ticks};
use parking_lot::Mutex;
use support::Harness;

#[derive(Default)]
struct OsState {
    handlers: HashMap<MediaSessionAction, ActionHandler>,
    metadata: Option<MediaMetadata>,
    position: Option<(Ticks, Ticks, f64)>,
    available: bool,
}

#[derive(Clone)]
struct FakeOs(Arc<Mutex<OsState>>);

impl FakeOs {
    fn new() -> Self {
        FakeOs(Arc::new(Mutex::new(OsState {
            available: true,
            ..OsState::default()
        })))
    }

    fn unavailable() -> Self {
        FakeOs(Arc::new(Mutex::new(OsState::default())))
    }

    fn press(&self, action: MediaSessionAction, seek_offset: Option<f64>) {
        let state = self.0.lock();
        let handler = state.handlers.get(&action).expect("handler registered");
        handler(ActionDetails { seek_offset });
    }

    fn handler_count(&self) -> usize {
        self.0.lock().handlers.len()
    }

    fn binding(&self) -> MediaSessionBinding {
        MediaSessionBinding::new(
            Box::new(self.clone()),
            TickDelta::from_secs(10),
        )
    }
}

impl MediaSessionPlatform for FakeOs {
    fn set_action_handler(
        &mut self,
        action: MediaSessionAction,
        handler: Option<ActionHandler>,
    ) -> Result<(), MediaSessionError> {
        let mut state = self.0.lock();
        if !state.available {
            return Err(MediaSessionError::Unavailable);
        }
        match handler {
            Some(handler) => state.handlers.insert(action, handler),
            None => state.handlers.remove(&action),
        };
        Ok(())
    }

    fn set_metadata(
        &mut self,
        metadata: Option<MediaMetadata>,
    ) -> Result<(), MediaSessionError> {
        let mut state = self.0.lock();
        if !state.available {
            return Err(MediaSessionError::Unavailable);
        }
        state.metadata = metadata;
        Ok(())
    }

    fn set_position_state(
        &mut self,
        position: Ticks,
        duration: Ticks,
        rate: f64,
    ) -> Result<(), MediaSessionError> {
        let mut state = self.0.lock();
        if !state.available {
            return Err(MediaSessionError::Unavailable);
        }
        state.position = Some((position, duration, rate));
        Ok(())
    }
}

#[test]
fn media_keys_default_to_ten_seconds_and_buttons_to_fifteen() {
    let os = FakeOs::new();
    let mut h = Harness::loaded();
    h.session.attach_media_session(os.binding());
    h.session.commit_seek(Ticks::from_secs(100));

    os.press(MediaSessionAction::SeekForward, None);
    h.session.pump();
    assert_eq!(h.session.clock().current(), Ticks::from_secs(110));

    os.press(MediaSessionAction::SeekBackward, Some(5.0));
    h.session.pump();
    assert_eq!(h.session.clock().current(), Ticks::from_secs(105));

    let rewind = TransportAction::Rewind.command(h.session.settings());
    h.session.dispatch(rewind).unwrap();
    assert_eq!(h.session.clock().current(), Ticks::from_secs(90));
}

#[test]
fn platform_sees_metadata_and_position() {
    let os = FakeOs::new();
    let mut h = Harness::loaded();
    h.session.attach_media_session(os.binding());
    h.session.commit_seek(Ticks::from_secs(42));

    let state = os.0.lock();
    assert_eq!(state.metadata.as_ref().map(|m| m.title.as_str()), Some("a"));
    let (position, duration, rate) = state.position.expect("position state");
    assert_eq!(position, Ticks::from_secs(42));
    assert_eq!(duration, Ticks::from_secs(support::FEATURE_SECS));
    assert_eq!(rate, 1.0);
}

#[test]
fn play_pause_keys_drive_the_transport() {
    let os = FakeOs::new();
    let mut h = Harness::loaded();
    h.session.attach_media_session(os.binding());

    os.press(MediaSessionAction::Pause, None);
    h.session.pump();
    assert!(!h.session.store().transport().playing);
    assert!(h.element.is_loaded());

    os.press(MediaSessionAction::Play, None);
    h.session.pump();
    assert!(h.session.store().transport().playing);
}

#[test]
fn moving_the_binding_to_a_new_session_rebinds() {
    let os = FakeOs::new();
    let mut first = Harness::loaded();
    first.session.attach_media_session(os.binding());

    let binding = first.session.detach_media_session().unwrap();
    let mut second = Harness::loaded();
    second.session.attach_media_session(binding);
    second.session.commit_seek(Ticks::from_secs(500));

    os.press(MediaSessionAction::SeekForward, Some(20.0));
    assert_eq!(first.session.pump(), 0);
    second.session.pump();
    assert_eq!(second.session.clock().current(), Ticks::from_secs(520));
}

#[test]
fn teardown_unregisters_handlers() {
    let os = FakeOs::new();
    let mut h = Harness::loaded();
    h.session.attach_media_session(os.binding());
    assert_eq!(os.handler_count(), MediaSessionAction::ALL.len());

    h.session.close();
    assert_eq!(os.handler_count(), 0);
    assert!(os.0.lock().metadata.is_none());
}

#[test]
fn unavailable_platform_is_not_an_error() {
    let os = FakeOs::unavailable();
    let mut h = Harness::loaded();
    let binding = os.binding();
    h.session.attach_media_session(binding);

    assert_eq!(os.handler_count(), 0);
    assert_eq!(
        h.session.commit_seek(Ticks::from_secs(5)),
        Ticks::from_secs(5)
    );

    // Rejected metadata and position updates never fail the transport.
    h.session.pause().expect("pause succeeds");
    h.session.play().expect("play succeeds");
    h.session
        .set_queue(vec![support::item("b"), support::item("c")], 0)
        .expect("queue loads");
    assert!(h.session.next_item().expect("next succeeds"));
    h.session.pump();
    assert_eq!(h.current_id().as_deref(), Some("c"));
    assert!(os.0.lock().metadata.is_none());
    assert!(os.0.lock().position.is_none());
}
