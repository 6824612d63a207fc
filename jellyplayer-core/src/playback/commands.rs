use std::sync::atomic::{AtomicU64, Ordering};

use jellyplayer_model::{TickDelta, Ticks};
use tokio::sync::mpsc;

use crate::queue::RepeatMode;

/// Requests that reach a session from outside its owner's call stack: media
/// keys, the progress ticker, other windows.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
    Play,
    Pause,
    TogglePlay,
    Stop,
    SeekTo(Ticks),
    SeekRelative(TickDelta),
    NextChapter,
    PreviousChapter,
    SkipSegment,
    NextItem,
    PreviousItem,
    ToggleFullscreen,
    TogglePictureInPicture,
    ToggleMute,
    SetVolume(f64),
    SetRepeat(RepeatMode),
    ReportProgress,
}

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Cloneable sender half of a session's command queue.
///
/// Every session gets a distinct [`id`](Self::id); media-session bindings
/// use it to tell whether the callbacks they registered still point at the
/// live session.
#[derive(Debug, Clone)]
pub struct TransportHandle {
    id: u64,
    tx: mpsc::UnboundedSender<TransportCommand>,
}

impl TransportHandle {
    pub(crate) fn channel()
    -> (Self, mpsc::UnboundedReceiver<TransportCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed);
        (Self { id, tx }, rx)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queue a command. Returns `false` once the session has been torn
    /// down.
    pub fn send(&self, command: TransportCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
