//! Playstate reports for the media server.
//!
//! The session builds the payloads; delivering them is the host's job via
//! a [`PlaybackReporter`]. Field names follow the server's playstate API so
//! a reporter can forward the JSON untouched.

use std::sync::Arc;
use std::time::Duration;

use jellyplayer_model::{ItemId, MediaSourceId, PlaySessionId, Ticks};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::commands::{TransportCommand, TransportHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlayMethod {
    #[default]
    DirectPlay,
    DirectStream,
    Transcode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackProgressInfo {
    pub item_id: ItemId,
    pub media_source_id: Option<MediaSourceId>,
    pub play_session_id: PlaySessionId,
    pub play_method: PlayMethod,
    pub position_ticks: Ticks,
    pub playback_start_time_ticks: Ticks,
    pub is_paused: bool,
    pub is_muted: bool,
    /// 0 to 100.
    pub volume_level: u8,
    pub playback_rate: f64,
    pub audio_stream_index: Option<i32>,
    pub subtitle_stream_index: Option<i32>,
    pub can_seek: bool,
    pub repeat_mode: &'static str,
}

impl PlaybackProgressInfo {
    pub fn volume_level(volume: f64) -> u8 {
        (volume.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackStopInfo {
    #[serde(flatten)]
    pub info: PlaybackProgressInfo,
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Event", content = "Info")]
pub enum PlaybackReport {
    Started(PlaybackProgressInfo),
    Progress(PlaybackProgressInfo),
    Stopped(PlaybackStopInfo),
}

impl PlaybackReport {
    pub fn info(&self) -> &PlaybackProgressInfo {
        match self {
            PlaybackReport::Started(info)
            | PlaybackReport::Progress(info)
            | PlaybackReport::Stopped(PlaybackStopInfo { info, .. }) => info,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PlaybackReport::Started(_) => "start",
            PlaybackReport::Progress(_) => "progress",
            PlaybackReport::Stopped(_) => "stopped",
        }
    }
}

/// Delivery of playstate reports. Implementations must not block; queue
/// the work elsewhere if it involves I/O.
pub trait PlaybackReporter: Send + Sync {
    fn report(&self, report: PlaybackReport);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl PlaybackReporter for NoopReporter {
    fn report(&self, report: PlaybackReport) {
        trace!(kind = report.kind(), "dropping playback report");
    }
}

/// Forwards reports into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<PlaybackReport>,
}

impl ChannelReporter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlaybackReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PlaybackReporter for ChannelReporter {
    fn report(&self, report: PlaybackReport) {
        if self.tx.send(report).is_err() {
            debug!("playback report receiver dropped");
        }
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<PlaybackReport>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<PlaybackReport> {
        self.reports.lock().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.reports.lock().iter().map(PlaybackReport::kind).collect()
    }
}

impl PlaybackReporter for RecordingReporter {
    fn report(&self, report: PlaybackReport) {
        self.reports.lock().push(report);
    }
}

/// Background task that asks a session to report progress every
/// `interval`. Cancelled on drop.
#[derive(Debug)]
pub struct ProgressTicker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Must be called from within a Tokio runtime.
    pub fn spawn(interval: Duration, commands: TransportHandle) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if !commands.send(TransportCommand::ReportProgress) {
                            break;
                        }
                    }
                }
            }
            debug!(session = commands.id(), "progress ticker stopped");
        });
        Self { cancel, handle }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> PlaybackProgressInfo {
        PlaybackProgressInfo {
            item_id: ItemId::new("item1").unwrap(),
            media_source_id: None,
            play_session_id: PlaySessionId::new(),
            play_method: PlayMethod::DirectPlay,
            position_ticks: Ticks::from_secs(90),
            playback_start_time_ticks: Ticks::ZERO,
            is_paused: false,
            is_muted: true,
            volume_level: PlaybackProgressInfo::volume_level(0.8),
            playback_rate: 1.0,
            audio_stream_index: Some(1),
            subtitle_stream_index: None,
            can_seek: true,
            repeat_mode: "RepeatNone",
        }
    }

    #[test]
    fn reports_serialize_with_server_field_names() {
        let json =
            serde_json::to_value(PlaybackReport::Progress(info())).unwrap();
        assert_eq!(json["Event"], "Progress");
        assert_eq!(json["Info"]["PositionTicks"], 900_000_000u64);
        assert_eq!(json["Info"]["VolumeLevel"], 80);
        assert_eq!(json["Info"]["IsMuted"], true);
        assert_eq!(json["Info"]["PlayMethod"], "DirectPlay");
        assert!(json["Info"]["SubtitleStreamIndex"].is_null());
    }

    #[test]
    fn stopped_reports_carry_the_failure_flag() {
        let report = PlaybackReport::Stopped(PlaybackStopInfo {
            info: info(),
            failed: false,
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["Info"]["Failed"], false);
        assert_eq!(json["Info"]["ItemId"], "item1");
        assert_eq!(report.kind(), "stopped");
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_sends_on_interval_and_stops_when_cancelled() {
        let (handle, mut rx) = TransportHandle::channel();
        let ticker = ProgressTicker::spawn(Duration::from_secs(10), handle);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(rx.try_recv(), Ok(TransportCommand::ReportProgress));

        ticker.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err());
        assert!(ticker.is_finished());
    }
}
