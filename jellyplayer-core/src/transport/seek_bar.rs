//! Scrubber gesture handling.
//!
//! Pointer coordinates are relative to the bar: `x` from its left edge,
//! `y` from its vertical centre. Presses are accepted within a generous
//! band around the thin visual bar; once a drag starts it follows the
//! pointer anywhere until release.

use jellyplayer_model::Ticks;
use serde::Serialize;

use crate::constants::seek_bar::{CLICK_TOLERANCE_MULTIPLIER, VISUAL_HEIGHT};
use crate::playback::{MediaElement, PlaybackSession};
use crate::trickplay::PreviewBubble;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved { x: f32, y: f32 },
    Pressed { x: f32, y: f32 },
    Released { x: f32 },
    Left,
}

/// What a pointer event asks of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekGesture {
    Begin(Ticks),
    Update(Ticks),
    Commit(Ticks),
}

impl SeekGesture {
    pub fn apply<E: MediaElement>(
        self,
        session: &mut PlaybackSession<E>,
    ) -> Ticks {
        match self {
            SeekGesture::Begin(target) | SeekGesture::Update(target) => {
                session.begin_seek(target)
            }
            SeekGesture::Commit(target) => session.commit_seek(target),
        }
    }
}

/// Map a horizontal pointer position to a media position.
pub fn calculate_seek_position(x: f32, width: f32, duration: Ticks) -> Ticks {
    if width <= 0.0 || !x.is_finite() {
        return Ticks::ZERO;
    }
    let normalized = f64::from((x / width).clamp(0.0, 1.0));
    Ticks::new((normalized * duration.value() as f64).round() as u64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterMark {
    pub fraction: f32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverPreview {
    pub x: f32,
    pub bubble: PreviewBubble,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeekBarView {
    pub played_fraction: f32,
    pub displayed: Ticks,
    pub dragging: bool,
    pub chapter_marks: Vec<ChapterMark>,
    pub hover: Option<HoverPreview>,
}

fn fraction(position: Ticks, duration: Ticks) -> f32 {
    if duration.is_zero() {
        return 0.0;
    }
    (position.value() as f64 / duration.value() as f64).clamp(0.0, 1.0) as f32
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeekBar {
    width: f32,
    hover_x: Option<f32>,
    dragging: bool,
}

impl SeekBar {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            hover_x: None,
            dragging: false,
        }
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn hover_x(&self) -> Option<f32> {
        self.hover_x
    }

    fn within_hit_zone(y: f32) -> bool {
        y.abs() <= VISUAL_HEIGHT * CLICK_TOLERANCE_MULTIPLIER
    }

    pub fn position_at(&self, x: f32, duration: Ticks) -> Ticks {
        calculate_seek_position(x, self.width, duration)
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        duration: Ticks,
    ) -> Option<SeekGesture> {
        match event {
            PointerEvent::Moved { x, y } => {
                if self.dragging {
                    self.hover_x = Some(x);
                    let target = self.position_at(x, duration);
                    return Some(SeekGesture::Update(target));
                }
                self.hover_x = Self::within_hit_zone(y).then_some(x);
                None
            }
            PointerEvent::Pressed { x, y } => {
                if !Self::within_hit_zone(y) {
                    return None;
                }
                self.dragging = true;
                self.hover_x = Some(x);
                Some(SeekGesture::Begin(self.position_at(x, duration)))
            }
            PointerEvent::Released { x } => {
                if !self.dragging {
                    return None;
                }
                self.dragging = false;
                Some(SeekGesture::Commit(self.position_at(x, duration)))
            }
            PointerEvent::Left => {
                if !self.dragging {
                    self.hover_x = None;
                }
                None
            }
        }
    }

    /// Render state for the bar, including the hover bubble.
    pub fn view<E: MediaElement>(
        &self,
        session: &PlaybackSession<E>,
    ) -> SeekBarView {
        let clock = session.store().clock();
        let media = session.store().media();
        let chapter_marks = media
            .chapters
            .iter()
            .filter(|chapter| !chapter.start.is_zero())
            .map(|chapter| ChapterMark {
                fraction: fraction(chapter.start, clock.duration),
                name: chapter.name.clone(),
            })
            .collect();
        let hover = self.hover_x.map(|x| HoverPreview {
            x,
            bubble: session.preview_at(self.position_at(x, clock.duration)),
        });

        SeekBarView {
            played_fraction: fraction(clock.displayed, clock.duration),
            displayed: clock.displayed,
            dragging: self.dragging,
            chapter_marks,
            hover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Ticks = Ticks::from_secs(1000);

    #[test]
    fn seek_position_is_clamped_to_the_bar() {
        assert_eq!(
            calculate_seek_position(250.0, 1000.0, DURATION),
            Ticks::from_secs(250)
        );
        assert_eq!(
            calculate_seek_position(-5.0, 1000.0, DURATION),
            Ticks::ZERO
        );
        assert_eq!(calculate_seek_position(2000.0, 1000.0, DURATION), DURATION);
        assert_eq!(calculate_seek_position(10.0, 0.0, DURATION), Ticks::ZERO);
    }

    #[test]
    fn presses_outside_the_band_are_ignored() {
        let mut bar = SeekBar::new(1000.0);
        let press = PointerEvent::Pressed { x: 100.0, y: 40.0 };
        assert_eq!(bar.handle(press, DURATION), None);
        assert!(!bar.is_dragging());
    }

    #[test]
    fn drag_begins_updates_and_commits() {
        let mut bar = SeekBar::new(1000.0);
        assert_eq!(
            bar.handle(PointerEvent::Pressed { x: 100.0, y: 2.0 }, DURATION),
            Some(SeekGesture::Begin(Ticks::from_secs(100)))
        );
        // Dragging keeps tracking outside the vertical band.
        assert_eq!(
            bar.handle(PointerEvent::Moved { x: 400.0, y: 200.0 }, DURATION),
            Some(SeekGesture::Update(Ticks::from_secs(400)))
        );
        bar.handle(PointerEvent::Left, DURATION);
        assert_eq!(bar.hover_x(), Some(400.0));
        assert_eq!(
            bar.handle(PointerEvent::Released { x: 450.0 }, DURATION),
            Some(SeekGesture::Commit(Ticks::from_secs(450)))
        );
        assert!(!bar.is_dragging());
        let stray = PointerEvent::Released { x: 10.0 };
        assert_eq!(bar.handle(stray, DURATION), None);
    }

    #[test]
    fn hover_follows_the_band() {
        let mut bar = SeekBar::new(1000.0);
        bar.handle(PointerEvent::Moved { x: 10.0, y: 1.0 }, DURATION);
        assert_eq!(bar.hover_x(), Some(10.0));
        bar.handle(PointerEvent::Moved { x: 10.0, y: 100.0 }, DURATION);
        assert_eq!(bar.hover_x(), None);
    }
}
