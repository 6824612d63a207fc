//! Chapter and segment lookups relative to a playhead position.

use jellyplayer_model::{ChapterList, MediaSegment, SegmentList, Ticks};

/// Index of the chapter a "next chapter" press jumps to.
pub fn next_chapter(chapters: &ChapterList, position: Ticks) -> Option<usize> {
    chapters.first_after(position)
}

/// Index of the chapter a "previous chapter" press jumps to.
///
/// With a zero `restart_threshold` this is the last chapter starting
/// strictly before `position`, so pressing exactly on a chapter boundary
/// goes to the one before it. A non-zero threshold additionally skips a
/// chapter that started less than `restart_threshold` ago.
pub fn previous_chapter(
    chapters: &ChapterList,
    position: Ticks,
    restart_threshold: Ticks,
) -> Option<usize> {
    chapters.last_before(position.saturating_sub(restart_threshold))
}

/// Tracks which media segment, if any, the playhead is inside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentTracker {
    segments: SegmentList,
    current: Option<usize>,
}

impl SegmentTracker {
    pub fn new(segments: SegmentList) -> Self {
        Self {
            segments,
            current: None,
        }
    }

    pub fn segments(&self) -> &SegmentList {
        &self.segments
    }

    /// Re-evaluate at `position`; returns whether the active segment
    /// changed.
    pub fn update(&mut self, position: Ticks) -> bool {
        let next = self.segments.index_at(position);
        if next == self.current {
            return false;
        }
        self.current = next;
        true
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&MediaSegment> {
        self.current.and_then(|idx| self.segments.get(idx))
    }

    /// Where "skip" lands: the end of the active segment.
    pub fn skip_target(&self) -> Option<Ticks> {
        self.current().map(|segment| segment.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyplayer_model::{Chapter, MediaSegmentKind};

    fn chapters() -> ChapterList {
        ChapterList::new(vec![
            Chapter::new("Opening", Ticks::ZERO),
            Chapter::new("Heist", Ticks::from_secs(600)),
            Chapter::new("Escape", Ticks::from_secs(1200)),
        ])
    }

    #[test]
    fn next_chapter_is_strictly_after() {
        let chapters = chapters();
        assert_eq!(next_chapter(&chapters, Ticks::from_secs(599)), Some(1));
        assert_eq!(next_chapter(&chapters, Ticks::from_secs(600)), Some(2));
        assert_eq!(next_chapter(&chapters, Ticks::from_secs(1300)), None);
    }

    #[test]
    fn previous_chapter_on_a_boundary_goes_back_one() {
        let chapters = chapters();
        let at_heist = Ticks::from_secs(600);
        assert_eq!(previous_chapter(&chapters, at_heist, Ticks::ZERO), Some(0));
        assert_eq!(
            previous_chapter(&chapters, Ticks::from_secs(601), Ticks::ZERO),
            Some(1)
        );
        assert_eq!(previous_chapter(&chapters, Ticks::ZERO, Ticks::ZERO), None);
    }

    #[test]
    fn restart_threshold_skips_a_chapter_that_just_began() {
        let chapters = chapters();
        let threshold = Ticks::from_secs(3);
        assert_eq!(
            previous_chapter(&chapters, Ticks::from_secs(602), threshold),
            Some(0)
        );
        assert_eq!(
            previous_chapter(&chapters, Ticks::from_secs(610), threshold),
            Some(1)
        );
    }

    #[test]
    fn tracker_reports_changes_only() {
        let intro = MediaSegment::new(
            MediaSegmentKind::Intro,
            Ticks::from_secs(30),
            Ticks::from_secs(90),
        )
        .unwrap();
        let mut tracker = SegmentTracker::new(SegmentList::new(vec![intro]));

        assert!(!tracker.update(Ticks::from_secs(10)));
        assert!(tracker.update(Ticks::from_secs(30)));
        assert!(!tracker.update(Ticks::from_secs(60)));
        assert_eq!(tracker.skip_target(), Some(Ticks::from_secs(90)));
        assert!(tracker.update(Ticks::from_secs(90)));
        assert_eq!(tracker.current(), None);
    }
}
