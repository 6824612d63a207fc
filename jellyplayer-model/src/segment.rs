use crate::error::ModelError;
use crate::ticks::Ticks;
use std::fmt;

/// Kind of a labelled range inside an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaSegmentKind {
    Intro,
    Outro,
    Recap,
    Preview,
    Commercial,
    Unknown,
}

impl MediaSegmentKind {
    /// Label for the skip affordance.
    pub fn skip_label(&self) -> &'static str {
        match self {
            MediaSegmentKind::Intro => "Skip Intro",
            MediaSegmentKind::Outro => "Skip Credits",
            MediaSegmentKind::Recap => "Skip Recap",
            MediaSegmentKind::Preview => "Skip Preview",
            MediaSegmentKind::Commercial => "Skip Commercial",
            MediaSegmentKind::Unknown => "Skip",
        }
    }

    /// Credits run into the end of the item, so they get no skip button.
    /// Skipping them explicitly still works.
    pub fn offers_skip_button(&self) -> bool {
        !matches!(self, MediaSegmentKind::Outro)
    }
}

impl fmt::Display for MediaSegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaSegmentKind::Intro => "intro",
            MediaSegmentKind::Outro => "outro",
            MediaSegmentKind::Recap => "recap",
            MediaSegmentKind::Preview => "preview",
            MediaSegmentKind::Commercial => "commercial",
            MediaSegmentKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for MediaSegmentKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "intro" => Ok(MediaSegmentKind::Intro),
            "outro" | "credits" => Ok(MediaSegmentKind::Outro),
            "recap" => Ok(MediaSegmentKind::Recap),
            "preview" => Ok(MediaSegmentKind::Preview),
            "commercial" => Ok(MediaSegmentKind::Commercial),
            "unknown" => Ok(MediaSegmentKind::Unknown),
            _ => Err(ModelError::UnknownSegmentKind(s.to_string())),
        }
    }
}

/// Half-open `[start, end)` range of an item carrying a skip affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaSegment {
    pub kind: MediaSegmentKind,
    pub start: Ticks,
    pub end: Ticks,
}

impl MediaSegment {
    pub fn new(
        kind: MediaSegmentKind,
        start: Ticks,
        end: Ticks,
    ) -> Result<Self, ModelError> {
        if start >= end {
            return Err(ModelError::InvalidRange {
                start: start.value(),
                end: end.value(),
            });
        }
        Ok(Self { kind, start, end })
    }

    pub fn contains(&self, position: Ticks) -> bool {
        self.start <= position && position < self.end
    }
}

/// Segments of the loaded item ordered by start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<MediaSegment>"))]
pub struct SegmentList(Vec<MediaSegment>);

impl SegmentList {
    pub fn new(mut segments: Vec<MediaSegment>) -> Self {
        segments.sort_by_key(|segment| segment.start);
        SegmentList(segments)
    }

    pub fn as_slice(&self) -> &[MediaSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&MediaSegment> {
        self.0.get(index)
    }

    /// Index of the segment whose range contains `position`.
    pub fn index_at(&self, position: Ticks) -> Option<usize> {
        self.0.iter().position(|segment| segment.contains(position))
    }
}

impl From<Vec<MediaSegment>> for SegmentList {
    fn from(segments: Vec<MediaSegment>) -> Self {
        SegmentList::new(segments)
    }
}
