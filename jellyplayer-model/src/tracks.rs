/// Stream kinds a media source exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

/// One selectable stream of a media source. `index` is the server's stream
/// index, not a position in any list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaTrack {
    pub index: i32,
    pub kind: TrackKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub language: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub codec: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_default: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_external: bool,
}

impl MediaTrack {
    pub fn new(index: i32, kind: TrackKind) -> Self {
        Self {
            index,
            kind,
            language: None,
            title: None,
            codec: None,
            is_default: false,
            is_external: false,
        }
    }

    pub fn display_name(&self) -> String {
        match (&self.title, &self.language) {
            (Some(title), Some(lang)) => format!("{title} ({lang})"),
            (Some(title), None) => title.clone(),
            (None, Some(lang)) => lang.clone(),
            (None, None) => format!("Track {}", self.index),
        }
    }
}

/// Selection state for one track kind of the open media source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSelection {
    pub index: Option<i32>,
    pub available: Vec<MediaTrack>,
    pub enabled: bool,
}

impl TrackSelection {
    pub fn new(available: Vec<MediaTrack>, index: Option<i32>) -> Self {
        let enabled = index.is_some();
        Self {
            index,
            available,
            enabled,
        }
    }

    pub fn find(&self, index: i32) -> Option<&MediaTrack> {
        self.available.iter().find(|track| track.index == index)
    }

    pub fn current(&self) -> Option<&MediaTrack> {
        self.index.and_then(|index| self.find(index))
    }

    /// Stream index to report, or `None` while disabled.
    pub fn active_index(&self) -> Option<i32> {
        if self.enabled { self.index } else { None }
    }
}
