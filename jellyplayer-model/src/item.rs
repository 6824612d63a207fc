use crate::ids::ItemId;
use crate::ticks::Ticks;

/// Broad playable item categories the transport cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    #[default]
    Movie,
    Episode,
    MusicVideo,
    Audio,
    Video,
}

impl ItemKind {
    pub fn is_audio(&self) -> bool {
        matches!(self, ItemKind::Audio)
    }
}

/// An entry of the play queue.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayableItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub series_name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub season_number: Option<u16>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub episode_number: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub artists: Vec<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub runtime: Option<Ticks>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub resume_position: Option<Ticks>,
}

impl PlayableItem {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            series_name: None,
            season_number: None,
            episode_number: None,
            artists: Vec::new(),
            runtime: None,
            resume_position: None,
        }
    }

    pub fn with_runtime(mut self, runtime: Ticks) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_episode(
        mut self,
        series_name: impl Into<String>,
        season: u16,
        episode: u16,
    ) -> Self {
        self.kind = ItemKind::Episode;
        self.series_name = Some(series_name.into());
        self.season_number = Some(season);
        self.episode_number = Some(episode);
        self
    }

    /// Headline title: the series for episodes, the item name otherwise.
    pub fn title(&self) -> &str {
        match (&self.kind, &self.series_name) {
            (ItemKind::Episode, Some(series)) => series,
            _ => &self.name,
        }
    }

    /// `S1:E4 Name` for episodes.
    pub fn episode_title(&self) -> Option<String> {
        if self.kind != ItemKind::Episode || self.series_name.is_none() {
            return None;
        }
        Some(format!(
            "S{}:E{} {}",
            self.season_number.unwrap_or(0),
            self.episode_number.unwrap_or(0),
            self.name
        ))
    }
}
