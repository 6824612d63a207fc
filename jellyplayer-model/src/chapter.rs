use crate::ticks::Ticks;

/// A named chapter start point inside an item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapter {
    pub name: String,
    pub start: Ticks,
}

impl Chapter {
    pub fn new(name: impl Into<String>, start: Ticks) -> Self {
        Self {
            name: name.into(),
            start,
        }
    }
}

/// Chapters of the loaded item, kept in ascending start order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Chapter>"))]
pub struct ChapterList(Vec<Chapter>);

impl ChapterList {
    pub fn new(mut chapters: Vec<Chapter>) -> Self {
        chapters.sort_by_key(|chapter| chapter.start);
        ChapterList(chapters)
    }

    pub fn as_slice(&self) -> &[Chapter] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chapter> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.0.iter()
    }

    /// Index of the first chapter starting strictly after `position`.
    pub fn first_after(&self, position: Ticks) -> Option<usize> {
        let idx = self.0.partition_point(|chapter| chapter.start <= position);
        (idx < self.0.len()).then_some(idx)
    }

    /// Index of the last chapter starting strictly before `position`.
    pub fn last_before(&self, position: Ticks) -> Option<usize> {
        self.0
            .partition_point(|chapter| chapter.start < position)
            .checked_sub(1)
    }

    /// The chapter playing at `position`: the last one that has started.
    pub fn containing(&self, position: Ticks) -> Option<&Chapter> {
        self.0
            .partition_point(|chapter| chapter.start <= position)
            .checked_sub(1)
            .and_then(|idx| self.0.get(idx))
    }
}

impl From<Vec<Chapter>> for ChapterList {
    fn from(chapters: Vec<Chapter>) -> Self {
        ChapterList::new(chapters)
    }
}

impl<'a> IntoIterator for &'a ChapterList {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
