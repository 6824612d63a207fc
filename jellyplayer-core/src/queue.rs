//! Ordered list of items to play and the cursor into it.

use jellyplayer_model::{ItemId, PlayableItem};
use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, Result};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    /// Off, All, One, Off...
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    /// Name used in progress reports.
    pub fn report_name(self) -> &'static str {
        match self {
            RepeatMode::Off => "RepeatNone",
            RepeatMode::All => "RepeatAll",
            RepeatMode::One => "RepeatOne",
        }
    }
}

impl std::str::FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(RepeatMode::Off),
            "all" => Ok(RepeatMode::All),
            "one" => Ok(RepeatMode::One),
            other => Err(format!("unknown repeat mode '{other}'")),
        }
    }
}

/// What a removal did to the item that was playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    NotFound,
    /// Entries were removed; the current item is unchanged.
    Removed,
    /// The current item was removed and another now sits at the cursor.
    CurrentReplaced(usize),
    /// The current item was removed and nothing follows it. The cursor
    /// rests on the new last entry, or is cleared when the queue is empty.
    Stopped,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackQueue {
    items: Vec<PlayableItem>,
    current: Option<usize>,
    repeat: RepeatMode,
}

impl PlaybackQueue {
    pub fn new(repeat: RepeatMode) -> Self {
        Self {
            items: Vec::new(),
            current: None,
            repeat,
        }
    }

    /// Replace the queue and point at `start`. The queue is left untouched
    /// when `start` is out of range.
    pub fn set_queue(
        &mut self,
        items: Vec<PlayableItem>,
        start: usize,
    ) -> Result<()> {
        if start >= items.len() {
            return Err(PlayerError::InvalidIndex {
                index: start,
                len: items.len(),
            });
        }
        self.items = items;
        self.current = Some(start);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }

    pub fn items(&self) -> &[PlayableItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_item(&self) -> Option<&PlayableItem> {
        self.current.and_then(|idx| self.items.get(idx))
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    pub fn has_next(&self) -> bool {
        self.peek_next().is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.current.is_some_and(|idx| idx > 0)
    }

    fn peek_next(&self) -> Option<usize> {
        let current = self.current?;
        if current + 1 < self.items.len() {
            Some(current + 1)
        } else if self.repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Move to the next item. At the end this wraps only under
    /// [`RepeatMode::All`]; otherwise the cursor stays put and `None` is
    /// returned.
    pub fn next(&mut self) -> Option<usize> {
        let next = self.peek_next()?;
        self.current = Some(next);
        Some(next)
    }

    pub fn previous(&mut self) -> Option<usize> {
        let current = self.current?;
        let previous = current.checked_sub(1)?;
        self.current = Some(previous);
        Some(previous)
    }

    /// Where to go once the current item has played to its end.
    pub fn advance_on_end(&mut self) -> Option<usize> {
        match self.repeat {
            RepeatMode::One => self.current,
            RepeatMode::Off | RepeatMode::All => self.next(),
        }
    }

    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(PlayerError::InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        self.current = Some(index);
        Ok(())
    }

    /// Remove every entry with `id`.
    pub fn remove(&mut self, id: &ItemId) -> RemoveOutcome {
        let Some(current) = self.current else {
            let before = self.items.len();
            self.items.retain(|item| &item.id != id);
            return if before == self.items.len() {
                RemoveOutcome::NotFound
            } else {
                RemoveOutcome::Removed
            };
        };

        let removed_current =
            self.items.get(current).is_some_and(|item| &item.id == id);
        let removed_before = self.items[..current]
            .iter()
            .filter(|item| &item.id == id)
            .count();
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        if before == self.items.len() {
            return RemoveOutcome::NotFound;
        }

        let shifted = current - removed_before;
        if !removed_current {
            self.current = Some(shifted);
            return RemoveOutcome::Removed;
        }

        if shifted < self.items.len() {
            self.current = Some(shifted);
            RemoveOutcome::CurrentReplaced(shifted)
        } else if self.repeat == RepeatMode::All && !self.items.is_empty() {
            self.current = Some(0);
            RemoveOutcome::CurrentReplaced(0)
        } else {
            self.current = self.items.len().checked_sub(1);
            RemoveOutcome::Stopped
        }
    }

    /// Move the entry at `from` to `to`, keeping the cursor on the item
    /// that was playing.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(PlayerError::InvalidIndex { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);

        if let Some(current) = self.current {
            self.current = Some(if current == from {
                to
            } else if from < current && to >= current {
                current - 1
            } else if from > current && to <= current {
                current + 1
            } else {
                current
            });
        }
        Ok(())
    }
}
