//! Session playlist
//!
//! Ordered list of items plus a single cursor:
//!
//! ```text
//! items:   [A] [B] [C] [D]
//! current:      ^
//! ```
//!
//! The cursor is `None` exactly when the list is empty. Removing an item
//! keeps the cursor on the item that was selected before the removal
//! (or on its successor when the selected item itself is removed).

use crate::error::{Result, SessionError};
use crate::types::{PlaylistItem, QueueKey};

/// Outcome of a removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// No entry with that key
    Absent,

    /// First matching entry removed
    Removed {
        /// Whether the selected item is now a different one (or none)
        current_changed: bool,
    },
}

/// Playlist with a current-position cursor
#[derive(Debug, Clone, Default)]
pub struct Queue {
    items: Vec<PlaylistItem>,

    /// Selected entry; `None` iff `items` is empty
    current: Option<usize>,

    /// Position requested while the queue was empty, applied once it fits
    pending: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item
    ///
    /// The first item becomes the current one. A pending position is
    /// selected as soon as the item it names exists.
    pub fn add(&mut self, item: PlaylistItem) {
        self.items.push(item);

        if self.current.is_none() {
            self.current = Some(0);
        }
        self.apply_pending();
    }

    /// Remove the first entry with `key`
    pub fn remove(&mut self, key: QueueKey) -> Removal {
        let Some(index) = self.items.iter().position(|item| item.key == key) else {
            return Removal::Absent;
        };

        self.items.remove(index);

        if self.items.is_empty() {
            let current_changed = self.current.is_some();
            self.current = None;
            return Removal::Removed { current_changed };
        }

        match self.current {
            Some(current) if index < current => {
                self.current = Some(current - 1);
                Removal::Removed {
                    current_changed: false,
                }
            }
            Some(current) if index == current => {
                self.current = Some(current.min(self.items.len() - 1));
                Removal::Removed {
                    current_changed: true,
                }
            }
            _ => Removal::Removed {
                current_changed: false,
            },
        }
    }

    /// Clear all items and the cursor
    pub fn reset(&mut self) {
        self.items.clear();
        self.current = None;
        self.pending = None;
    }

    /// Item at `index`
    ///
    /// # Panics
    /// Panics if `index` is out of range; callers index with the cursor only.
    pub fn get(&self, index: usize) -> &PlaylistItem {
        assert!(
            index < self.items.len(),
            "queue index {} out of range (len {})",
            index,
            self.items.len()
        );
        &self.items[index]
    }

    /// Item at `index`, if any
    pub fn try_get(&self, index: usize) -> Option<&PlaylistItem> {
        self.items.get(index)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current cursor position
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Position waiting for the queue to grow
    pub fn pending_index(&self) -> Option<usize> {
        self.pending
    }

    /// Currently selected item
    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.current.map(|index| self.get(index))
    }

    /// All items in order
    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    /// Move the cursor forward, wrapping to the start
    ///
    /// Returns the new position, or `None` on an empty queue.
    pub fn advance(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let next = self.current.map_or(0, |current| (current + 1) % self.items.len());
        self.current = Some(next);
        self.pending = None;
        Some(next)
    }

    /// Move the cursor back, wrapping to the end
    pub fn retreat(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let previous = match self.current {
            Some(current) if current > 0 => current - 1,
            _ => self.items.len() - 1,
        };
        self.current = Some(previous);
        self.pending = None;
        Some(previous)
    }

    /// Check that `position` can be selected
    ///
    /// Any position is accepted on an empty queue (it becomes pending).
    pub fn validate_position(&self, position: usize) -> Result<()> {
        if !self.items.is_empty() && position >= self.items.len() {
            return Err(SessionError::InvalidQueuePosition {
                position,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Select an explicit position
    ///
    /// On an empty queue the position is remembered and applied by `add`.
    pub fn select(&mut self, position: usize) -> Result<()> {
        self.validate_position(position)?;

        if self.items.is_empty() {
            self.pending = Some(position);
        } else {
            self.current = Some(position);
            self.pending = None;
        }
        Ok(())
    }

    fn apply_pending(&mut self) {
        if let Some(position) = self.pending {
            if position < self.items.len() {
                self.current = Some(position);
                self.pending = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaDescription;

    fn item(id: &str) -> PlaylistItem {
        PlaylistItem::new(MediaDescription::from_id(id))
    }

    fn queue_of(ids: &[&str]) -> Queue {
        let mut queue = Queue::new();
        for id in ids {
            queue.add(item(id));
        }
        queue
    }

    fn current_id(queue: &Queue) -> Option<&str> {
        queue.current_item().map(|item| item.media_id.as_str())
    }

    #[test]
    fn create_empty_queue() {
        let queue = Queue::new();
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn first_add_selects_first_item() {
        let mut queue = Queue::new();
        queue.add(item("a"));
        assert_eq!(queue.current_index(), Some(0));

        queue.add(item("b"));
        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(queue.get(1).media_id.as_str(), "b");
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut queue = queue_of(&["a", "b"]);
        assert_eq!(queue.remove(item("z").key), Removal::Absent);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn remove_before_cursor_keeps_selected_item() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(2).unwrap();

        let removal = queue.remove(item("a").key);
        assert_eq!(
            removal,
            Removal::Removed {
                current_changed: false
            }
        );
        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(current_id(&queue), Some("c"));
    }

    #[test]
    fn remove_after_cursor_leaves_cursor() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.remove(item("c").key);
        assert_eq!(current_id(&queue), Some("a"));
    }

    #[test]
    fn remove_selected_item_moves_to_successor() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(1).unwrap();

        let removal = queue.remove(item("b").key);
        assert_eq!(
            removal,
            Removal::Removed {
                current_changed: true
            }
        );
        assert_eq!(current_id(&queue), Some("c"));
    }

    #[test]
    fn remove_selected_tail_clamps_cursor() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(2).unwrap();

        queue.remove(item("c").key);
        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(current_id(&queue), Some("b"));
    }

    #[test]
    fn remove_only_first_duplicate() {
        let mut queue = queue_of(&["a", "b", "a"]);
        queue.remove(item("a").key);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.get(0).media_id.as_str(), "b");
        assert_eq!(queue.get(1).media_id.as_str(), "a");
    }

    #[test]
    fn removing_last_item_clears_cursor() {
        let mut queue = queue_of(&["a"]);
        let removal = queue.remove(item("a").key);
        assert_eq!(
            removal,
            Removal::Removed {
                current_changed: true
            }
        );
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut queue = queue_of(&["a", "b"]);
        queue.reset();
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
        assert_eq!(queue.pending_index(), None);
    }

    #[test]
    fn advance_wraps_around() {
        let mut queue = queue_of(&["a", "b", "c"]);
        assert_eq!(queue.advance(), Some(1));
        assert_eq!(queue.advance(), Some(2));
        assert_eq!(queue.advance(), Some(0));
    }

    #[test]
    fn retreat_wraps_around() {
        let mut queue = queue_of(&["a", "b", "c"]);
        assert_eq!(queue.retreat(), Some(2));
        assert_eq!(queue.retreat(), Some(1));
    }

    #[test]
    fn advance_and_retreat_on_empty_queue() {
        let mut queue = Queue::new();
        assert_eq!(queue.advance(), None);
        assert_eq!(queue.retreat(), None);
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn select_out_of_range_is_rejected() {
        let mut queue = queue_of(&["a", "b"]);
        let err = queue.select(2).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidQueuePosition {
                position: 2,
                len: 2
            }
        );
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn select_on_empty_queue_is_applied_when_reachable() {
        let mut queue = Queue::new();
        queue.select(2).unwrap();
        assert_eq!(queue.pending_index(), Some(2));

        queue.add(item("a"));
        queue.add(item("b"));
        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(queue.pending_index(), Some(2));

        queue.add(item("c"));
        assert_eq!(queue.current_index(), Some(2));
        assert_eq!(queue.pending_index(), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn get_out_of_range_panics() {
        let queue = queue_of(&["a"]);
        queue.get(1);
    }
}
