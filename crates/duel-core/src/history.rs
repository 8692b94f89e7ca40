//! Snapshot stack backing single-step undo.

use crate::item::Item;
use crate::phase::Phase;

/// Complete state of a session immediately before a vote.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub items: Vec<Item>,
    pub phase: Phase,
}

/// LIFO stack of [`HistoryEntry`] snapshots.
///
/// Restoring an entry replaces state wholesale. Rating changes are rounded
/// and cannot be inverted, so deltas are never replayed.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a snapshot taken before a mutation.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Removes and returns the most recent snapshot.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rating: f64) -> HistoryEntry {
        HistoryEntry {
            items: vec![Item::new(1, "a", rating)],
            phase: Phase::Elimination,
        }
    }

    #[test]
    fn test_new_stack_is_empty() {
        let mut stack = HistoryStack::new();
        assert!(stack.is_empty());
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_pop_returns_entries_in_reverse_order() {
        let mut stack = HistoryStack::new();
        stack.push(entry(1500.0));
        stack.push(entry(1516.0));
        stack.push(entry(1531.0));
        assert_eq!(stack.len(), 3);

        assert_eq!(stack.pop(), Some(entry(1531.0)));
        assert_eq!(stack.pop(), Some(entry(1516.0)));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop(), Some(entry(1500.0)));
        assert!(stack.is_empty());
    }
}
