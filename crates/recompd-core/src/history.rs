//! Fixed-capacity FIFO window over recent compilation attempts.

use std::collections::VecDeque;

use crate::entry::CompilationLogEntry;

/// How many attempts the compilation log retains.
///
/// A tunable window, not a semantic constant: it only needs to cover the
/// longest failure run the backoff doubling is expected to distinguish.
pub const MAX_LOGGED_ENTRIES: usize = 4;

/// An ordered window of the most recent entries, oldest first.
///
/// Appending beyond capacity evicts the oldest entry; there is no other
/// mutation. Capacity is fixed at construction.
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    entries: VecDeque<CompilationLogEntry>,
    capacity: usize,
}

impl BoundedHistory {
    /// Creates an empty history retaining at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest if the window is full.
    pub fn append(&mut self, entry: CompilationLogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Number of retained entries (`0..=capacity`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The entry at `index` within the retained window (oldest = 0), or
    /// `None` if out of range. The borrow is invalidated by the next append.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<&CompilationLogEntry> {
        self.entries.get(index)
    }

    /// Iterates the retained window oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CompilationLogEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_possible_truncation)]
    fn entry(seed: i64) -> CompilationLogEntry {
        CompilationLogEntry::new(seed, seed as i32 + 1, seed + 2, seed as i32 + 3)
    }

    #[test]
    fn test_append_grows_until_capacity_then_evicts_oldest() {
        let mut history = BoundedHistory::new(MAX_LOGGED_ENTRIES);
        let entries: Vec<_> = (0..7).map(entry).collect();

        for (i, e) in entries.iter().enumerate() {
            history.append(*e);
            assert_eq!(history.len(), (i + 1).min(MAX_LOGGED_ENTRIES));

            // The window always holds the most recent entries, oldest first.
            for j in 0..history.len() {
                let expected = &entries[i + 1 - history.len() + j];
                assert_eq!(history.peek(j), Some(expected));
            }
        }
    }

    #[test]
    fn test_peek_out_of_range_is_none() {
        let mut history = BoundedHistory::new(MAX_LOGGED_ENTRIES);
        assert!(history.is_empty());
        assert_eq!(history.peek(0), None);

        history.append(entry(0));
        assert_eq!(history.peek(0), Some(&entry(0)));
        assert_eq!(history.peek(1), None);
        assert_eq!(history.peek(MAX_LOGGED_ENTRIES), None);
    }

    #[test]
    fn test_iter_is_oldest_first_and_reversible() {
        let mut history = BoundedHistory::new(2);
        history.append(entry(0));
        history.append(entry(1));
        history.append(entry(2));

        let forward: Vec<_> = history.iter().copied().collect();
        assert_eq!(forward, vec![entry(1), entry(2)]);
        let newest = history.iter().next_back();
        assert_eq!(newest, Some(&entry(2)));
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_is_rejected() {
        let _ = BoundedHistory::new(0);
    }
}
