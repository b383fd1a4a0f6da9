use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Push counter at the time of insertion. Starts at 0, never reused.
    pub index: u64,
    pub item: String,
}

/// Newest-first log of results, bounded to `capacity` entries.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    next_index: u64,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStore {
    /// A zero capacity is bumped to 1 so the latest result is always kept.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            next_index: 0,
            capacity,
        }
    }

    pub fn push(&mut self, item: impl Into<String>) -> &HistoryEntry {
        self.entries.insert(
            0,
            HistoryEntry {
                index: self.next_index,
                item: item.into(),
            },
        );
        self.next_index += 1;
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Total pushes so far, including evicted entries.
    pub fn total_pushed(&self) -> u64 {
        self.next_index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
