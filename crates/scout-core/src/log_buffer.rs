//! Bounded, chronological trace of search progress.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept; the oldest is evicted first.
pub const LOG_CAPACITY: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Step,
    Info,
    Error,
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogKind::Step => write!(f, "step"),
            LogKind::Info => write!(f, "info"),
            LogKind::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub content: String,
    pub kind: LogKind,
}

impl LogEntry {
    /// Entry stamped with the current local time.
    #[must_use]
    pub fn now(content: impl Into<String>, kind: LogKind) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            content: content.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "log buffer capacity must be non-zero");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry stamped now and return a reference to it.
    pub fn push(&mut self, content: impl Into<String>, kind: LogKind) -> &LogEntry {
        self.push_entry(LogEntry::now(content, kind))
    }

    pub fn push_entry(&mut self, entry: LogEntry) -> &LogEntry {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        // The deque holds at least the entry just pushed.
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn count_kind(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_below_capacity() {
        let mut log = LogBuffer::new();
        log.push("one", LogKind::Info);
        log.push("two", LogKind::Step);
        log.push("three", LogKind::Error);

        let contents: Vec<&str> = log.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(log.latest().map(|e| e.kind), Some(LogKind::Error));
    }

    #[test]
    fn retains_last_forty_in_order_after_overflow() {
        for total in [41usize, 42, 80, 123] {
            let mut log = LogBuffer::new();
            for i in 0..total {
                log.push(format!("step {i}"), LogKind::Step);
            }

            assert_eq!(log.len(), LOG_CAPACITY);
            let expected: Vec<String> = (total - LOG_CAPACITY..total)
                .map(|i| format!("step {i}"))
                .collect();
            let actual: Vec<String> = log.iter().map(|e| e.content.clone()).collect();
            assert_eq!(actual, expected, "total insertions = {total}");
        }
    }

    #[test]
    fn clear_empties_buffer() {
        let mut log = LogBuffer::new();
        log.push("x", LogKind::Info);
        log.clear();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn count_kind_filters_entries() {
        let mut log = LogBuffer::with_capacity(3);
        log.push("a", LogKind::Error);
        log.push("b", LogKind::Step);
        log.push("c", LogKind::Error);
        log.push("d", LogKind::Step);

        assert_eq!(log.count_kind(LogKind::Error), 1);
        assert_eq!(log.count_kind(LogKind::Step), 2);
    }

    #[test]
    fn timestamp_is_hh_mm_ss() {
        let entry = LogEntry::now("tick", LogKind::Info);
        let parts: Vec<&str> = entry.timestamp.split(':').collect();
        assert_eq!(parts.len(), 3, "timestamp = {}", entry.timestamp);
        assert!(parts.iter().all(|p| p.len() == 2));
    }
}
