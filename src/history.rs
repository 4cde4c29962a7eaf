//! Submitted-line history for the input line
//!
//! Keeps every submitted line plus one trailing working slot, and tracks
//! which element the user is currently looking at.

/// Line history with a trailing working slot
///
/// `entries` always holds at least one element; the last one is the
/// working slot and is only overwritten when a line is submitted.
#[derive(Clone, Debug)]
pub struct HistoryBuffer {
    /// Submitted lines followed by the working slot (newest last)
    entries: Vec<String>,
    /// Element currently shown in the input line
    index: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    /// Create an empty history (just the working slot)
    pub fn new() -> Self {
        Self {
            entries: vec![String::new()],
            index: 0,
        }
    }

    /// Record a submitted line
    ///
    /// Only the newest finalized entry is compared: a line equal to it is
    /// not recorded again, but older repeats are. Returns whether a new
    /// entry was added. Either way the index moves back to the working slot.
    pub fn record(&mut self, line: &str) -> bool {
        let len = self.entries.len();
        let duplicate = len >= 2 && self.entries[len - 2] == line;

        if !duplicate {
            self.entries[len - 1] = line.to_string();
            self.entries.push(String::new());
        }
        self.index = self.entries.len() - 1;
        !duplicate
    }

    /// Step towards older entries, returning the newly selected text
    ///
    /// Returns `None` when already at the oldest entry.
    pub fn prev(&mut self) -> Option<&str> {
        if self.index > 0 {
            self.index -= 1;
            Some(&self.entries[self.index])
        } else {
            None
        }
    }

    /// Step towards newer entries, returning the newly selected text
    ///
    /// Returns `None` when already at the working slot.
    pub fn next(&mut self) -> Option<&str> {
        if self.index < self.entries.len() - 1 {
            self.index += 1;
            Some(&self.entries[self.index])
        } else {
            None
        }
    }

    /// Currently selected element index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the working slot is selected
    pub fn at_newest(&self) -> bool {
        self.index == self.entries.len() - 1
    }

    /// Number of finalized entries (the working slot is not counted)
    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All elements including the trailing working slot
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Finalized entries, oldest first
    pub fn submitted(&self) -> &[String] {
        &self.entries[..self.entries.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_and_resets_index() {
        let mut history = HistoryBuffer::new();
        assert!(history.record("echo a"));
        assert!(history.record("echo b"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries(), &["echo a", "echo b", ""]);
        assert!(history.at_newest());
    }

    #[test]
    fn test_adjacent_duplicate_suppressed() {
        let mut history = HistoryBuffer::new();
        history.record("ls");
        assert!(!history.record("ls"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries().last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_non_adjacent_repeat_kept() {
        let mut history = HistoryBuffer::new();
        history.record("a");
        history.record("b");
        history.record("a");
        assert_eq!(history.submitted(), &["a", "b", "a"]);
    }

    #[test]
    fn test_empty_line_recorded_once() {
        let mut history = HistoryBuffer::new();
        assert!(history.record(""));
        assert!(!history.record(""));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut history = HistoryBuffer::new();
        history.record("one");
        history.record("two");

        assert_eq!(history.prev(), Some("two"));
        assert_eq!(history.prev(), Some("one"));
        assert_eq!(history.prev(), None);
        assert_eq!(history.prev(), None);
        assert_eq!(history.index(), 0);

        assert_eq!(history.next(), Some("two"));
        assert_eq!(history.next(), Some(""));
        assert_eq!(history.next(), None);
        assert_eq!(history.index(), 2);
    }
}
